use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Install the process-wide tracing subscriber.
///
/// Level comes from `RUST_LOG`, defaulting to INFO. Timestamps are left out
/// since the log collector stamps ingestion time on every line.
pub fn setup_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let log_layer = {
        let base_layer = fmt::layer().with_target(false).without_time();

        if json {
            base_layer.json().with_filter(filter).boxed()
        } else {
            base_layer.with_filter(filter).boxed()
        }
    };

    tracing_subscriber::registry().with(log_layer).init();
}
