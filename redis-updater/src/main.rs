//! Lambda entry point: mirror each Kinesis record into Redis and publish it.
use std::sync::Arc;

use aws_lambda_events::event::kinesis::KinesisEvent;
use common_stream::{handle_kinesis_event, logging::setup_tracing};
use envconfig::Envconfig;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use redis::aio::ConnectionManager;
use redis_updater::config::Config;
use redis_updater::handler::RedisPipeline;
use redis_updater::notify::{Notifier, RedisPublisher};
use redis_updater::store::RedisFieldMapStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::init_from_env()?;
    setup_tracing(config.log_json);

    info!(
        region = ?config.aws_region,
        redis_host = config.redis_host.as_str(),
        redis_port = config.redis_port,
        channel = config.redis_channel.as_str(),
        decode_failure_policy = ?config.decode_failure_policy,
        "starting redis updater"
    );

    // Shared by writes and publishes; reconnects on its own after the server drops it.
    let client = redis::Client::open(config.redis_url())?;
    let connection = ConnectionManager::new(client).await?;

    let pipeline = RedisPipeline::new(
        Arc::new(RedisFieldMapStore::new(connection.clone())),
        Notifier::new(
            Arc::new(RedisPublisher::new(connection)),
            config.redis_channel.0.clone(),
        ),
    );
    let pipeline = &pipeline;
    let policy = config.decode_failure_policy;

    run(service_fn(
        move |event: LambdaEvent<KinesisEvent>| async move {
            handle_kinesis_event(pipeline, policy, event.payload)
                .await
                .map(|_| ())
                .map_err(Error::from)
        },
    ))
    .await
}
