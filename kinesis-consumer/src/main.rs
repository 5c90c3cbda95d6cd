//! Lambda entry point: persist each Kinesis record into DynamoDB.
use std::sync::Arc;

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region};
use aws_lambda_events::event::kinesis::KinesisEvent;
use common_stream::{handle_kinesis_event, logging::setup_tracing};
use envconfig::Envconfig;
use kinesis_consumer::config::Config;
use kinesis_consumer::handler::TrackingPipeline;
use kinesis_consumer::identity::IdentityAssigner;
use kinesis_consumer::store::DynamoDbStore;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

const FALLBACK_REGION: &str = "eu-west-1";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::init_from_env()?;
    setup_tracing(config.log_json);

    let region_provider = RegionProviderChain::first_try(config.aws_region.clone().map(Region::new))
        .or_default_provider()
        .or_else(FALLBACK_REGION);
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    info!(
        region = ?aws_config.region(),
        table = config.table_name.as_str(),
        id_strategy = ?config.id_strategy,
        decode_failure_policy = ?config.decode_failure_policy,
        "starting kinesis consumer"
    );

    let client = aws_sdk_dynamodb::Client::new(&aws_config);
    let store = DynamoDbStore::new(client, config.table_name.0.clone());
    let pipeline = TrackingPipeline::new(Arc::new(store), IdentityAssigner::new(config.id_strategy));
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
