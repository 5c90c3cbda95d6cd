use common_stream::config::NonEmptyString;
use common_stream::DecodeFailurePolicy;
use envconfig::Envconfig;

use crate::identity::IdStrategy;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    /// Region for the DynamoDB client; falls back to the SDK's provider chain.
    pub aws_region: Option<String>,

    pub table_name: NonEmptyString,

    #[envconfig(default = "skip")]
    pub decode_failure_policy: DecodeFailurePolicy,

    #[envconfig(default = "random")]
    pub id_strategy: IdStrategy,

    #[envconfig(default = "false")]
    pub log_json: bool,
}
