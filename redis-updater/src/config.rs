use common_stream::config::NonEmptyString;
use common_stream::DecodeFailurePolicy;
use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    /// Only logged at startup; nothing in this pipeline calls AWS.
    pub aws_region: Option<String>,

    pub redis_host: NonEmptyString,

    #[envconfig(default = "6379")]
    pub redis_port: u16,

    #[envconfig(default = "channel1")]
    pub redis_channel: NonEmptyString,

    #[envconfig(default = "skip")]
    pub decode_failure_policy: DecodeFailurePolicy,

    #[envconfig(default = "false")]
    pub log_json: bool,
}

impl Config {
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.redis_host.as_str(), self.redis_port)
    }
}
