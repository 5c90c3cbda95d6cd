use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common_stream::IdentityError;
use rand::{rngs::OsRng, RngCore};
use uuid::{Builder, Uuid};

/// Fixed-width, microsecond precision UTC timestamp, e.g. `2024-03-01T09:15:27.004211Z`.
pub const UPDATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Namespace for identifiers derived from producer message ids.
const MESSAGE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x7c0e_52d4_6a3f_4b8e_9d21_0f53_a6c4_e1b7);

/// How record identifiers are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// A fresh random identifier per write. A redelivered record is stored again
    /// under a new identifier.
    #[default]
    Random,
    /// Derive the identifier from the producer's message id so that a
    /// redelivered record overwrites its earlier copy. Records without a
    /// message id fall back to a random identifier.
    MessageId,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseIdStrategyError(String);

impl fmt::Display for ParseIdStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown id strategy {:?}, expected \"random\" or \"message-id\"",
            self.0
        )
    }
}

impl std::error::Error for ParseIdStrategyError {}

impl FromStr for IdStrategy {
    type Err = ParseIdStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(IdStrategy::Random),
            "message-id" | "message_id" => Ok(IdStrategy::MessageId),
            _ => Err(ParseIdStrategyError(s.to_owned())),
        }
    }
}

/// Source of the random bytes behind v4 identifiers.
pub trait EntropySource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), IdentityError>;
}

/// The operating system's CSPRNG.
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), IdentityError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| IdentityError(e.to_string()))
    }
}

/// Identifier and write timestamp attached to an event right before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub updated_at: String,
}

#[derive(Clone)]
pub struct IdentityAssigner {
    strategy: IdStrategy,
    entropy: Arc<dyn EntropySource>,
}

impl IdentityAssigner {
    pub fn new(strategy: IdStrategy) -> Self {
        Self::with_entropy(strategy, Arc::new(OsEntropy))
    }

    pub fn with_entropy(strategy: IdStrategy, entropy: Arc<dyn EntropySource>) -> Self {
        Self { strategy, entropy }
    }

    /// Mint an identity stamped with the current wall clock time.
    pub fn assign(&self, message_id: &str) -> Result<Identity, IdentityError> {
        self.assign_at(message_id, Utc::now())
    }

    pub fn assign_at(
        &self,
        message_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, IdentityError> {
        let id = match self.strategy {
            IdStrategy::MessageId if !message_id.is_empty() => {
                Uuid::new_v5(&MESSAGE_ID_NAMESPACE, message_id.as_bytes())
            }
            _ => self.random_id()?,
        };

        Ok(Identity {
            id: id.hyphenated().to_string(),
            updated_at: now.format(UPDATED_AT_FORMAT).to_string(),
        })
    }

    fn random_id(&self) -> Result<Uuid, IdentityError> {
        let mut bytes = [0u8; 16];
        self.entropy.fill(&mut bytes)?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), IdentityError> {
            Err(IdentityError("entropy pool unavailable".to_string()))
        }
    }

    #[test]
    fn test_random_ids_are_unique() {
        let assigner = IdentityAssigner::new(IdStrategy::Random);

        let ids: HashSet<String> = (0..10_000)
            .map(|_| assigner.assign("messageId").unwrap().id)
            .collect();

        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_random_id_is_canonical_v4() {
        let identity = IdentityAssigner::new(IdStrategy::Random)
            .assign("")
            .unwrap();

        assert_eq!(identity.id.len(), 36);
        let parsed = Uuid::parse_str(&identity.id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.hyphenated().to_string(), identity.id);
    }

    #[test]
    fn test_updated_at_is_fixed_width_microseconds() {
        let assigner = IdentityAssigner::new(IdStrategy::Random);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();

        let identity = assigner.assign_at("", now).unwrap();

        assert_eq!(identity.updated_at, "2024-03-01T09:05:07.000000Z");
        assert_eq!(
            assigner.assign("").unwrap().updated_at.len(),
            identity.updated_at.len()
        );
    }

    #[test]
    fn test_message_id_strategy_is_deterministic() {
        let assigner = IdentityAssigner::new(IdStrategy::MessageId);

        let first = assigner.assign("messageId").unwrap();
        let second = assigner.assign("messageId").unwrap();
        let other = assigner.assign("otherMessageId").unwrap();

        assert_eq!(first.id, second.id);
        assert_ne!(first.id, other.id);
        assert_eq!(Uuid::parse_str(&first.id).unwrap().get_version_num(), 5);
    }

    #[test]
    fn test_message_id_strategy_falls_back_to_random() {
        let assigner = IdentityAssigner::new(IdStrategy::MessageId);

        let first = assigner.assign("").unwrap();
        let second = assigner.assign("").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(Uuid::parse_str(&first.id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let assigner = IdentityAssigner::with_entropy(IdStrategy::Random, Arc::new(BrokenEntropy));

        assert!(assigner.assign("messageId").is_err());
    }

    #[test]
    fn test_message_id_strategy_needs_no_entropy() {
        let assigner =
            IdentityAssigner::with_entropy(IdStrategy::MessageId, Arc::new(BrokenEntropy));

        assert!(assigner.assign("messageId").is_ok());
    }

    #[test]
    fn test_id_strategy_parsing() {
        assert_eq!("random".parse(), Ok(IdStrategy::Random));
        assert_eq!("message-id".parse(), Ok(IdStrategy::MessageId));
        assert_eq!("MESSAGE_ID".parse(), Ok(IdStrategy::MessageId));
        assert!("sequential".parse::<IdStrategy>().is_err());
    }
}
