//! Replication Event
//!
//! The message carried over the bus to describe a write.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};

/// A write to apply on every subscriber.
///
/// `ttl` is relative to the moment each subscriber applies the event, not an
/// absolute deadline, so delivery latency extends the effective lifetime at
/// receivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationEvent {
    pub key: String,
    pub serialized_value: String,
    #[serde(rename = "ttl_ms", with = "ttl_millis")]
    pub ttl: Duration,
}

impl ReplicationEvent {
    pub fn new(key: impl Into<String>, serialized_value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            serialized_value: serialized_value.into(),
            ttl,
        }
    }

    /// Decodes the carried value.
    pub fn value(&self) -> Result<Value> {
        serde_json::from_str(&self.serialized_value).map_err(|e| CacheError::Deserialization {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }
}

mod ttl_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
