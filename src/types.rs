//! Core types shared by the encoder, the decoder and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag key used until [`Client::set_tag`](crate::Client::set_tag) is called.
pub const DEFAULT_TAG_KEY: &str = "tag";

/// Tag value used until [`Client::set_tag`](crate::Client::set_tag) is called.
pub const DEFAULT_TAG_VALUE: &str = "somevalue";

/// A single tag (`key=value`) applied to every point of one write or query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Create a new tag.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_KEY, DEFAULT_TAG_VALUE)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// One measurement sample.
///
/// `name` is the measurement name for single-value writes and query results,
/// or the field name when the point is one field of a multi-field write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Measurement or field name.
    pub name: String,
    /// Sample value.
    pub value: f64,
    /// Sample time, second precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl DataPoint {
    /// Create a new point without a timestamp.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: None,
        }
    }

    /// Attach a timestamp to the point.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Get the timestamp as epoch seconds.
    pub fn epoch_seconds(&self) -> Option<i64> {
        self.timestamp.map(|t| t.timestamp())
    }
}
