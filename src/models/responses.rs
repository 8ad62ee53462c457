//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::TimeToLive;

/// Body of GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: String,
}

/// Acknowledgement returned by the mutating endpoints.
///
/// `key` and `replaced` are omitted when they do not apply.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Set by PUT /set: whether a live entry was overwritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced: Option<bool>,
}

impl Ack {
    pub fn stored(key: String, replaced: bool) -> Self {
        Self {
            message: format!("Stored '{}'", key),
            key: Some(key),
            replaced: Some(replaced),
        }
    }

    pub fn deleted(key: String) -> Self {
        Self {
            message: format!("Deleted '{}'", key),
            key: Some(key),
            replaced: None,
        }
    }

    pub fn done(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
            replaced: None,
        }
    }
}

/// Body of GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Body of GET /ttl/:key
///
/// `ttl` is the remaining lifetime in seconds, null when the key never expires.
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    pub ttl: Option<f64>,
    pub expires: bool,
}

impl TtlResponse {
    pub fn new(key: String, ttl: TimeToLive) -> Self {
        Self {
            key,
            ttl: ttl.as_secs_f64(),
            expires: matches!(ttl, TimeToLive::Remaining(_)),
        }
    }
}

/// Body of GET /keys, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub count: usize,
    pub keys: Vec<String>,
}

impl From<Vec<String>> for KeysResponse {
    fn from(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Body of POST /cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Body of GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub entries: usize,
    pub sweeper_running: bool,
}

/// Error body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
