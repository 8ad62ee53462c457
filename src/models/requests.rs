//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

use crate::cache::ttl_from_secs;
use crate::error::{CacheError, Result};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

/// Body of PUT /set
///
/// `ttl` is in seconds and may be fractional; when absent the cache default
/// applies.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub ttl: Option<f64>,
}

impl SetRequest {
    /// Checks the key and value limits and converts the TTL.
    ///
    /// # Errors
    /// `InvalidRequest` for an empty or oversized key or value, `InvalidTtl`
    /// for a negative or non-finite TTL.
    pub fn validated_ttl(&self) -> Result<Option<Duration>> {
        if self.key.is_empty() {
            return Err(CacheError::InvalidRequest("key cannot be empty".into()));
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "key is {} bytes, limit is {}",
                self.key.len(),
                MAX_KEY_LENGTH
            )));
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "value is {} bytes, limit is {}",
                self.value.len(),
                MAX_VALUE_SIZE
            )));
        }
        self.ttl.map(ttl_from_secs).transpose()
    }
}
