//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

// == Cache Entry ==
/// Represents a single cache entry with its key, value and expiry metadata.
///
/// `expires_at` is measured on the monotonic clock so wall-clock adjustments
/// never resurrect or prematurely kill an entry. `created_at` is wall-clock
/// time and is only used for reporting and snapshots.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Insertion or last update time
    pub created_at: DateTime<Utc>,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// A zero TTL yields an entry that is already expired. A TTL too large to
    /// add to the current instant is treated as no expiration.
    pub fn new(key: K, value: V, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            key,
            value,
            created_at: Utc::now(),
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of the entry, clamped to zero.
    pub fn time_to_live(&self) -> TimeToLive {
        self.time_to_live_at(Instant::now())
    }

    pub fn time_to_live_at(&self, now: Instant) -> TimeToLive {
        match self.expires_at {
            Some(expires) => TimeToLive::Remaining(expires.saturating_duration_since(now)),
            None => TimeToLive::Forever,
        }
    }
}

// == Time To Live ==
/// Remaining lifetime of a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeToLive {
    /// The entry has no expiration
    Forever,
    /// The entry expires after this duration
    Remaining(Duration),
}

impl TimeToLive {
    /// Remaining seconds, or None when the entry never expires.
    pub fn as_secs_f64(&self) -> Option<f64> {
        match self {
            TimeToLive::Forever => None,
            TimeToLive::Remaining(d) => Some(d.as_secs_f64()),
        }
    }
}

// == TTL Validation ==
/// Converts caller-supplied fractional seconds into a TTL.
///
/// Negative, NaN and infinite values are rejected rather than clamped.
/// Zero is accepted and means "expires immediately". Finite values too large
/// for a `Duration` saturate to `Duration::MAX`, which never expires.
pub fn ttl_from_secs(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(CacheError::InvalidTtl(format!(
            "{} (must be a finite, non-negative number of seconds)",
            secs
        )));
    }

    Ok(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}
