//! Configuration Module
//!
//! Handles cache construction parameters and loading server configuration
//! from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::ttl_from_secs;

/// Default interval between background sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest interval the sweeper will run at
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Default maximum number of entries removed per sweeper lock acquisition
pub const DEFAULT_SWEEP_BATCH: usize = 1024;

// == Cache Config ==
/// Parameters for building a [`crate::cache::Cache`].
///
/// # Example
/// ```
/// use lrutide::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::new(500)
///     .with_default_ttl(Duration::from_secs(60))
///     .with_sweep_interval(Duration::from_secs(1));
/// assert_eq!(config.capacity, 500);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries, must be at least 1
    pub capacity: usize,
    /// TTL for puts that do not specify one, None = never expire
    pub default_ttl: Option<Duration>,
    /// Interval between background sweeps
    pub sweep_interval: Duration,
    /// Maximum entries a sweep removes before releasing the lock
    pub sweep_batch: usize,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            default_ttl: None,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            sweep_batch: DEFAULT_SWEEP_BATCH,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets the sweep interval. Values below [`MIN_SWEEP_INTERVAL`] are raised to it.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(MIN_SWEEP_INTERVAL);
        self
    }

    /// Sets the sweep batch size. Zero is raised to one.
    pub fn with_sweep_batch(mut self, batch: usize) -> Self {
        self.sweep_batch = batch.max(1);
        self
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL for entries without explicit TTL, None = never expire
    pub default_ttl: Option<Duration>,
    /// Background cleanup task interval
    pub cleanup_interval: Duration,
    /// Maximum expired entries removed per lock acquisition
    pub sweep_batch: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Snapshot file loaded at startup and written at shutdown
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, fractional allowed (default: none)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds, fractional allowed (default: 5)
    /// - `SWEEP_BATCH` - Entries removed per sweep lock acquisition (default: 1024)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SNAPSHOT_PATH` - Snapshot file path (default: none)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_entries: parse_var::<usize>("MAX_ENTRIES")
                .filter(|&n| n >= 1)
                .unwrap_or(defaults.max_entries),
            default_ttl: secs_var("DEFAULT_TTL").or(defaults.default_ttl),
            cleanup_interval: secs_var("CLEANUP_INTERVAL")
                .filter(|d| !d.is_zero())
                .unwrap_or(defaults.cleanup_interval),
            sweep_batch: parse_var::<usize>("SWEEP_BATCH")
                .filter(|&n| n >= 1)
                .unwrap_or(defaults.sweep_batch),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            snapshot_path: env::var_os("SNAPSHOT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Builds the cache parameters described by this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.max_entries,
            default_ttl: self.default_ttl,
            sweep_interval: self.cleanup_interval,
            sweep_batch: self.sweep_batch,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: None,
            cleanup_interval: DEFAULT_SWEEP_INTERVAL,
            sweep_batch: DEFAULT_SWEEP_BATCH,
            server_port: 3000,
            snapshot_path: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn secs_var(name: &str) -> Option<Duration> {
    parse_var::<f64>(name).and_then(|secs| ttl_from_secs(secs).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, Duration::from_secs(5));
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        for name in [
            "MAX_ENTRIES",
            "DEFAULT_TTL",
            "CLEANUP_INTERVAL",
            "SWEEP_BATCH",
            "SERVER_PORT",
            "SNAPSHOT_PATH",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.server_port, 3000);

        env::set_var("MAX_ENTRIES", "42");
        env::set_var("DEFAULT_TTL", "1.5");
        env::set_var("CLEANUP_INTERVAL", "0.25");
        env::set_var("SNAPSHOT_PATH", "/tmp/lrutide.json");
        let config = Config::from_env();
        assert_eq!(config.max_entries, 42);
        assert_eq!(config.default_ttl, Some(Duration::from_millis(1500)));
        assert_eq!(config.cleanup_interval, Duration::from_millis(250));
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/lrutide.json")));

        env::set_var("MAX_ENTRIES", "0");
        env::set_var("DEFAULT_TTL", "-3");
        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, None);

        for name in ["MAX_ENTRIES", "DEFAULT_TTL", "CLEANUP_INTERVAL", "SNAPSHOT_PATH"] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new(10)
            .with_default_ttl(Duration::from_secs(3))
            .with_sweep_interval(Duration::from_millis(100))
            .with_sweep_batch(0);

        assert_eq!(config.capacity, 10);
        assert_eq!(config.default_ttl, Some(Duration::from_secs(3)));
        assert_eq!(config.sweep_interval, Duration::from_millis(100));
        assert_eq!(config.sweep_batch, 1);
    }

    #[test]
    fn test_zero_sweep_interval_is_raised() {
        let config = CacheConfig::new(10).with_sweep_interval(Duration::ZERO);
        assert_eq!(config.sweep_interval, MIN_SWEEP_INTERVAL);
    }

    #[test]
    fn test_cache_config_from_server_config() {
        let config = Config {
            max_entries: 7,
            default_ttl: Some(Duration::from_secs(2)),
            ..Config::default()
        };
        let cache_config = config.cache_config();
        assert_eq!(cache_config.capacity, 7);
        assert_eq!(cache_config.default_ttl, Some(Duration::from_secs(2)));
    }
}
