//! Configuration Module
//!
//! Holds the construction-time cache parameters and loads them from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// Fixed for the lifetime of a cache once it has been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL applied when `put` omits an override, and to every refill
    pub default_ttl: Duration,
    /// Pause between eager sweep passes
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    ///
    /// Unset variables fall back to the defaults; set but unparseable ones
    /// are reported as [`CacheError::Config`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity)?,
            default_ttl: env_or("CACHE_DEFAULT_TTL_MS", millis(defaults.default_ttl))
                .map(Duration::from_millis)?,
            cleanup_interval: env_or(
                "CACHE_CLEANUP_INTERVAL_MS",
                millis(defaults.cleanup_interval),
            )
            .map(Duration::from_millis)?,
        })
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidTtl);
        }
        if self.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidCleanupInterval);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: Duration::from_secs(300),
            cleanup_interval: Duration::from_secs(1),
        }
    }
}

fn env_or<T: FromStr>(var: &str, default: T) -> Result<T> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| CacheError::Config {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}
