//! Resolver configuration.
//!
//! Defaults match the short-lived lookup cache this crate was built for:
//! entries live for five seconds, keys are namespaced under `entity`, and
//! the in-memory store is swept every ten minutes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

/// Default lifetime of a cached entry.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(5);

/// Default key namespace.
pub const DEFAULT_KEY_NAMESPACE: &str = "entity";

/// Default interval between sweeps of expired entries.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(600);

/// Configuration for the entity resolver cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// TTL applied to every entry written by the resolver.
    pub entry_ttl: Duration,
    /// Prefix for cache keys. Resolvers sharing one store need distinct namespaces.
    pub key_namespace: String,
    /// How often a janitor purges expired entries from the in-memory store.
    pub cleanup_interval: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            entry_ttl: DEFAULT_ENTRY_TTL,
            key_namespace: DEFAULT_KEY_NAMESPACE.to_string(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl ResolverConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }

    /// Set the key namespace.
    pub fn with_key_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.key_namespace = namespace.into();
        self
    }

    /// Set the cleanup interval.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Create a config from environment variables.
    ///
    /// Environment variables:
    /// - `WARDEN_CACHE_TTL_MS`: entry TTL in milliseconds (default: 5000)
    /// - `WARDEN_CACHE_KEY_NAMESPACE`: key prefix (default: "entity")
    /// - `WARDEN_CACHE_CLEANUP_INTERVAL_SECS`: janitor interval (default: 600)
    ///
    /// Absent or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let entry_ttl = std::env::var("WARDEN_CACHE_TTL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.entry_ttl);

        let key_namespace = std::env::var("WARDEN_CACHE_KEY_NAMESPACE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.key_namespace);

        let cleanup_interval = std::env::var("WARDEN_CACHE_CLEANUP_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cleanup_interval);

        Self {
            entry_ttl,
            key_namespace,
            cleanup_interval,
        }
    }

    /// Reject configurations the resolver cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "entry_ttl".to_string(),
                value: format!("{:?}", self.entry_ttl),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.key_namespace.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "key_namespace".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.cleanup_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "cleanup_interval".to_string(),
                value: format!("{:?}", self.cleanup_interval),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
