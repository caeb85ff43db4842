//! TTL store trait and cache statistics.
//!
//! This module defines the storage capability the resolver writes through,
//! and the counters it reports.

use std::time::Duration;

/// Generic string-keyed store with per-entry expiry.
///
/// The store knows nothing about tenants; tenant isolation is enforced by
/// the resolver through key derivation and ownership checks.
///
/// # Concurrency
///
/// Implementations must allow concurrent `get`/`set` from many tasks
/// without external locking. The resolver holds no lock of its own.
///
/// # Expiry
///
/// `get` must return `None` once `ttl` has elapsed since the matching `set`.
/// An entry is never returned at or past its expiry.
pub trait TtlStore<V>: Send + Sync {
    /// Get an unexpired value.
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or overwrite a value that expires after `ttl`.
    fn set(&self, key: &str, value: V, ttl: Duration);
}

/// Statistics about resolver usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of requests served from the cache.
    pub hits: u64,
    /// Number of requests that went to the authoritative store.
    pub misses: u64,
    /// Number of authoritative lookups issued.
    pub lookups: u64,
    /// Number of authoritative lookups that failed.
    pub lookup_failures: u64,
    /// Number of cached entries rejected because another tenant owns them.
    pub tenant_mismatches: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
