//! Resolution results carrying provenance.

use chrono::{DateTime, Utc};

/// Result of a resolution, recording whether the cache served it.
///
/// Callers that only need the record use `resolve_by_*`; the `read_by_*`
/// variants return this wrapper instead.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    resolved_at: DateTime<Utc>,
    was_cache_hit: bool,
}

impl<T> CacheRead<T> {
    /// A value served from the cache.
    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            resolved_at: Utc::now(),
            was_cache_hit: true,
        }
    }

    /// A value fetched from the authoritative store.
    pub fn from_lookup(value: T) -> Self {
        Self {
            value,
            resolved_at: Utc::now(),
            was_cache_hit: false,
        }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// When this resolution completed.
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }

    /// Check if this was a cache miss (fetched from the authoritative store).
    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit
    }

    /// Map the inner value to a new type.
    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            resolved_at: self.resolved_at,
            was_cache_hit: self.was_cache_hit,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_read_from_cache() {
        let read = CacheRead::from_cache("test_value".to_string());
        assert!(read.was_cache_hit());
        assert!(!read.was_cache_miss());
        assert_eq!(read.value(), "test_value");
    }

    #[test]
    fn test_cache_read_from_lookup() {
        let before = Utc::now();
        let read = CacheRead::from_lookup(42i32);

        assert!(read.was_cache_miss());
        assert!(read.resolved_at() >= before);
        assert_eq!(read.into_value(), 42);
    }

    #[test]
    fn test_cache_read_map_keeps_provenance() {
        let read = CacheRead::from_cache(42i32);
        let mapped = read.map(|v| v.to_string());

        assert!(mapped.was_cache_hit());
        assert_eq!(mapped.as_ref(), "42");
    }
}
