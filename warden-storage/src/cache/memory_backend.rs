//! In-memory TTL store.
//!
//! A sharded concurrent map (`dashmap`) of values tagged with an absolute
//! expiry. Expired entries are never returned; they are dropped lazily on
//! read, or in bulk by [`InMemoryTtlStore::purge_expired`] and the optional
//! janitor task.
//!
//! # Time Source
//!
//! Expiry uses `tokio::time::Instant`, which follows the runtime clock. Under
//! a paused test runtime, `tokio::time::advance` moves entries toward expiry
//! without real sleeping.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::traits::TtlStore;

/// Expiry used when `now + ttl` overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Shortest janitor interval accepted.
const MIN_JANITOR_INTERVAL: Duration = Duration::from_millis(1);

struct StoreEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe in-memory store with per-entry expiry.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryTtlStore::<Arc<EntityRecord>>::new());
/// let _janitor = store.spawn_janitor(Duration::from_secs(600));
///
/// store.set("entity-42", Arc::new(record), Duration::from_secs(5));
/// assert!(store.get("entity-42").is_some());
/// ```
pub struct InMemoryTtlStore<V> {
    entries: DashMap<String, StoreEntry<V>>,
}

impl<V> InMemoryTtlStore<V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create an empty store sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut purged = 0;
        self.entries.retain(|_, entry| {
            let keep = now < entry.expires_at;
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }
}

impl<V> InMemoryTtlStore<V>
where
    V: Send + Sync + 'static,
{
    /// Spawn a background task that purges expired entries every `interval`.
    ///
    /// The task holds only a weak reference and exits once the store is
    /// dropped. Must be called from within a tokio runtime.
    pub fn spawn_janitor(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        let interval = interval.max(MIN_JANITOR_INTERVAL);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    tracing::trace!("Cache store dropped, janitor exiting");
                    break;
                };
                let purged = store.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = store.len(), "Purged expired cache entries");
                }
            }
        })
    }
}

impl<V> Default for InMemoryTtlStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlStore<V> for InMemoryTtlStore<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        // The read guard is released above; re-check so a concurrent
        // overwrite is not lost.
        if expired {
            self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        }
        None
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.entries
            .insert(key.to_string(), StoreEntry { value, expires_at });
    }
}
