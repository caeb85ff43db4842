//! Tenant-aware read-through cache over a TTL store.
//!
//! This module provides the entity resolver and the pieces it is built from:
//! key derivation, the TTL store capability and its in-memory backend, and
//! resolution metadata.
//!
//! # Dual Keying
//!
//! An entity is addressable by numeric ID and by UID. After one successful
//! lookup it is stored under both [`CacheKey`] shapes, so the next request
//! hits the cache whichever identifier it uses.
//!
//! # Tenant Isolation
//!
//! The TTL store has no notion of tenants. The resolver embeds the tenant in
//! UID keys and compares the cached record's tenant against the caller's on
//! every read; a foreign record is never returned.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(InMemoryTtlStore::new());
//! let _janitor = store.spawn_janitor(config.cleanup_interval);
//! let resolver = EntityResolver::new(lookup, store, config)?;
//!
//! let record = resolver.resolve_by_uid("abc", &tenant, false).await?;
//! ```

pub mod key;
pub mod memory_backend;
pub mod read;
pub mod resolver;
pub mod traits;

pub use key::{CacheKey, KeyKind};
pub use memory_backend::InMemoryTtlStore;
pub use read::CacheRead;
pub use resolver::{EntityCache, EntityResolver};
pub use traits::{CacheStats, TtlStore};
