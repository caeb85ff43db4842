//! Warden Storage - TTL Store and Entity Resolver
//!
//! Caches entity records resolved from an authoritative store, keyed by both
//! numeric ID and tenant-scoped UID, with fixed-TTL expiry.
//! The authoritative store itself is supplied by the caller through
//! [`warden_core::AuthoritativeLookup`].

pub mod cache;

// Re-export cache types for consumers
pub use cache::{
    CacheKey, CacheRead, CacheStats, EntityCache, EntityResolver, InMemoryTtlStore, KeyKind,
    TtlStore,
};
