//! Cache key derivation for the dual-keyed entity cache.
//!
//! Every resolved entity is stored under two keys: one derived from its
//! numeric ID and one derived from its UID. Numeric IDs are globally unique,
//! so the ID key carries no tenant; UIDs are only unique per tenant, so the
//! UID key embeds the tenant. Callers cannot build a UID key without one.

use std::fmt;

use warden_core::{EntityId, EntityRef, TenantId};

/// Marker between the namespace and the tenant in UID keys.
const UID_MARKER: &str = "uid";

/// Which identifier a [`CacheKey`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Id,
    Uid,
}

/// A string key into the TTL store.
///
/// # Format
///
/// - ID key: `{namespace}-{id}`
/// - UID key: `{namespace}-uid-{tenant}-{uid}`
///
/// The two shapes cannot collide: an ID renders as an optional `-` followed
/// by digits, never as `uid-`. Within UID keys the tenant renders without
/// inner dashes, so the first `-` after it always ends the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Private - keys only come from the constructors below.
    inner: String,
    kind: KeyKind,
}

impl CacheKey {
    /// Key for an entity addressed by numeric ID.
    pub fn for_id(namespace: &str, id: EntityId) -> Self {
        Self {
            inner: format!("{}-{}", namespace, id),
            kind: KeyKind::Id,
        }
    }

    /// Key for an entity addressed by UID within `tenant_id`.
    pub fn for_uid(namespace: &str, tenant_id: TenantId, uid: &str) -> Self {
        Self {
            inner: format!("{}-{}-{}-{}", namespace, UID_MARKER, tenant_id, uid),
            kind: KeyKind::Uid,
        }
    }

    /// Key for whichever identifier `reference` carries.
    pub fn for_ref(namespace: &str, reference: &EntityRef, tenant_id: TenantId) -> Self {
        match reference {
            EntityRef::Id(id) => Self::for_id(namespace, *id),
            EntityRef::Uid(uid) => Self::for_uid(namespace, tenant_id, uid),
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_key_format() {
        let key = CacheKey::for_id("entity", EntityId::new(42));
        assert_eq!(key.as_str(), "entity-42");
        assert_eq!(key.kind(), KeyKind::Id);
    }

    #[test]
    fn test_uid_key_format() {
        let key = CacheKey::for_uid("entity", TenantId::new(7), "abc");
        assert_eq!(key.as_str(), "entity-uid-7-abc");
        assert_eq!(key.kind(), KeyKind::Uid);
    }

    #[test]
    fn test_for_ref_matches_direct_constructors() {
        let tenant = TenantId::new(7);
        assert_eq!(
            CacheKey::for_ref("ds", &EntityRef::Id(EntityId::new(3)), tenant),
            CacheKey::for_id("ds", EntityId::new(3))
        );
        assert_eq!(
            CacheKey::for_ref("ds", &EntityRef::Uid("x".to_string()), tenant),
            CacheKey::for_uid("ds", tenant, "x")
        );
    }

    #[test]
    fn test_id_key_ignores_tenant() {
        let reference = EntityRef::Id(EntityId::new(42));
        assert_eq!(
            CacheKey::for_ref("entity", &reference, TenantId::new(7)),
            CacheKey::for_ref("entity", &reference, TenantId::new(9))
        );
    }

    #[test]
    fn test_different_tenants_different_uid_keys() {
        let key1 = CacheKey::for_uid("entity", TenantId::new(7), "abc");
        let key2 = CacheKey::for_uid("entity", TenantId::new(9), "abc");
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_negative_tenant_does_not_collide() {
        // "entity-uid--1-x" vs "entity-uid-1--x"
        let key1 = CacheKey::for_uid("entity", TenantId::new(-1), "x");
        let key2 = CacheKey::for_uid("entity", TenantId::new(1), "-x");
        assert_ne!(key1.as_str(), key2.as_str());
    }

    #[test]
    fn test_namespaces_separate_keys() {
        let key1 = CacheKey::for_id("ds", EntityId::new(1));
        let key2 = CacheKey::for_id("dashboard", EntityId::new(1));
        assert_ne!(key1, key2);
    }
}
