//! Property-Based Tests for Tenant Isolation
//!
//! For any two distinct tenants A and B and any entity owned by A, once the
//! entity is cached through A, resolution through B SHALL never return A's
//! record, whether by ID or by UID. Every resolution B performs SHALL reach
//! the authoritative store carrying B's tenant.

use std::sync::Arc;

use proptest::prelude::*;
use warden_storage::{CacheKey, EntityResolver, InMemoryTtlStore, TtlStore};
use warden_test_utils::{
    fixtures, generators, EntityRecord, EntityRef, MockLookup, ResolverConfig, TenantContext,
    TenantEntity, TenantId, WardenResult,
};

type Store = InMemoryTtlStore<Arc<EntityRecord>>;
type Resolver = EntityResolver<EntityRecord, MockLookup, Store>;

// ============================================================================
// TEST HELPERS
// ============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("Failed to create runtime")
}

fn resolver_for(record: EntityRecord) -> (Resolver, Arc<MockLookup>, Arc<Store>) {
    let lookup = Arc::new(MockLookup::with_records([record]));
    let store = Arc::new(Store::new());
    let resolver = EntityResolver::new(
        Arc::clone(&lookup),
        Arc::clone(&store),
        ResolverConfig::default(),
    )
    .expect("default config is valid");
    (resolver, lookup, store)
}

fn owned_by(result: &WardenResult<Arc<EntityRecord>>, tenant: TenantId) -> bool {
    matches!(result, Ok(record) if record.tenant_id == tenant)
}

/// Strategy for a tenant pair plus a record owned by the first tenant.
fn arb_isolation_case() -> impl Strategy<Value = (TenantId, TenantId, EntityRecord)> {
    generators::arb_distinct_tenants()
        .prop_flat_map(|(owner, other)| (Just(owner), Just(other), generators::arb_record(owner)))
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Resolution by ID through another tenant never yields the cached record.
    #[test]
    fn prop_id_resolution_is_tenant_isolated((owner, other, record) in arb_isolation_case()) {
        let rt = runtime();
        let (resolver, lookup, _) = resolver_for(record.clone());

        let (warm, foreign) = rt.block_on(async {
            let warm = resolver.resolve_by_id(record.id, &TenantContext::new(owner), false).await;
            let foreign = resolver.resolve_by_id(record.id, &TenantContext::new(other), false).await;
            (warm, foreign)
        });

        prop_assert!(owned_by(&warm, owner));
        prop_assert!(!owned_by(&foreign, owner));
        prop_assert_eq!(
            lookup.calls().last().cloned(),
            Some((EntityRef::Id(record.id), other))
        );
        prop_assert_eq!(resolver.stats().tenant_mismatches, 1);
    }

    /// Resolution by UID through another tenant never yields the cached record.
    #[test]
    fn prop_uid_resolution_is_tenant_isolated(
        (owner, other, record) in arb_isolation_case(),
        warm_by_id in any::<bool>(),
    ) {
        prop_assume!(record.entity_uid().is_some());
        let rt = runtime();
        let (resolver, lookup, _) = resolver_for(record.clone());
        let uid = record.uid.clone();

        let (warm, foreign) = rt.block_on(async {
            let owner_ctx = TenantContext::new(owner);
            let warm = if warm_by_id {
                resolver.resolve_by_id(record.id, &owner_ctx, false).await
            } else {
                resolver.resolve_by_uid(&uid, &owner_ctx, false).await
            };
            let foreign = resolver.resolve_by_uid(&uid, &TenantContext::new(other), false).await;
            (warm, foreign)
        });

        prop_assert!(owned_by(&warm, owner));
        prop_assert!(!owned_by(&foreign, owner));
        prop_assert_eq!(lookup.call_count(), 2);
        prop_assert_eq!(
            lookup.calls().last().cloned(),
            Some((EntityRef::Uid(uid), other))
        );
    }

    /// Every cached value sits under a key its own tenant could have produced.
    #[test]
    fn prop_cached_entries_match_their_keys((owner, _other, record) in arb_isolation_case()) {
        let rt = runtime();
        let (resolver, _, store) = resolver_for(record.clone());
        let config = ResolverConfig::default();

        rt.block_on(async {
            let _ = resolver.resolve_by_id(record.id, &TenantContext::new(owner), false).await;
        });

        let id_key = CacheKey::for_id(&config.key_namespace, record.id);
        let cached = store.get(id_key.as_str());
        prop_assert!(cached.map(|r| r.tenant_id == owner).unwrap_or(false));

        if let Some(uid) = record.entity_uid() {
            let uid_key = CacheKey::for_uid(&config.key_namespace, owner, uid);
            let cached = store.get(uid_key.as_str());
            prop_assert!(cached.map(|r| r.tenant_id == owner).unwrap_or(false));
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[tokio::test]
async fn test_uid_keys_partition_by_tenant() {
    let (resolver, _, store) = resolver_for(fixtures::record(7, 42, "abc"));

    resolver
        .resolve_by_uid("abc", &fixtures::tenant(7), false)
        .await
        .unwrap();

    assert!(store.get("entity-uid-7-abc").is_some());
    assert!(store.get("entity-uid-9-abc").is_none());
}
