//! Warden Test Utilities
//!
//! Centralized test infrastructure for the Warden workspace:
//! - A mock authoritative store with call accounting and fault injection
//! - Proptest generators for identifiers and records
//! - Test fixtures for common scenarios
//! - Custom assertions for Warden-specific errors
//! - Test tracing setup

// Re-export core types for convenience
pub use warden_core::{
    AuthoritativeLookup, ConfigError, EntityId, EntityRecord, EntityRef, LookupError,
    ResolverConfig, TenantContext, TenantEntity, TenantId, ValidationError, WardenError,
    WardenResult,
};

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

// ============================================================================
// MOCK AUTHORITATIVE STORE
// ============================================================================

/// In-memory authoritative store for tests.
///
/// Lookups are tenant-scoped the way a real store filters by tenant: an ID
/// owned by another tenant is reported as not found. Every call is counted
/// and recorded, and failures or latency can be injected.
#[derive(Debug, Default)]
pub struct MockLookup {
    records: Mutex<Vec<EntityRecord>>,
    calls: Mutex<Vec<(EntityRef, TenantId)>>,
    call_count: AtomicU64,
    next_failure: Mutex<Option<LookupError>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        let lookup = Self::new();
        for record in records {
            lookup.insert(record);
        }
        lookup
    }

    /// Delay every lookup by `latency` (uses `tokio::time::sleep`).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert a record, replacing any record with the same ID.
    pub fn insert(&self, record: EntityRecord) {
        let mut records = lock(&self.records);
        records.retain(|r| r.id != record.id);
        records.push(record);
    }

    /// Remove the record with `id`, if present.
    pub fn remove(&self, id: EntityId) -> Option<EntityRecord> {
        let mut records = lock(&self.records);
        let idx = records.iter().position(|r| r.id == id)?;
        Some(records.remove(idx))
    }

    /// Make the next lookup fail with `error`.
    pub fn fail_next(&self, error: LookupError) {
        *lock(&self.next_failure) = Some(error);
    }

    /// Number of lookups issued so far.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every lookup issued so far, in order.
    pub fn calls(&self) -> Vec<(EntityRef, TenantId)> {
        lock(&self.calls).clone()
    }

    fn find(&self, reference: &EntityRef, tenant_id: TenantId) -> Option<EntityRecord> {
        lock(&self.records)
            .iter()
            .find(|r| {
                r.tenant_id == tenant_id
                    && match reference {
                        EntityRef::Id(id) => r.id == *id,
                        EntityRef::Uid(uid) => !r.uid.is_empty() && r.uid == *uid,
                    }
            })
            .cloned()
    }
}

#[async_trait]
impl AuthoritativeLookup<EntityRecord> for MockLookup {
    async fn lookup(
        &self,
        reference: &EntityRef,
        tenant: &TenantContext,
    ) -> Result<EntityRecord, LookupError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.calls).push((reference.clone(), tenant.tenant_id));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = lock(&self.next_failure).take() {
            return Err(error);
        }

        self.find(reference, tenant.tenant_id)
            .ok_or_else(|| LookupError::NotFound {
                reference: reference.to_string(),
                tenant_id: tenant.tenant_id,
            })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Warden types.

    use super::*;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    /// Generate an assigned (non-zero) tenant.
    pub fn arb_tenant_id() -> impl Strategy<Value = TenantId> {
        any::<i64>()
            .prop_filter("tenant must be assigned", |id| *id != 0)
            .prop_map(TenantId::new)
    }

    /// Generate two distinct assigned tenants.
    pub fn arb_distinct_tenants() -> impl Strategy<Value = (TenantId, TenantId)> {
        (arb_tenant_id(), arb_tenant_id()).prop_filter("tenants must differ", |(a, b)| a != b)
    }

    /// Generate an entity ID.
    pub fn arb_entity_id() -> impl Strategy<Value = EntityId> {
        any::<i64>().prop_map(EntityId::new)
    }

    /// Generate a non-empty UID.
    pub fn arb_uid() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,40}"
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Generate a record owned by `tenant_id`, with or without a UID.
    pub fn arb_record(tenant_id: TenantId) -> impl Strategy<Value = EntityRecord> {
        (
            arb_entity_id(),
            prop::option::of(arb_uid()),
            "[a-z][a-z0-9 ]{0,20}",
            prop_oneof![Just("prometheus"), Just("loki"), Just("postgres")],
            any::<i32>(),
            arb_timestamp(),
        )
            .prop_map(move |(id, uid, name, kind, version, created_at)| EntityRecord {
                tenant_id,
                id,
                uid: uid.unwrap_or_default(),
                name,
                kind: kind.to_string(),
                url: String::new(),
                version,
                json_data: serde_json::json!({ "version": version }),
                created_at,
                updated_at: created_at,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records and callers for common scenarios.

    use super::*;

    /// Caller in `tenant_id`.
    pub fn tenant(tenant_id: i64) -> TenantContext {
        TenantContext::new(tenant_id).with_login("tester")
    }

    /// Record `{tenant_id, id, uid}` with a fixed name and kind.
    pub fn record(tenant_id: i64, id: i64, uid: &str) -> EntityRecord {
        EntityRecord::new(TenantId::new(tenant_id), EntityId::new(id), "test-source", "prometheus")
            .with_uid(uid)
            .with_json_data(serde_json::json!({ "httpMethod": "POST" }))
    }

    /// Record with a freshly generated UID.
    pub fn record_with_generated_uid(tenant_id: i64, id: i64) -> EntityRecord {
        record(tenant_id, id, &EntityRecord::generate_uid())
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for Warden results.

    use super::*;

    /// Assert that a WardenResult is an InvalidArgument error.
    #[track_caller]
    pub fn assert_invalid_argument<T: std::fmt::Debug>(result: &WardenResult<T>) {
        match result {
            Err(WardenError::InvalidArgument(_)) => {}
            other => panic!("Expected InvalidArgument error, got: {:?}", other),
        }
    }

    /// Assert that a WardenResult is a NotFound lookup error.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &WardenResult<T>) {
        match result {
            Err(WardenError::Lookup(LookupError::NotFound { .. })) => {}
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    /// Assert that a WardenResult carries exactly `expected` from the store.
    #[track_caller]
    pub fn assert_lookup_error<T: std::fmt::Debug>(result: &WardenResult<T>, expected: &LookupError) {
        match result {
            Err(WardenError::Lookup(e)) => assert_eq!(e, expected, "Lookup error was altered"),
            other => panic!("Expected Lookup error {:?}, got: {:?}", expected, other),
        }
    }
}

// ============================================================================
// TRACING
// ============================================================================

/// Install a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to `warden_storage=debug`.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warden_storage=debug"));
    // Another test may have installed one already.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_mock_lookup_scopes_by_tenant() {
        let lookup = MockLookup::with_records([fixtures::record(7, 42, "abc")]);

        let found = lookup
            .lookup(&EntityRef::Id(EntityId::new(42)), &fixtures::tenant(7))
            .await
            .unwrap();
        assert_eq!(found.uid, "abc");

        let err = lookup
            .lookup(&EntityRef::Id(EntityId::new(42)), &fixtures::tenant(9))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound { tenant_id, .. } if tenant_id == TenantId::new(9)));

        assert_eq!(lookup.call_count(), 2);
        assert_eq!(
            lookup.calls(),
            vec![
                (EntityRef::Id(EntityId::new(42)), TenantId::new(7)),
                (EntityRef::Id(EntityId::new(42)), TenantId::new(9)),
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_lookup_by_uid() {
        let lookup = MockLookup::with_records([fixtures::record(7, 42, "abc")]);
        let found = lookup
            .lookup(&EntityRef::Uid("abc".to_string()), &fixtures::tenant(7))
            .await
            .unwrap();
        assert_eq!(found.id, EntityId::new(42));
    }

    #[tokio::test]
    async fn test_mock_lookup_fail_next_is_one_shot() {
        let lookup = MockLookup::with_records([fixtures::record(7, 1, "a")]);
        let injected = LookupError::Transport {
            reason: "connection refused".to_string(),
        };
        lookup.fail_next(injected.clone());

        let reference = EntityRef::Id(EntityId::new(1));
        assert_eq!(lookup.lookup(&reference, &fixtures::tenant(7)).await, Err(injected));
        assert!(lookup.lookup(&reference, &fixtures::tenant(7)).await.is_ok());
    }

    #[test]
    fn test_insert_replaces_and_remove() {
        let lookup = MockLookup::new();
        lookup.insert(fixtures::record(7, 1, "a"));
        lookup.insert(fixtures::record(7, 1, "b"));

        let removed = lookup.remove(EntityId::new(1)).unwrap();
        assert_eq!(removed.uid, "b");
        assert!(lookup.remove(EntityId::new(1)).is_none());
    }

    #[test]
    fn test_generated_uid_fixture() {
        let record = fixtures::record_with_generated_uid(7, 1);
        assert!(record.entity_uid().is_some());
    }

    #[test]
    fn test_assertion_invalid_argument() {
        let result: WardenResult<()> = Err(WardenError::InvalidArgument(
            ValidationError::RequiredFieldMissing {
                field: "uid".to_string(),
            },
        ));
        assertions::assert_invalid_argument(&result);
    }

    proptest! {
        #[test]
        fn prop_generated_tenants_are_assigned(tenant in generators::arb_tenant_id()) {
            prop_assert!(tenant.is_assigned());
        }

        #[test]
        fn prop_generated_records_keep_tenant(
            (tenant, record) in generators::arb_tenant_id()
                .prop_flat_map(|t| (Just(t), generators::arb_record(t)))
        ) {
            prop_assert_eq!(record.tenant_id, tenant);
            prop_assert_eq!(record.entity_uid().is_none(), record.uid.is_empty());
        }
    }
}
