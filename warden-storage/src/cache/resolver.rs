//! Tenant-aware entity resolver cache.
//!
//! Resolves an entity by numeric ID or by UID, serving from the TTL store
//! when possible and falling back to the authoritative store otherwise.
//! Every successful lookup populates both the ID key and the UID key, so a
//! record first resolved one way is a cache hit the other way.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use warden_core::{
    AuthoritativeLookup, EntityId, EntityRef, ResolverConfig, TenantContext, TenantEntity,
    WardenResult,
};

use super::key::CacheKey;
use super::read::CacheRead;
use super::traits::{CacheStats, TtlStore};

/// Consumer-facing resolution interface.
///
/// Higher layers depend on `Arc<dyn EntityCache<E>>` rather than on a
/// concrete resolver, so tests can substitute their own.
#[async_trait]
pub trait EntityCache<E: TenantEntity>: Send + Sync {
    /// Resolve an entity by numeric ID on behalf of `tenant`.
    async fn resolve_by_id(
        &self,
        id: EntityId,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<Arc<E>>;

    /// Resolve an entity by UID within `tenant`.
    async fn resolve_by_uid(
        &self,
        uid: &str,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<Arc<E>>;
}

#[derive(Debug, Default)]
struct ResolverCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    lookups: AtomicU64,
    lookup_failures: AtomicU64,
    tenant_mismatches: AtomicU64,
}

impl ResolverCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
            tenant_mismatches: self.tenant_mismatches.load(Ordering::Relaxed),
        }
    }
}

/// Read-through resolver in front of an authoritative store.
///
/// # Type Parameters
///
/// - `E`: The entity type being resolved
/// - `L`: The authoritative lookup consulted on cache miss
/// - `S`: The TTL store holding shared `Arc<E>` values
///
/// # Tenant Isolation
///
/// UID keys embed the tenant; ID keys do not, because numeric IDs are
/// globally unique. Every cache read re-checks that the cached record's
/// tenant equals the caller's. A mismatch is a plain miss: the caller's
/// own tenant is then sent to the authoritative store, which answers with
/// the right record or an error.
///
/// # Concurrency
///
/// The resolver holds no lock. Concurrent misses for the same identifier
/// may each reach the authoritative store and each write the same keys;
/// the last write wins.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryTtlStore::new());
/// let resolver = EntityResolver::new(lookup, store, ResolverConfig::default())?;
///
/// let record = resolver.resolve_by_id(EntityId::new(42), &tenant, false).await?;
/// // Now also cached under its UID.
/// let same = resolver.resolve_by_uid(&record.uid, &tenant, false).await?;
/// ```
pub struct EntityResolver<E, L, S>
where
    L: ?Sized,
    S: ?Sized,
{
    lookup: Arc<L>,
    store: Arc<S>,
    config: ResolverConfig,
    counters: Arc<ResolverCounters>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, L, S> EntityResolver<E, L, S>
where
    E: TenantEntity,
    L: AuthoritativeLookup<E> + ?Sized,
    S: TtlStore<Arc<E>> + ?Sized,
{
    /// Create a resolver, rejecting an invalid configuration.
    pub fn new(lookup: Arc<L>, store: Arc<S>, config: ResolverConfig) -> WardenResult<Self> {
        config.validate()?;
        Ok(Self {
            lookup,
            store,
            config,
            counters: Arc::new(ResolverCounters::default()),
            _entity: PhantomData,
        })
    }

    /// Create a resolver with the default configuration (5 second TTL).
    pub fn with_defaults(lookup: Arc<L>, store: Arc<S>) -> Self {
        Self {
            lookup,
            store,
            config: ResolverConfig::default(),
            counters: Arc::new(ResolverCounters::default()),
            _entity: PhantomData,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Get a reference to the TTL store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Resolve an entity by numeric ID.
    ///
    /// With `skip_cache` the cache is not read, but a successful lookup is
    /// still written back.
    pub async fn resolve_by_id(
        &self,
        id: EntityId,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<Arc<E>> {
        self.read_by_id(id, tenant, skip_cache)
            .await
            .map(CacheRead::into_value)
    }

    /// Resolve an entity by UID within the caller's tenant.
    ///
    /// Fails with `InvalidArgument` for an empty UID or an unassigned
    /// tenant, before the cache or the authoritative store is touched.
    pub async fn resolve_by_uid(
        &self,
        uid: &str,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<Arc<E>> {
        self.read_by_uid(uid, tenant, skip_cache)
            .await
            .map(CacheRead::into_value)
    }

    /// Like [`Self::resolve_by_id`], also reporting whether the cache served it.
    pub async fn read_by_id(
        &self,
        id: EntityId,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<CacheRead<Arc<E>>> {
        self.resolve(EntityRef::Id(id), tenant, skip_cache).await
    }

    /// Like [`Self::resolve_by_uid`], also reporting whether the cache served it.
    pub async fn read_by_uid(
        &self,
        uid: &str,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<CacheRead<Arc<E>>> {
        self.resolve(EntityRef::Uid(uid.to_string()), tenant, skip_cache)
            .await
    }

    async fn resolve(
        &self,
        reference: EntityRef,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<CacheRead<Arc<E>>> {
        reference.validate(tenant)?;

        let key = CacheKey::for_ref(&self.config.key_namespace, &reference, tenant.tenant_id);

        if !skip_cache {
            if let Some(entity) = self.cached_for_tenant(&key, tenant) {
                ResolverCounters::bump(&self.counters.hits);
                tracing::trace!(key = %key, tenant_id = %tenant.tenant_id, "Entity served from cache");
                return Ok(CacheRead::from_cache(entity));
            }
        }
        ResolverCounters::bump(&self.counters.misses);

        tracing::debug!(
            reference = %reference,
            tenant_id = %tenant.tenant_id,
            login = ?tenant.login,
            skip_cache,
            "Querying authoritative store for entity"
        );
        ResolverCounters::bump(&self.counters.lookups);

        let entity = match self.lookup.lookup(&reference, tenant).await {
            Ok(entity) => Arc::new(entity),
            Err(e) => {
                ResolverCounters::bump(&self.counters.lookup_failures);
                tracing::debug!(
                    reference = %reference,
                    tenant_id = %tenant.tenant_id,
                    error = %e,
                    "Authoritative lookup failed"
                );
                return Err(e.into());
            }
        };

        self.populate(&key, &entity);
        Ok(CacheRead::from_lookup(entity))
    }

    /// Read `key`, treating an entry owned by another tenant as absent.
    fn cached_for_tenant(&self, key: &CacheKey, tenant: &TenantContext) -> Option<Arc<E>> {
        let cached = self.store.get(key.as_str())?;
        if cached.tenant_id() == tenant.tenant_id {
            return Some(cached);
        }

        ResolverCounters::bump(&self.counters.tenant_mismatches);
        tracing::debug!(
            key = %key,
            cached_tenant_id = %cached.tenant_id(),
            tenant_id = %tenant.tenant_id,
            "Cached entity belongs to another tenant, resolving again"
        );
        None
    }

    /// Write `entity` under the requested key and under the keys derived
    /// from the record itself.
    fn populate(&self, requested: &CacheKey, entity: &Arc<E>) {
        let namespace = &self.config.key_namespace;
        let ttl = self.config.entry_ttl;

        if let Some(uid) = entity.entity_uid() {
            let uid_key = CacheKey::for_uid(namespace, entity.tenant_id(), uid);
            if &uid_key != requested {
                self.store.set(uid_key.as_str(), Arc::clone(entity), ttl);
            }
        }

        let id_key = CacheKey::for_id(namespace, entity.entity_id());
        if &id_key != requested {
            self.store.set(id_key.as_str(), Arc::clone(entity), ttl);
        }

        self.store.set(requested.as_str(), Arc::clone(entity), ttl);
    }
}

#[async_trait]
impl<E, L, S> EntityCache<E> for EntityResolver<E, L, S>
where
    E: TenantEntity,
    L: AuthoritativeLookup<E> + ?Sized,
    S: TtlStore<Arc<E>> + ?Sized,
{
    async fn resolve_by_id(
        &self,
        id: EntityId,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<Arc<E>> {
        self.read_by_id(id, tenant, skip_cache)
            .await
            .map(CacheRead::into_value)
    }

    async fn resolve_by_uid(
        &self,
        uid: &str,
        tenant: &TenantContext,
        skip_cache: bool,
    ) -> WardenResult<Arc<E>> {
        self.read_by_uid(uid, tenant, skip_cache)
            .await
            .map(CacheRead::into_value)
    }
}

impl<E, L, S> Clone for EntityResolver<E, L, S>
where
    L: ?Sized,
    S: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            counters: Arc::clone(&self.counters),
            _entity: PhantomData,
        }
    }
}
