//! The authoritative-store collaborator.

use async_trait::async_trait;

use crate::{EntityRef, LookupError, TenantContext, TenantEntity};

/// Source-of-truth lookup that the resolver cache shields from repeated calls.
///
/// Implementations resolve `reference` strictly within `tenant`: a record
/// owned by another tenant must come back as [`LookupError::NotFound`] or
/// [`LookupError::PermissionDenied`], never as the foreign record.
///
/// Implementations may block on network or disk I/O. Timeouts and
/// cancellation belong to the caller, who drops the returned future.
#[async_trait]
pub trait AuthoritativeLookup<E: TenantEntity>: Send + Sync {
    /// Fetch the current record for `reference` on behalf of `tenant`.
    async fn lookup(&self, reference: &EntityRef, tenant: &TenantContext) -> Result<E, LookupError>;
}

