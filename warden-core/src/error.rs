//! Error types for Warden operations

use crate::TenantId;
use thiserror::Error;

/// Client-side argument errors, raised before any cache or store access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Errors surfaced by the authoritative store.
///
/// The resolver never inspects or retries these; they reach the caller
/// exactly as the store produced them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Entity not found: {reference} in tenant {tenant_id}")]
    NotFound { reference: String, tenant_id: TenantId },

    #[error("Permission denied in tenant {tenant_id}: {reason}")]
    PermissionDenied { tenant_id: TenantId, reason: String },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Warden errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WardenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl WardenError {
    /// Returns true for caller mistakes (empty UID, missing tenant).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns the underlying authoritative-store error, if any.
    pub fn as_lookup(&self) -> Option<&LookupError> {
        match self {
            Self::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for Warden operations.
pub type WardenResult<T> = Result<T, WardenError>;

// =============================================================================
// TESTS
// =============================================================================
