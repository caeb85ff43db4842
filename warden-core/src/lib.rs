//! Warden Core - Entity Types
//!
//! Identifiers, the caller's tenant context, the cached entity record, the
//! authoritative-lookup collaborator trait, configuration and errors.
//! This crate contains no caching behaviour; see `warden-storage`.

pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod lookup;

pub use config::{ResolverConfig, DEFAULT_CLEANUP_INTERVAL, DEFAULT_ENTRY_TTL, DEFAULT_KEY_NAMESPACE};
pub use entity::{EntityRecord, EntityRef, TenantEntity};
pub use error::{ConfigError, LookupError, ValidationError, WardenError, WardenResult};
pub use identity::{EntityId, TenantContext, TenantId};
pub use lookup::AuthoritativeLookup;
