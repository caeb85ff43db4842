//! Entity records and the identifiers used to address them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{EntityId, TenantContext, TenantId, ValidationError};

/// Capability trait for records that can be resolved and cached.
///
/// # Implementation Requirements
///
/// - `tenant_id()` must return the tenant that owns this entity
/// - `entity_id()` must return the globally unique numeric identifier
/// - `entity_uid()` must return `None` when no UID is assigned (never `Some("")`)
/// - Implementations must be `Send + Sync + 'static` so cached values can be
///   shared across tasks
pub trait TenantEntity: Send + Sync + 'static {
    /// Get the tenant that owns this entity.
    fn tenant_id(&self) -> TenantId;

    /// Get the numeric identifier for this entity.
    fn entity_id(&self) -> EntityId;

    /// Get the tenant-scoped stable identifier, if one is assigned.
    fn entity_uid(&self) -> Option<&str>;
}

/// How a caller addresses an entity: by numeric ID or by tenant-scoped UID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Id(EntityId),
    Uid(String),
}

impl EntityRef {
    /// Check the reference is usable by `tenant` before touching any store.
    ///
    /// Numeric IDs are accepted as-is. UIDs are only meaningful inside a
    /// tenant, so an empty UID or an unassigned tenant is rejected.
    pub fn validate(&self, tenant: &TenantContext) -> Result<(), ValidationError> {
        match self {
            Self::Id(_) => Ok(()),
            Self::Uid(uid) => {
                if uid.is_empty() {
                    return Err(ValidationError::RequiredFieldMissing {
                        field: "uid".to_string(),
                    });
                }
                if !tenant.tenant_id.is_assigned() {
                    return Err(ValidationError::RequiredFieldMissing {
                        field: "tenant_id".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={}", id),
            Self::Uid(uid) => write!(f, "uid={}", uid),
        }
    }
}

/// A resolvable entity as held by the authoritative store.
///
/// Only `tenant_id`, `id` and `uid` matter to the cache; the remaining
/// fields travel through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub tenant_id: TenantId,
    pub id: EntityId,
    /// Empty when no UID has been assigned.
    #[serde(default)]
    pub uid: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub url: String,
    pub version: i32,
    #[serde(default)]
    pub json_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntityRecord {
    /// Create a record with no UID and an empty payload.
    pub fn new(
        tenant_id: TenantId,
        id: EntityId,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            tenant_id,
            id,
            uid: String::new(),
            name: name.into(),
            kind: kind.into(),
            url: String::new(),
            version: 1,
            json_data: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Set the opaque JSON payload.
    pub fn with_json_data(mut self, json_data: serde_json::Value) -> Self {
        self.json_data = json_data;
        self
    }

    /// Generate a fresh UID for stores that assign one on insert.
    ///
    /// UUIDv7 in simple (hyphen-free) form, so UIDs sort by creation time.
    pub fn generate_uid() -> String {
        Uuid::now_v7().simple().to_string()
    }
}

impl TenantEntity for EntityRecord {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn entity_uid(&self) -> Option<&str> {
        if self.uid.is_empty() {
            None
        } else {
            Some(&self.uid)
        }
    }
}
