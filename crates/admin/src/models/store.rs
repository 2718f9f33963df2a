//! Store (tenant) domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{StoreId, UserId};

/// A store owned by a single user. Every catalog entity belongs to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Owner, as issued by the identity provider.
    pub user_id: UserId,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}
