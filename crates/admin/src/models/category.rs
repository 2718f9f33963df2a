//! Category domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{BillboardId, CategoryId, StoreId};

use super::Billboard;

/// A product category, displayed under a billboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub billboard_id: BillboardId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category together with the billboard it is displayed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithBillboard {
    #[serde(flatten)]
    pub category: Category,
    pub billboard: Billboard,
}
