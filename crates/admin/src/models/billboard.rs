//! Billboard domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{BillboardId, StoreId};

/// A banner shown at the top of a storefront category page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: BillboardId,
    pub store_id: StoreId,
    /// Headline rendered over the image.
    pub label: String,
    /// URL of an already-uploaded image.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
