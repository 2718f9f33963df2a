//! Size domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{SizeId, StoreId};

/// A size option, e.g. `Large` / `L`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: SizeId,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
