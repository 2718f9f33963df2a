//! Color domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{ColorId, HexColor, StoreId};

/// A color option with a validated hex value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: ColorId,
    pub store_id: StoreId,
    pub name: String,
    pub value: HexColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
