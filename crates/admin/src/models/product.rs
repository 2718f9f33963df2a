//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, StoreId};

use super::{Category, Color, Size};

/// A product row without its relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub name: String,
    /// Price in dollars, serialized as a decimal string.
    pub price: Price,
    /// Shown on the storefront home page.
    pub is_featured: bool,
    /// Hidden from the storefront. Set automatically once the product sells.
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product image, stored by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product with its images and resolved category, size, and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<Image>,
    pub category: Category,
    pub size: Size,
    pub color: Color,
}
