//! Product handlers.
//!
//! The public listing hides archived products; a product is archived once it
//! sells, or by hand from the dashboard.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use storehub_core::{CategoryId, ColorId, Price, ProductId, SizeId, StoreId};

use super::{required, required_text};
use crate::db::{ProductFilter, ProductInput, ProductRepository};
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::{Product, ProductDetail};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/products", get(list).post(create))
        .route(
            "/api/{store_id}/products/{product_id}",
            get(show).patch(update).delete(destroy),
        )
}

// =============================================================================
// Request Types
// =============================================================================

/// Query parameters for the public product listing.
///
/// Empty values are treated as absent so the storefront can send unset
/// filters as `?colorId=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub is_featured: Option<String>,
}

impl ProductQuery {
    fn into_filter(self) -> Result<ProductFilter, AppError> {
        Ok(ProductFilter {
            category_id: parse_id(self.category_id, "categoryId")?.map(CategoryId::new),
            color_id: parse_id(self.color_id, "colorId")?.map(ColorId::new),
            size_id: parse_id(self.size_id, "sizeId")?.map(SizeId::new),
            featured_only: self
                .is_featured
                .as_deref()
                .map(str::trim)
                .is_some_and(|v| !v.is_empty() && v != "false" && v != "0"),
            include_archived: false,
        })
    }
}

fn parse_id(value: Option<String>, field: &str) -> Result<Option<Uuid>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {field}"))),
    }
}

/// An image in a product request.
#[derive(Debug, Deserialize)]
pub struct ImageBody {
    pub url: String,
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
    pub images: Option<Vec<ImageBody>>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}

impl ProductBody {
    fn validate(self) -> Result<ProductInput, AppError> {
        let name = required_text(self.name, "Name is required")?;

        let image_urls: Vec<String> = self
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|image| image.url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if image_urls.is_empty() {
            return Err(AppError::BadRequest("Images are required".to_string()));
        }

        let price = required(self.price, "Price is required")?;
        let price = Price::listing(price).map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(ProductInput {
            name,
            price,
            category_id: required(self.category_id, "Category id is required")?,
            size_id: required(self.size_id, "Size id is required")?,
            color_id: required(self.color_id, "Color id is required")?,
            image_urls,
            is_featured: self.is_featured.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List a store's products that are for sale, newest first.
///
/// # Errors
///
/// Returns 400 on a malformed filter id.
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductDetail>>, AppError> {
    let filter = query.into_filter()?;
    Ok(Json(
        ProductRepository::new(state.pool())
            .list(store_id, filter)
            .await?,
    ))
}

/// Show a product with its images, category, size, and color.
///
/// # Errors
///
/// Returns 404 if the store has no such product.
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<Json<ProductDetail>, AppError> {
    ProductRepository::new(state.pool())
        .get(store_id, product_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Create a product with its images.
///
/// # Errors
///
/// Returns 400 on a missing field or a category, size, or color of another
/// store, 403 unless the caller owns the store.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<ProductBody>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        ProductRepository::new(state.pool())
            .create(store_id, &input)
            .await?,
    ))
}

/// Update a product, replacing its images.
///
/// # Errors
///
/// Returns 400 on a missing field or a category, size, or color of another
/// store, 403 unless the caller owns the store, and 404 if the store has no
/// such product.
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
    body: Result<Json<ProductBody>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        ProductRepository::new(state.pool())
            .update(store_id, product_id, &input)
            .await?,
    ))
}

/// Delete a product.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store, 404 if the store has no such
/// product, and 409 while orders reference it.
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<Json<Product>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        ProductRepository::new(state.pool())
            .delete(store_id, product_id)
            .await?,
    ))
}
