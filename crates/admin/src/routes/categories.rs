//! Category handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;

use storehub_core::{BillboardId, CategoryId, StoreId};

use super::{required, required_text};
use crate::db::{CategoryInput, CategoryRepository};
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::{Category, CategoryWithBillboard};
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/categories", get(list).post(create))
        .route(
            "/api/{store_id}/categories/{category_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Request body for creating or updating a category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    pub name: Option<String>,
    pub billboard_id: Option<BillboardId>,
}

impl CategoryBody {
    fn validate(self) -> Result<CategoryInput, AppError> {
        Ok(CategoryInput {
            name: required_text(self.name, "Name is required")?,
            billboard_id: required(self.billboard_id, "Billboard id is required")?,
        })
    }
}

/// List a store's categories with their billboards.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<CategoryWithBillboard>>, AppError> {
    Ok(Json(
        CategoryRepository::new(state.pool()).list(store_id).await?,
    ))
}

/// Show a category with its billboard.
///
/// # Errors
///
/// Returns 404 if the store has no such category.
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(StoreId, CategoryId)>,
) -> Result<Json<CategoryWithBillboard>, AppError> {
    CategoryRepository::new(state.pool())
        .get(store_id, category_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

/// Create a category.
///
/// # Errors
///
/// Returns 400 on a missing field or a billboard of another store, 403
/// unless the caller owns the store.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        CategoryRepository::new(state.pool())
            .create(store_id, &input)
            .await?,
    ))
}

/// Update a category.
///
/// # Errors
///
/// Returns 400 on a missing field or a billboard of another store, 403
/// unless the caller owns the store, and 404 if the store has no such
/// category.
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(StoreId, CategoryId)>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        CategoryRepository::new(state.pool())
            .update(store_id, category_id, &input)
            .await?,
    ))
}

/// Delete a category.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store, 404 if the store has no such
/// category, and 409 while products still use it.
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(StoreId, CategoryId)>,
) -> Result<Json<Category>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        CategoryRepository::new(state.pool())
            .delete(store_id, category_id)
            .await?,
    ))
}
