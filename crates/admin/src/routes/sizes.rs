//! Size handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;

use storehub_core::{SizeId, StoreId};

use super::required_text;
use crate::db::{SizeInput, SizeRepository};
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::Size;
use crate::state::AppState;

/// Build the sizes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/sizes", get(list).post(create))
        .route(
            "/api/{store_id}/sizes/{size_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Request body for creating or updating a size.
#[derive(Debug, Deserialize)]
pub struct SizeBody {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl SizeBody {
    fn validate(self) -> Result<SizeInput, AppError> {
        Ok(SizeInput {
            name: required_text(self.name, "Name is required")?,
            value: required_text(self.value, "Value is required")?,
        })
    }
}

/// List a store's sizes.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Size>>, AppError> {
    Ok(Json(SizeRepository::new(state.pool()).list(store_id).await?))
}

/// Show a size.
///
/// # Errors
///
/// Returns 404 if the store has no such size.
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, size_id)): Path<(StoreId, SizeId)>,
) -> Result<Json<Size>, AppError> {
    SizeRepository::new(state.pool())
        .get(store_id, size_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Size not found".to_string()))
}

/// Create a size.
///
/// # Errors
///
/// Returns 400 on a missing field, 403 unless the caller owns the store.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<SizeBody>, JsonRejection>,
) -> Result<Json<Size>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        SizeRepository::new(state.pool())
            .create(store_id, &input)
            .await?,
    ))
}

/// Update a size.
///
/// # Errors
///
/// Returns 400 on a missing field, 403 unless the caller owns the store, and
/// 404 if the store has no such size.
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, size_id)): Path<(StoreId, SizeId)>,
    body: Result<Json<SizeBody>, JsonRejection>,
) -> Result<Json<Size>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        SizeRepository::new(state.pool())
            .update(store_id, size_id, &input)
            .await?,
    ))
}

/// Delete a size.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store, 404 if the store has no such
/// size, and 409 while products still use it.
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, size_id)): Path<(StoreId, SizeId)>,
) -> Result<Json<Size>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        SizeRepository::new(state.pool())
            .delete(store_id, size_id)
            .await?,
    ))
}
