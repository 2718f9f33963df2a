//! Billboard handlers.
//!
//! Reads are public so the storefront can render category headers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;

use storehub_core::{BillboardId, StoreId};

use super::required_text;
use crate::db::{BillboardInput, BillboardRepository};
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::Billboard;
use crate::state::AppState;

/// Build the billboards router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/billboards", get(list).post(create))
        .route(
            "/api/{store_id}/billboards/{billboard_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Request body for creating or updating a billboard.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardBody {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

impl BillboardBody {
    fn validate(self) -> Result<BillboardInput, AppError> {
        Ok(BillboardInput {
            label: required_text(self.label, "Label is required")?,
            image_url: required_text(self.image_url, "Image URL is required")?,
        })
    }
}

/// List a store's billboards.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let billboards = BillboardRepository::new(state.pool()).list(store_id).await?;
    Ok(Json(billboards))
}

/// Show a billboard.
///
/// # Errors
///
/// Returns 404 if the store has no such billboard.
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(StoreId, BillboardId)>,
) -> Result<Json<Billboard>, AppError> {
    BillboardRepository::new(state.pool())
        .get(store_id, billboard_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Billboard not found".to_string()))
}

/// Create a billboard.
///
/// # Errors
///
/// Returns 400 on a missing field, 403 unless the caller owns the store.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<BillboardBody>, JsonRejection>,
) -> Result<Json<Billboard>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    let billboard = BillboardRepository::new(state.pool())
        .create(store_id, &input)
        .await?;
    Ok(Json(billboard))
}

/// Update a billboard.
///
/// # Errors
///
/// Returns 400 on a missing field, 403 unless the caller owns the store, and
/// 404 if the store has no such billboard.
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(StoreId, BillboardId)>,
    body: Result<Json<BillboardBody>, JsonRejection>,
) -> Result<Json<Billboard>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    let billboard = BillboardRepository::new(state.pool())
        .update(store_id, billboard_id, &input)
        .await?;
    Ok(Json(billboard))
}

/// Delete a billboard.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store, 404 if the store has no such
/// billboard, and 409 while categories still use it.
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(StoreId, BillboardId)>,
) -> Result<Json<Billboard>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    let billboard = BillboardRepository::new(state.pool())
        .delete(store_id, billboard_id)
        .await?;
    Ok(Json(billboard))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_body_requires_label_then_image() {
        let body: BillboardBody = serde_json::from_str(r#"{"imageUrl":"https://x/y.png"}"#).unwrap();
        assert!(matches!(body.validate(), Err(AppError::BadRequest(m)) if m == "Label is required"));

        let body: BillboardBody = serde_json::from_str(r#"{"label":"Summer"}"#).unwrap();
        assert!(matches!(body.validate(), Err(AppError::BadRequest(m)) if m == "Image URL is required"));
    }

    #[test]
    fn test_body_reads_camel_case() {
        let body: BillboardBody =
            serde_json::from_str(r#"{"label":" Summer ","imageUrl":"https://x/y.png"}"#).unwrap();
        let input = body.validate().unwrap();
        assert_eq!(input.label, "Summer");
        assert_eq!(input.image_url, "https://x/y.png");
    }
}
