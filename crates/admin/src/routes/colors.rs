//! Color handlers.
//!
//! Color values must be hex colors such as `#1a2b3c`.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;

use storehub_core::{ColorId, HexColor, StoreId};

use super::required_text;
use crate::db::{ColorInput, ColorRepository};
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::Color;
use crate::state::AppState;

/// Build the colors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/colors", get(list).post(create))
        .route(
            "/api/{store_id}/colors/{color_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Request body for creating or updating a color.
#[derive(Debug, Deserialize)]
pub struct ColorBody {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl ColorBody {
    fn validate(self) -> Result<ColorInput, AppError> {
        let name = required_text(self.name, "Name is required")?;
        let value = required_text(self.value, "Value is required")?;
        let value = HexColor::parse(&value)
            .map_err(|e| AppError::BadRequest(format!("Invalid color value: {e}")))?;

        Ok(ColorInput { name, value })
    }
}

/// List a store's colors.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Color>>, AppError> {
    Ok(Json(ColorRepository::new(state.pool()).list(store_id).await?))
}

/// Show a color.
///
/// # Errors
///
/// Returns 404 if the store has no such color.
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, color_id)): Path<(StoreId, ColorId)>,
) -> Result<Json<Color>, AppError> {
    ColorRepository::new(state.pool())
        .get(store_id, color_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Color not found".to_string()))
}

/// Create a color.
///
/// # Errors
///
/// Returns 400 on a missing field or invalid hex value, 403 unless the caller
/// owns the store.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<ColorBody>, JsonRejection>,
) -> Result<Json<Color>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        ColorRepository::new(state.pool())
            .create(store_id, &input)
            .await?,
    ))
}

/// Update a color.
///
/// # Errors
///
/// Returns 400 on a missing field or invalid hex value, 403 unless the caller
/// owns the store, and 404 if the store has no such color.
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, color_id)): Path<(StoreId, ColorId)>,
    body: Result<Json<ColorBody>, JsonRejection>,
) -> Result<Json<Color>, AppError> {
    let Json(body) = body?;
    let input = body.validate()?;
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        ColorRepository::new(state.pool())
            .update(store_id, color_id, &input)
            .await?,
    ))
}

/// Delete a color.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store, 404 if the store has no such
/// color, and 409 while products still use it.
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, color_id)): Path<(StoreId, ColorId)>,
) -> Result<Json<Color>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    Ok(Json(
        ColorRepository::new(state.pool())
            .delete(store_id, color_id)
            .await?,
    ))
}
