//! Store (tenant) handlers.
//!
//! Every route here is scoped to the signed-in user; another user's store
//! answers 404, as if it did not exist.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use storehub_core::StoreId;

use super::required_text;
use crate::db::StoreRepository;
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::models::Store;
use crate::state::AppState;

/// Build the stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stores", get(list).post(create))
        .route(
            "/api/stores/{store_id}",
            get(show).patch(rename).delete(destroy),
        )
}

/// Request body for creating or renaming a store.
#[derive(Debug, Deserialize)]
pub struct StoreBody {
    pub name: Option<String>,
}

/// List the caller's stores, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = StoreRepository::new(state.pool())
        .list_for_user(&user.id)
        .await?;
    Ok(Json(stores))
}

/// Create a store owned by the caller.
///
/// # Errors
///
/// Returns 400 if the name is blank.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    body: Result<Json<StoreBody>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let Json(body) = body?;
    let name = required_text(body.name, "Name is required")?;

    let store = StoreRepository::new(state.pool())
        .create(&user.id, &name)
        .await?;

    info!(store_id = %store.id, "Store created");
    Ok(Json(store))
}

/// Show one of the caller's stores.
///
/// # Errors
///
/// Returns 404 unless the caller owns the store.
pub async fn show(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>, AppError> {
    StoreRepository::new(state.pool())
        .get_for_user(store_id, &user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
}

/// Rename one of the caller's stores.
///
/// # Errors
///
/// Returns 400 if the name is blank, 404 unless the caller owns the store.
pub async fn rename(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<StoreBody>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let Json(body) = body?;
    let name = required_text(body.name, "Name is required")?;

    let store = StoreRepository::new(state.pool())
        .rename(store_id, &user.id, &name)
        .await?;
    Ok(Json(store))
}

/// Delete one of the caller's stores.
///
/// # Errors
///
/// Returns 404 unless the caller owns the store, 409 while it still has
/// catalog rows or orders.
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>, AppError> {
    let store = StoreRepository::new(state.pool())
        .delete(store_id, &user.id)
        .await?;

    info!(store_id = %store.id, "Store deleted");
    Ok(Json(store))
}
