//! Order table handler.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use storehub_core::StoreId;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::OrderSummary;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/orders", get(list))
}

/// List a store's orders as dashboard table rows, newest first.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store.
pub async fn list(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    let orders = OrderRepository::new(state.pool()).list(store_id).await?;
    Ok(Json(orders.iter().map(OrderSummary::from).collect()))
}
