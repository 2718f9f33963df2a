//! Store overview figures.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use storehub_core::StoreId;
use storehub_core::analytics::{monthly_revenue, total_revenue};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::middleware::{RequireUser, ensure_store_owner};
use crate::models::DashboardSummary;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/dashboard", get(summary))
}

/// Revenue, sales count, stock count, and the monthly revenue graph.
///
/// Revenue is computed from the current prices of the products on paid
/// orders.
///
/// # Errors
///
/// Returns 403 unless the caller owns the store.
pub async fn summary(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<DashboardSummary>, AppError> {
    ensure_store_owner(state.pool(), store_id, &user).await?;

    let orders = OrderRepository::new(state.pool());
    let paid = orders.paid_orders(store_id).await?;
    let sales_count = orders.count_paid(store_id).await?;
    let stock_count = ProductRepository::new(state.pool())
        .count_in_stock(store_id)
        .await?;

    Ok(Json(DashboardSummary {
        total_revenue: total_revenue(&paid),
        sales_count,
        stock_count,
        graph_revenue: monthly_revenue(&paid),
    }))
}
