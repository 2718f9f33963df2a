//! HTTP route handlers for the store admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness
//! GET  /health/ready                        - Readiness (database ping)
//!
//! # Stores (signed in)
//! GET    /api/stores                        - Caller's stores
//! POST   /api/stores                        - Create store
//! GET    /api/stores/{store_id}             - Store detail
//! PATCH  /api/stores/{store_id}             - Rename store
//! DELETE /api/stores/{store_id}             - Delete store
//!
//! # Catalog (reads public, writes owner-only)
//! GET    /api/{store_id}/billboards[/{id}]
//! POST   /api/{store_id}/billboards
//! PATCH  /api/{store_id}/billboards/{id}
//! DELETE /api/{store_id}/billboards/{id}
//! ...same shape for categories, sizes, colors, products
//!
//! # Sales (owner-only)
//! GET  /api/{store_id}/orders               - Order table rows
//! GET  /api/{store_id}/dashboard            - Revenue, sales, stock, graph
//!
//! # Checkout
//! POST /api/{store_id}/checkout             - Start Stripe checkout (public, CORS)
//! POST /api/webhook                         - Stripe webhook (signed)
//! ```
//!
//! Owner routes check in this order: authentication (401), request
//! validation (400), store ownership (403), then the operation.

pub mod billboards;
pub mod categories;
pub mod checkout;
pub mod colors;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod sizes;
pub mod stores;
pub mod webhook;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Create all routes for the admin API.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(stores::router())
        .merge(billboards::router())
        .merge(categories::router())
        .merge(sizes::router())
        .merge(colors::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(dashboard::router())
        .merge(checkout::router(state.config()))
        .merge(webhook::router())
}

/// Trimmed value of a required text field.
///
/// Missing, empty, and whitespace-only values are rejected with `message`.
pub(crate) fn required_text(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

/// A required field of any other type.
pub(crate) fn required<T>(value: Option<T>, message: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(message.to_string()))
}
