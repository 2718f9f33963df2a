//! Stripe webhook.
//!
//! Only `checkout.session.completed` changes anything: it marks the order
//! named in the session metadata paid, records the customer's address and
//! phone, and archives the products sold. Replays are harmless because an
//! order is only updated while unpaid.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tracing::{debug, info, warn};

use storehub_core::OrderId;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::state::AppState;
use crate::stripe::{CHECKOUT_SESSION_COMPLETED, CheckoutSessionCompleted};

/// Header carrying the webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// Build the webhook router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/webhook", post(handle))
}

/// Verify and apply a Stripe event.
///
/// # Errors
///
/// Returns 400 (`Webhook Error: ...`) if the signature does not verify or a
/// completed checkout carries no usable order id.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: String,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Webhook("Missing Stripe-Signature header".to_string()))?;

    let event = state
        .stripe()
        .verify_webhook(&payload, signature)
        .map_err(|e| AppError::Webhook(e.to_string()))?;

    if event.event_type != CHECKOUT_SESSION_COMPLETED {
        debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring Stripe event");
        return Ok(StatusCode::OK);
    }

    let session: CheckoutSessionCompleted = serde_json::from_value(event.data.object)
        .map_err(|e| AppError::Webhook(format!("Invalid checkout session: {e}")))?;

    let order_id: OrderId = session
        .order_id()
        .ok_or_else(|| AppError::Webhook("Missing orderId in session metadata".to_string()))?
        .parse()
        .map_err(|_| AppError::Webhook("Invalid orderId in session metadata".to_string()))?;

    let updated = OrderRepository::new(state.pool())
        .mark_paid(order_id, &session.address(), &session.phone())
        .await?;

    match updated {
        Some(update) => info!(
            event_id = %event.id,
            order_id = %order_id,
            archived_products = update.archived_products,
            "Order paid"
        ),
        None => warn!(
            event_id = %event.id,
            order_id = %order_id,
            "Checkout completed for an order that is unknown or already paid"
        ),
    }

    Ok(StatusCode::OK)
}
