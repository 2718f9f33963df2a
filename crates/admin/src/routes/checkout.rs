//! Storefront checkout.
//!
//! The storefront posts the ids in its cart; this creates an unpaid order
//! and a Stripe checkout session for it, and returns the hosted payment URL.
//! The order is marked paid later by the webhook.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, Method, header},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use storehub_core::{ProductId, StoreId};

use crate::config::{AdminConfig, CorsOrigins};
use crate::db::{OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::models::Product;
use crate::state::AppState;
use crate::stripe::{CheckoutLineItem, CreateCheckoutSession, StripeError};

/// Build the checkout router with its CORS policy.
pub fn router(config: &AdminConfig) -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/checkout", post(create))
        .layer(cors_layer(&config.cors_origins))
}

/// CORS policy letting the storefront call checkout from the browser.
fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| {
                    HeaderValue::from_str(origin)
                        .inspect_err(|e| warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin"))
                        .ok()
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

/// Request body for starting checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub product_ids: Option<Vec<ProductId>>,
}

/// Hosted payment page to redirect the customer to.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Start a checkout for the given products.
///
/// # Errors
///
/// Returns 400 if no ids are given or any id is not a product for sale in
/// this store, and 502 if Stripe fails.
pub async fn create(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    body: Result<Json<CheckoutBody>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let Json(body) = body?;
    let product_ids = body.product_ids.unwrap_or_default();
    if product_ids.is_empty() {
        return Err(AppError::BadRequest("Product ids are required".to_string()));
    }

    let products = ProductRepository::new(state.pool())
        .find_for_checkout(store_id, &product_ids)
        .await?;
    let line_items = line_items(&product_ids, &products)?;

    let order = OrderRepository::new(state.pool())
        .create_unpaid(store_id, &product_ids)
        .await?;

    let session = state
        .stripe()
        .create_checkout_session(&CreateCheckoutSession {
            line_items,
            order_id: order.id,
            success_url: state.config().checkout_success_url(),
            cancel_url: state.config().checkout_cancel_url(),
        })
        .await?;

    let url = session.url.ok_or_else(|| {
        StripeError::Response("Checkout session has no payment URL".to_string())
    })?;

    info!(
        store_id = %store_id,
        order_id = %order.id,
        session_id = %session.id,
        "Checkout started"
    );

    Ok(Json(CheckoutResponse { url }))
}

/// One line item per requested id, in request order.
///
/// Fails if any id is not among `products`.
fn line_items(
    product_ids: &[ProductId],
    products: &[Product],
) -> Result<Vec<CheckoutLineItem>, AppError> {
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    product_ids
        .iter()
        .map(|id| {
            let product = by_id
                .get(id)
                .ok_or_else(|| AppError::BadRequest(format!("Product {id} is not available")))?;
            let unit_amount = product.price.to_minor_units().ok_or_else(|| {
                AppError::Internal(format!("Price of product {id} is out of range"))
            })?;

            Ok(CheckoutLineItem {
                name: product.name.clone(),
                unit_amount,
                quantity: 1,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use storehub_core::{CategoryId, ColorId, Price, SizeId};
    use uuid::Uuid;

    fn product(name: &str, cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(Uuid::new_v4()),
            store_id: StoreId::new(Uuid::nil()),
            category_id: CategoryId::new(Uuid::new_v4()),
            size_id: SizeId::new(Uuid::new_v4()),
            color_id: ColorId::new(Uuid::new_v4()),
            name: name.to_string(),
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
            is_featured: false,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_line_items_follow_request_order_and_repeat_duplicates() {
        let shirt = product("Shirt", 1999);
        let hat = product("Hat", 500);
        let ids = [hat.id, shirt.id, hat.id];

        let items = line_items(&ids, &[shirt, hat]).unwrap();

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Hat", "Shirt", "Hat"]);
        assert_eq!(items.first().unwrap().unit_amount, 500);
        assert!(items.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn test_line_items_reject_unknown_product() {
        let shirt = product("Shirt", 1999);
        let unknown = ProductId::new(Uuid::new_v4());

        let err = line_items(&[shirt.id, unknown], &[shirt]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
