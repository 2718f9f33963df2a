//! Checkout orders, payment, archiving, and revenue against a real database.
//!
//! Orders are created through the repository since starting a real checkout
//! would call Stripe; payment goes through the signed webhook.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::http::StatusCode;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;

use storehub_admin::db::OrderRepository;
use storehub_core::{ProductId, StoreId};
use storehub_integration_tests::{
    app, checkout_completed_event, empty_request, json_request, send, send_json, webhook_request,
};

const OWNER: &str = "user_owner";

struct Catalog {
    store_id: String,
    product_id: String,
    other_product_id: String,
}

async fn post(app: &Router, uri: &str, body: &Value) -> Value {
    let (status, value) = send_json(app, json_request("POST", uri, Some(OWNER), body)).await;
    assert_eq!(status, StatusCode::OK, "POST {uri}: {value}");
    value
}

async fn catalog(app: &Router) -> Catalog {
    let store = post(app, "/api/stores", &json!({ "name": "Shop" })).await;
    let store_id = store["id"].as_str().unwrap().to_string();

    let billboard = post(
        app,
        &format!("/api/{store_id}/billboards"),
        &json!({ "label": "Summer", "imageUrl": "https://img.test/summer.png" }),
    )
    .await;
    let category = post(
        app,
        &format!("/api/{store_id}/categories"),
        &json!({ "name": "Shirts", "billboardId": billboard["id"] }),
    )
    .await;
    let size = post(
        app,
        &format!("/api/{store_id}/sizes"),
        &json!({ "name": "Medium", "value": "M" }),
    )
    .await;
    let color = post(
        app,
        &format!("/api/{store_id}/colors"),
        &json!({ "name": "Red", "value": "#ff0000" }),
    )
    .await;
    let product_body = |name: &str, price: &str| {
        json!({
            "name": name,
            "price": price,
            "categoryId": category["id"],
            "sizeId": size["id"],
            "colorId": color["id"],
            "images": [{ "url": "https://img.test/shirt.png" }],
            "isFeatured": true,
            "isArchived": false
        })
    };
    let product = post(
        app,
        &format!("/api/{store_id}/products"),
        &product_body("Linen Shirt", "49.90"),
    )
    .await;
    let other = post(
        app,
        &format!("/api/{store_id}/products"),
        &product_body("Wool Scarf", "25.00"),
    )
    .await;

    Catalog {
        store_id,
        product_id: product["id"].as_str().unwrap().to_string(),
        other_product_id: other["id"].as_str().unwrap().to_string(),
    }
}

async fn unpaid_order(pool: &PgPool, catalog: &Catalog) -> String {
    let store_id: StoreId = catalog.store_id.parse().unwrap();
    let product_id: ProductId = catalog.product_id.parse().unwrap();
    let order = OrderRepository::new(pool)
        .create_unpaid(store_id, &[product_id])
        .await
        .unwrap();
    order.id.to_string()
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_paid_webhook_marks_order_paid_and_archives_products(pool: PgPool) {
    let app = app(pool.clone());
    let catalog = catalog(&app).await;
    let store_id = &catalog.store_id;
    let order_id = unpaid_order(&pool, &catalog).await;

    let (status, _) = send(&app, webhook_request(&checkout_completed_event(&order_id))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, orders) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/orders"), Some(OWNER)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order = &orders[0];
    assert_eq!(order["isPaid"], true);
    assert_eq!(order["phone"], "+15550100");
    assert_eq!(order["address"], "1 Main St, 62701, Springfield, IL, US");
    assert_eq!(order["products"], "Linen Shirt");

    let product_id = &catalog.product_id;
    let (_, product) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/products/{product_id}"), None),
    )
    .await;
    assert_eq!(product["isArchived"], true);

    let other_id = &catalog.other_product_id;
    let (_, other) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/products/{other_id}"), None),
    )
    .await;
    assert_eq!(other["isArchived"], false);

    let (_, listed) =
        send_json(&app, empty_request("GET", &format!("/api/{store_id}/products"), None)).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], other_id.as_str());
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_order_products_keep_checkout_order(pool: PgPool) {
    let app = app(pool.clone());
    let catalog = catalog(&app).await;
    let store_id: StoreId = catalog.store_id.parse().unwrap();
    let shirt: ProductId = catalog.product_id.parse().unwrap();
    let scarf: ProductId = catalog.other_product_id.parse().unwrap();

    OrderRepository::new(&pool)
        .create_unpaid(store_id, &[scarf, shirt, scarf, shirt, shirt, scarf])
        .await
        .unwrap();

    let (status, orders) = send_json(
        &app,
        empty_request("GET", &format!("/api/{}/orders", catalog.store_id), Some(OWNER)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        orders[0]["products"],
        "Wool Scarf, Linen Shirt, Wool Scarf, Linen Shirt, Linen Shirt, Wool Scarf"
    );
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_oversized_price_is_bad_request(pool: PgPool) {
    let app = app(pool);
    let catalog = catalog(&app).await;
    let (_, product) = send_json(
        &app,
        empty_request(
            "GET",
            &format!("/api/{}/products/{}", catalog.store_id, catalog.product_id),
            None,
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/{}/products", catalog.store_id),
            Some(OWNER),
            &json!({
                "name": "Yacht",
                "price": "10000000000.00",
                "categoryId": product["categoryId"],
                "sizeId": product["sizeId"],
                "colorId": product["colorId"],
                "images": [{ "url": "https://img.test/yacht.png" }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_repeated_webhook_is_applied_once(pool: PgPool) {
    let app = app(pool.clone());
    let catalog = catalog(&app).await;
    let order_id = unpaid_order(&pool, &catalog).await;
    let event = checkout_completed_event(&order_id);

    let (first, _) = send(&app, webhook_request(&event)).await;
    let (second, _) = send(&app, webhook_request(&event)).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let store_id: StoreId = catalog.store_id.parse().unwrap();
    let repo = OrderRepository::new(&pool);
    assert_eq!(repo.count_paid(store_id).await.unwrap(), 1);
    assert_eq!(repo.paid_orders(store_id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_dashboard_counts_only_paid_orders(pool: PgPool) {
    let app = app(pool.clone());
    let catalog = catalog(&app).await;
    let store_id = &catalog.store_id;

    let (status, summary) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/dashboard"), Some(OWNER)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&summary["totalRevenue"]), Decimal::ZERO);
    assert_eq!(summary["salesCount"], 0);
    assert_eq!(summary["stockCount"], 2);
    assert_eq!(summary["graphRevenue"].as_array().unwrap().len(), 12);

    let order_id = unpaid_order(&pool, &catalog).await;
    let (status, summary) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/dashboard"), Some(OWNER)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["salesCount"], 0);

    send(&app, webhook_request(&checkout_completed_event(&order_id))).await;

    let (_, summary) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/dashboard"), Some(OWNER)),
    )
    .await;
    let price = Decimal::new(4990, 2);
    assert_eq!(decimal(&summary["totalRevenue"]), price);
    assert_eq!(summary["salesCount"], 1);
    assert_eq!(summary["stockCount"], 1);

    let month = chrono::Utc::now().month0() as usize;
    let graph = summary["graphRevenue"].as_array().unwrap();
    assert_eq!(decimal(&graph[month]["total"]), price);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_dashboard_requires_ownership(pool: PgPool) {
    let app = app(pool);
    let catalog = catalog(&app).await;

    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/{}/dashboard", catalog.store_id),
            Some("user_other"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_checkout_rejects_archived_products(pool: PgPool) {
    let app = app(pool.clone());
    let catalog = catalog(&app).await;
    let order_id = unpaid_order(&pool, &catalog).await;
    send(&app, webhook_request(&checkout_completed_event(&order_id))).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/{}/checkout", catalog.store_id),
            None,
            &json!({ "productIds": [catalog.product_id] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("is not available"), "{body}");
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_product_images_keep_submitted_order(pool: PgPool) {
    let app = app(pool);
    let catalog = catalog(&app).await;
    let store_id = &catalog.store_id;
    let product_id = &catalog.product_id;

    let urls: Vec<String> = [3, 0, 7, 1, 6, 2, 5, 4]
        .iter()
        .map(|n| format!("https://img.test/{n}.png"))
        .collect();
    let images: Vec<Value> = urls.iter().map(|url| json!({ "url": url })).collect();

    let (_, product) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/products/{product_id}"), None),
    )
    .await;
    let (status, created) = send_json(
        &app,
        json_request(
            "POST",
            &format!("/api/{store_id}/products"),
            Some(OWNER),
            &json!({
                "name": "Gallery Shirt",
                "price": "49.90",
                "categoryId": product["categoryId"],
                "sizeId": product["sizeId"],
                "colorId": product["colorId"],
                "images": images
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let created_id = created["id"].as_str().unwrap();

    let (_, product) = send_json(
        &app,
        empty_request("GET", &format!("/api/{store_id}/products/{created_id}"), None),
    )
    .await;
    let stored: Vec<&str> = product["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|image| image["url"].as_str().unwrap())
        .collect();
    assert_eq!(stored, urls);
}
