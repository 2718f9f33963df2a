//! Authentication and request validation, checked without a database.
//!
//! Every request here is rejected before a query runs, so the pool never
//! connects.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use storehub_integration_tests::{app, empty_request, json_request, lazy_pool, send};

#[tokio::test]
async fn test_health_is_ok() {
    let app = app(lazy_pool());
    let (status, body) = send(&app, empty_request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_fails_without_database() {
    let app = app(lazy_pool());
    let (status, _) = send(&app, empty_request("GET", "/health/ready", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let app = app(lazy_pool());
    let (status, body) = send(&app, empty_request("GET", "/api/stores", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "Unauthenticated");
}

#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let app = app(lazy_pool());
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/stores")
        .header("authorization", "Bearer not-a-jwt")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authentication_is_checked_before_the_body() {
    let app = app(lazy_pool());
    let store_id = Uuid::new_v4();
    let (status, _) = send(
        &app,
        json_request("POST", &format!("/api/{store_id}/billboards"), None, &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_name_is_required() {
    let app = app(lazy_pool());
    let (status, body) = send(
        &app,
        json_request("POST", "/api/stores", Some("user_a"), &json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Name is required");
}

#[tokio::test]
async fn test_billboard_fields_are_validated_before_ownership() {
    let app = app(lazy_pool());
    let store_id = Uuid::new_v4();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/{store_id}/billboards"),
            Some("user_a"),
            &json!({ "label": "Summer" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Image URL is required");
}

#[tokio::test]
async fn test_product_requires_images() {
    let app = app(lazy_pool());
    let store_id = Uuid::new_v4();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/{store_id}/products"),
            Some("user_a"),
            &json!({ "name": "Tee", "price": "19.99", "images": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Images are required");
}

#[tokio::test]
async fn test_color_value_must_be_hex() {
    let app = app(lazy_pool());
    let store_id = Uuid::new_v4();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/{store_id}/colors"),
            Some("user_a"),
            &json!({ "name": "Red", "value": "red" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Invalid color value"), "{body}");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app(lazy_pool());
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/stores")
        .header("content-type", "application/json")
        .header(
            "authorization",
            format!("Bearer {}", storehub_integration_tests::token_for("user_a")),
        )
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_requires_product_ids() {
    let app = app(lazy_pool());
    let store_id = Uuid::new_v4();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/{store_id}/checkout"),
            None,
            &json!({ "productIds": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Product ids are required");
}

#[tokio::test]
async fn test_checkout_answers_cors_preflight() {
    let app = app(lazy_pool());
    let store_id = Uuid::new_v4();
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri(format!("/api/{store_id}/checkout"))
        .header("origin", "https://shop.test")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app(lazy_pool());
    let mut request = empty_request("GET", "/health", None);
    request
        .headers_mut()
        .insert("x-request-id", "req-123".parse().unwrap());

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
}
