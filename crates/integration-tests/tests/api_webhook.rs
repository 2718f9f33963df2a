//! Payment webhook signature handling, checked without a database.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use storehub_integration_tests::{
    app, checkout_completed_event, lazy_pool, send, stripe_signature, webhook_request,
};

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let app = app(lazy_pool());
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .body(Body::from(checkout_completed_event("x").to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Webhook Error: "), "{body}");
}

#[tokio::test]
async fn test_tampered_payload_is_rejected() {
    let app = app(lazy_pool());
    let signed = checkout_completed_event("a").to_string();
    let sent = checkout_completed_event("b").to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("stripe-signature", stripe_signature(&signed))
        .body(Body::from(sent))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Webhook Error: "), "{body}");
}

#[tokio::test]
async fn test_other_events_are_acknowledged() {
    let app = app(lazy_pool());
    let event = json!({
        "id": "evt_test_other",
        "type": "payment_intent.created",
        "data": { "object": {} }
    });

    let (status, _) = send(&app, webhook_request(&event)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_completed_session_without_order_id_is_rejected() {
    let app = app(lazy_pool());
    let event = json!({
        "id": "evt_test_no_order",
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_test", "metadata": {} } }
    });

    let (status, body) = send(&app, webhook_request(&event)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("orderId"), "{body}");
}

#[tokio::test]
async fn test_completed_session_with_invalid_order_id_is_rejected() {
    let app = app(lazy_pool());
    let (status, body) = send(&app, webhook_request(&checkout_completed_event("not-a-uuid"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid orderId"), "{body}");
}
