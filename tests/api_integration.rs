//! API integration tests for the Axum REST routes.
//!
//! Requests go straight to the router with `tower::ServiceExt::oneshot`, no
//! TCP listener. Only built with `--features server`.

#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use credly_tracker::api::router;
use credly_tracker::BadgeStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(BadgeStore::open_in_memory().unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn health_ok() {
    let (status, body) = get(&app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!("OK"));
}

#[tokio::test]
async fn record_is_idempotent_and_totals_follow() {
    let app = app();
    let card = json!({ "name": "AWS Certified Cloud Practitioner", "raw_text": "Issued\nJan 2024" });

    let (status, body) = post_json(&app, "/api/badges", card.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inserted"], json!(true));

    let (_, body) = post_json(&app, "/api/badges", card).await;
    assert_eq!(body["data"]["inserted"], json!(false));

    let expired = json!({ "name": "AWS Certified Security Specialty", "raw_text": "Expired" });
    post_json(&app, "/api/badges", expired).await;

    let (_, body) = get(&app, "/api/total").await;
    assert_eq!(body["data"]["total_points"], json!(10.0));

    let (_, body) = get(&app, "/api/badges").await;
    assert_eq!(body["data"]["badges"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["expired_count"], json!(1));

    let (_, body) = get(&app, "/api/breakdown").await;
    assert_eq!(body["data"]["tiers"]["Specialty"]["badge_count"], json!(1));
    assert_eq!(body["data"]["tiers"]["Specialty"]["valid_points"], json!(0.0));
}

#[tokio::test]
async fn classify_and_preview_by_query() {
    let app = app();

    let (status, body) = get(&app, "/api/classify?name=Some%20Vendor%20Advanced%20Badge").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tier"], json!("Specialty"));
    assert_eq!(body["data"]["points"], json!(10.0));

    let (_, body) = get(&app, "/api/preview?name=Totally%20Unrelated%20Badge").await;
    assert_eq!(body["data"]["projected_total"], json!(2.5));
}

#[tokio::test]
async fn nameless_card_is_bad_request() {
    let (status, body) = post_json(&app(), "/api/badges", json!({ "name": "", "raw_text": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn tools_listing_and_dispatch() {
    let app = app();

    let (_, body) = get(&app, "/api/tools").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 9);

    let (status, body) = post_json(&app, "/api/tools/show_points_table", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][3]["label"], json!("Anything else"));

    let profile = r#"<div data-test-id="badge-card"><h3>AWS Certified Developer Associate</h3><p>Issued</p><p>Mar 2024</p></div>"#;
    let (status, body) = post_json(&app, "/api/tools/import_profile", json!({ "html": profile })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inserted"], json!(1));

    let (_, body) = get(&app, "/api/total").await;
    assert_eq!(body["data"]["total_points"], json!(5.0));

    let (status, _) = post_json(&app, "/api/tools/unknown_tool", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
