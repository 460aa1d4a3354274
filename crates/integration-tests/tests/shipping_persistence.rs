//! Integration tests for shipping-draft persistence through the router.
//!
//! A fresh `AppState` over the same data directory simulates a restart;
//! the draft must survive it.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use wagtail_integration_tests::storefront_config;
use wagtail_storefront::state::AppState;

fn app_with_data_dir(dir: &tempfile::TempDir) -> Router {
    wagtail_storefront::app(AppState::new(storefront_config(Some(
        dir.path().to_path_buf(),
    ))))
}

fn put_shipping(body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/checkout/shipping")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request builds")
}

fn get_shipping() -> Request<Body> {
    Request::builder()
        .uri("/checkout/shipping")
        .body(Body::empty())
        .expect("request builds")
}

async fn shipping_json(app: Router) -> serde_json::Value {
    let response = app
        .oneshot(get_shipping())
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn shipping_draft_round_trips_and_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = app_with_data_dir(&dir);

    let draft = serde_json::json!({
        "postalCode": "1084",
        "address": "1 Paw Lane",
        "city": "Buenos Aires",
        "province": "CABA",
        "additionalInfo": "ring twice",
    });

    let response = app
        .clone()
        .oneshot(put_shipping(&draft.to_string()))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Immediate read-back is deep-equal.
    assert_eq!(shipping_json(app).await, draft);

    // A fresh state over the same directory still sees the draft.
    assert_eq!(shipping_json(app_with_data_dir(&dir)).await, draft);
}

#[tokio::test]
async fn postal_code_patch_keeps_other_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = app_with_data_dir(&dir);

    let response = app
        .clone()
        .oneshot(put_shipping(
            &serde_json::json!({ "postalCode": "1084", "city": "Rosario" }).to_string(),
        ))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let patch = Request::builder()
        .method("POST")
        .uri("/checkout/shipping/postal-code")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"postalCode":"9000"}"#))
        .expect("request builds");
    let response = app
        .clone()
        .oneshot(patch)
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = shipping_json(app).await;
    assert_eq!(json["postalCode"], "9000");
    assert_eq!(json["city"], "Rosario");
}

#[tokio::test]
async fn clear_resets_to_empty_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = app_with_data_dir(&dir);

    let response = app
        .clone()
        .oneshot(put_shipping(
            &serde_json::json!({ "postalCode": "1084" }).to_string(),
        ))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let clear = Request::builder()
        .method("DELETE")
        .uri("/checkout/shipping")
        .body(Body::empty())
        .expect("request builds");
    let response = app
        .clone()
        .oneshot(clear)
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let expected = serde_json::json!({
        "postalCode": "",
        "address": "",
        "city": "",
        "province": "",
        "additionalInfo": "",
    });
    assert_eq!(shipping_json(app.clone()).await, expected);

    // Restart: the persisted entry is gone too.
    assert_eq!(shipping_json(app_with_data_dir(&dir)).await, expected);
}

#[tokio::test]
async fn corrupt_persisted_draft_loads_as_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("shipping_data.json"), "{not valid")
        .expect("corrupt blob written");

    let json = shipping_json(app_with_data_dir(&dir)).await;
    assert_eq!(json["postalCode"], "");
    assert_eq!(json["address"], "");
}
