//! Integration tests for the storefront navigation guards.
//!
//! Drives the real router in-process. Anonymous requests never reach the
//! remote API, so the unreachable test base URL is never contacted.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use tower::ServiceExt;
use tower_sessions::Session;

use wagtail_core::{Email, Identity, Role, UserId};
use wagtail_integration_tests::storefront_config;
use wagtail_storefront::middleware::{create_session_layer, password_gate, set_current_user};
use wagtail_storefront::models::{CurrentUser, session_keys};
use wagtail_storefront::state::AppState;

fn storefront_app() -> Router {
    wagtail_storefront::app(AppState::new(storefront_config(None)))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("valid header")
}

#[tokio::test]
async fn health_is_public() {
    let response = storefront_app()
        .oneshot(get_request("/health"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn account_redirects_anonymous_to_login() {
    let response = storefront_app()
        .oneshot(get_request("/account"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn preference_creation_requires_auth() {
    let request = Request::builder()
        .method("POST")
        .uri("/checkout/preference")
        .body(Body::empty())
        .expect("request builds");

    let response = storefront_app()
        .oneshot(request)
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn cart_is_reachable_without_auth() {
    let response = storefront_app()
        .oneshot(get_request("/cart"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_page_echoes_error_code() {
    let request = Request::builder()
        .uri("/auth/login?error=credentials")
        // The auth rate limiter keys on the forwarded client IP.
        .header("x-forwarded-for", "127.0.0.1")
        .body(Body::empty())
        .expect("request builds");

    let response = storefront_app()
        .oneshot(request)
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["error"], "credentials");
}

// =============================================================================
// Password-change guard
// =============================================================================

/// Seed the session with a veterinarian flagged for a password change.
async fn seed_flagged_vet(session: Session) -> StatusCode {
    let identity = Identity {
        id: UserId::new("vet_1"),
        email: Email::parse("vet@wagtail.example").expect("valid email"),
        name: "Dana".to_owned(),
        address: String::new(),
        phone: String::new(),
        role: Some(Role::Veterinarian),
        must_change_password: true,
    };

    session
        .insert(session_keys::ACCESS_TOKEN, "test-token")
        .await
        .expect("token stored");
    set_current_user(&session, &CurrentUser { identity })
        .await
        .expect("identity stored");

    StatusCode::OK
}

/// A small router wearing the real password gate and session layer.
fn gated_app() -> Router {
    let config = storefront_config(None);
    let session_layer = create_session_layer(&config);

    Router::new()
        .route("/seed", get(seed_flagged_vet))
        .route("/dashboard", get(|| async { "sensitive" }))
        .route("/change-password", get(|| async { "change form" }))
        .route("/", get(|| async { "home" }))
        .layer(axum::middleware::from_fn(password_gate))
        .layer(session_layer)
}

/// Extract the session cookie pair from a response.
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .expect("valid header")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_owned()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn flagged_vet_is_forced_to_change_password() {
    let app = gated_app();

    let response = app
        .clone()
        .oneshot(get_request("/seed"))
        .await
        .expect("seed succeeds");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    // Protected path: redirected to the change-password page.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/dashboard", &cookie))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/change-password");

    // The change-password page itself: no redirect loop.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/change-password", &cookie))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::OK);

    // Public root stays reachable.
    let response = app
        .oneshot(get_with_cookie("/", &cookie))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Role-requirement guard
// =============================================================================

/// Seed the session with a regular shopper.
async fn seed_shopper(session: Session) -> StatusCode {
    let identity = Identity {
        id: UserId::new("usr_7"),
        email: Email::parse("shopper@wagtail.example").expect("valid email"),
        name: "Sam".to_owned(),
        address: String::new(),
        phone: String::new(),
        role: Some(Role::User),
        must_change_password: false,
    };

    session
        .insert(session_keys::ACCESS_TOKEN, "test-token")
        .await
        .expect("token stored");
    set_current_user(&session, &CurrentUser { identity })
        .await
        .expect("identity stored");

    StatusCode::OK
}

/// The real storefront routes plus a seed endpoint for session setup.
fn seeded_storefront() -> Router {
    let config = storefront_config(None);
    let state = AppState::new(config.clone());

    Router::new()
        .route("/seed-shopper", get(seed_shopper))
        .merge(wagtail_storefront::routes::routes())
        .layer(axum::middleware::from_fn(password_gate))
        .layer(create_session_layer(&config))
        .with_state(state)
}

#[tokio::test]
async fn shopper_is_redirected_home_from_role_guarded_views() {
    let app = seeded_storefront();

    let response = app
        .clone()
        .oneshot(get_request("/seed-shopper"))
        .await
        .expect("seed succeeds");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    // Signed in, but not a veterinarian: back to the home page.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/clinic", &cookie))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // Not staff either.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/staff/stock", &cookie))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // Plain authentication still works for the account page.
    let response = app
        .oneshot(get_with_cookie("/account", &cookie))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_sessions_pass_the_gate() {
    let response = gated_app()
        .oneshot(get_request("/dashboard"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
}
