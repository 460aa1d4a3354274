//! Integration tests for the admin role guards.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use tower::ServiceExt;
use tower_sessions::Session;

use wagtail_admin::middleware::{create_session_layer, set_current_admin};
use wagtail_admin::models::{CurrentAdmin, session_keys};
use wagtail_admin::state::AdminState;
use wagtail_core::{Email, Identity, Role, UserId};
use wagtail_integration_tests::admin_config;

fn admin_app() -> Router {
    wagtail_admin::app(AdminState::new(admin_config()))
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
    let response = admin_app()
        .oneshot(get_request("/health"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn products_redirect_anonymous_to_login() {
    let response = admin_app()
        .oneshot(get_request("/products"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn staff_listing_redirects_anonymous_to_login() {
    let response = admin_app()
        .oneshot(get_request("/admins"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

// =============================================================================
// Role checks with a seeded session
// =============================================================================

fn identity_with_role(role: Role) -> Identity {
    Identity {
        id: UserId::new("usr_1"),
        email: Email::parse("who@wagtail.example").expect("valid email"),
        name: "Sam".to_owned(),
        address: String::new(),
        phone: String::new(),
        role: Some(role),
        must_change_password: false,
    }
}

/// Seed the session with a regular shopper identity.
async fn seed_shopper(session: Session) -> StatusCode {
    session
        .insert(session_keys::ACCESS_TOKEN, "test-token")
        .await
        .expect("token stored");
    set_current_admin(
        &session,
        &CurrentAdmin {
            identity: identity_with_role(Role::User),
        },
    )
    .await
    .expect("identity stored");

    StatusCode::OK
}

/// Seed the session with an admin identity.
async fn seed_admin(session: Session) -> StatusCode {
    session
        .insert(session_keys::ACCESS_TOKEN, "test-token")
        .await
        .expect("token stored");
    set_current_admin(
        &session,
        &CurrentAdmin {
            identity: identity_with_role(Role::Admin),
        },
    )
    .await
    .expect("identity stored");

    StatusCode::OK
}

/// The real admin routes plus seed endpoints for session setup.
fn seeded_app() -> Router {
    let state = AdminState::new(admin_config());
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/seed-shopper", get(seed_shopper))
        .route("/seed-admin", get(seed_admin))
        .merge(wagtail_admin::routes::routes())
        .layer(session_layer)
        .with_state(state)
}

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
async fn shopper_session_is_forbidden_from_products() {
    let app = seeded_app();

    let response = app
        .clone()
        .oneshot(get_request("/seed-shopper"))
        .await
        .expect("seed succeeds");
    let cookie = session_cookie(&response);

    let response = app
        .oneshot(get_with_cookie("/products", &cookie))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_session_is_forbidden_from_staff_listing() {
    let app = seeded_app();

    let response = app
        .clone()
        .oneshot(get_request("/seed-admin"))
        .await
        .expect("seed succeeds");
    let cookie = session_cookie(&response);

    // Admin is staff, but /admins needs superadmin.
    let response = app
        .oneshot(get_with_cookie("/admins", &cookie))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
