//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Auth
//! GET  /auth/login             - Login state (error echo)
//! POST /auth/login             - Login action (staff only)
//! POST /auth/logout            - Logout action
//!
//! # Products (staff)
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//! PUT  /products/{id}          - Update a product
//!
//! # Staff accounts (superadmin)
//! GET  /admins                 - Staff account listing
//! ```

pub mod admins;
pub mod auth;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AdminState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AdminState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AdminState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show).put(products::update))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AdminState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .route("/admins", get(admins::index))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
