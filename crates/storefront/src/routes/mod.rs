//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Shop summary with featured products
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (remote API reachability)
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart (session-held)
//! GET  /cart                   - Cart contents
//! POST /cart/add               - Add a product
//! POST /cart/update            - Update line quantity
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart count badge
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET    /checkout/shipping             - Current shipping draft
//! PUT    /checkout/shipping             - Replace shipping draft
//! POST   /checkout/shipping/postal-code - Patch the postal code
//! DELETE /checkout/shipping             - Clear shipping draft
//! POST   /checkout/preference           - Create a payment preference (auth)
//!
//! # Auth
//! GET  /auth/login             - Login state (error/success echo)
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register state
//! POST /auth/register          - Register action
//! GET  /auth/start             - Redirect to the hosted login flow
//! GET  /auth/callback          - Handle the provider callback
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Account overview
//! POST /change-password        - Change password action
//!
//! # Role-guarded views
//! GET  /clinic                 - Clinic dashboard (veterinarian)
//! GET  /staff/stock            - Low-stock report (staff)
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod clinic;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
///
/// The whole group sits behind the strict auth rate limiter.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Hosted provider flow
        .route("/start", get(auth::start))
        .route("/callback", get(auth::callback))
        .layer(middleware::auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shipping",
            get(checkout::shipping_show)
                .put(checkout::shipping_update)
                .delete(checkout::shipping_clear),
        )
        .route("/shipping/postal-code", post(checkout::shipping_postal_code))
        .route("/preference", post(checkout::create_preference))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Health checks
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Account routes
        .route("/account", get(account::index))
        .route("/change-password", post(account::change_password))
        // Role-guarded views
        .route("/clinic", get(clinic::clinic))
        .route("/staff/stock", get(clinic::stock_report))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the remote pet-shop API is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.api().ping().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
