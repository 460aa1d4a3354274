//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers
//! 4. Request ID (add unique ID to each request)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Password gate (forced password-change navigation guard)
//! 7. Rate limiting (governor, auth routes only)

pub mod auth;
pub mod password_gate;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireStaff, RequireVeterinarian, clear_current_user,
    set_current_user,
};
pub use password_gate::password_gate;
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
