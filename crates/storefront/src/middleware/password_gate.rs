//! Forced password-change navigation guard.
//!
//! Veterinarian accounts flagged with `must_change_password` are steered to
//! the change-password page on every navigation outside the public paths.
//! The decision lives in `wagtail_core::policy`; this middleware only reads
//! the session and issues the redirect. While the session is still
//! bootstrapping, no decision is made and the request passes through.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use wagtail_core::policy;

use crate::middleware::auth::read_snapshot;

/// Middleware enforcing the password-change guard on every request.
pub async fn password_gate(session: Session, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let snapshot = read_snapshot(&session).await;

    if let Some(target) = policy::password_change_redirect(&snapshot, path) {
        tracing::debug!(path, "Forcing password change redirect");
        return Redirect::to(target).into_response();
    }

    next.run(request).await
}
