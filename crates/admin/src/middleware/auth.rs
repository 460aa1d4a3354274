//! Authentication middleware and extractors for admin.
//!
//! Provides extractors for requiring staff authentication in route
//! handlers. Role checks go through `wagtail_core::policy`; the session
//! only ever holds identities that passed the staff policy at login, and
//! the extractors re-check on every request anyway.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use wagtail_core::Identity;
use wagtail_core::policy;

use crate::models::{CurrentAdmin, session_keys};

/// Error returned when admin authentication is required but missing.
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden - logged in but without the required role.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have access to this resource",
            )
                .into_response(),
        }
    }
}

async fn current_admin(parts: &Parts) -> Result<CurrentAdmin, AdminAuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AdminAuthRejection::Unauthorized)?;

    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| {
            let is_api = parts.uri.path().starts_with("/api/");
            if is_api {
                AdminAuthRejection::Unauthorized
            } else {
                AdminAuthRejection::RedirectToLogin
            }
        })
}

/// Extractor that requires a staff member: superadmin or admin.
///
/// If nobody is logged in, returns a redirect to the login page for HTML
/// requests, or 401 Unauthorized for API requests. A logged-in identity
/// without a staff role gets 403 Forbidden.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireStaffAuth(admin): RequireStaffAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireStaffAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireStaffAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = current_admin(parts).await?;

        if !policy::is_staff(Some(&admin.identity)) {
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(admin.identity))
    }
}

/// Extractor that requires the superadmin role.
///
/// If nobody is logged in, redirects to login. A staff member without the
/// superadmin role gets 403 Forbidden.
pub struct RequireSuperAdmin(pub Identity);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = current_admin(parts).await?;

        if !policy::is_superadmin(Some(&admin.identity)) {
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(admin.identity))
    }
}

/// Extractor for the logged-in admin's API token.
pub struct AdminToken(pub String);

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        session
            .get::<String>(session_keys::ACCESS_TOKEN)
            .await
            .ok()
            .flatten()
            .map(Self)
            .ok_or(AdminAuthRejection::Unauthorized)
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    session
        .remove::<String>(session_keys::ACCESS_TOKEN)
        .await?;
    Ok(())
}
