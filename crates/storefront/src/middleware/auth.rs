//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring authentication and roles in route
//! handlers. Decisions come from `wagtail_core::policy`; the extractors
//! only assemble the session snapshot and perform the redirect or status
//! response the policy asks for.
//!
//! The snapshot is resolved before any decision: when the session carries
//! an access token but no identity yet (the profile bootstrap has not
//! landed), the extractor completes the profile fetch first, so no
//! redirect is ever decided from a half-loaded session.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use wagtail_core::policy::{self, SessionSnapshot};
use wagtail_core::{Identity, Role};

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Error returned when authentication or a role requirement fails.
pub enum AuthRejection {
    /// Redirect issued by the guard (for HTML requests).
    RedirectTo(&'static str),
    /// Unauthorized response (for API requests without a session).
    Unauthorized,
    /// Forbidden response (for API requests with the wrong role).
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectTo(target) => Redirect::to(target).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have access to this resource",
            )
                .into_response(),
        }
    }
}

/// Read the session into a snapshot without forcing the bootstrap.
pub async fn read_snapshot(session: &Session) -> SessionSnapshot {
    let token_present = session
        .get::<String>(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten()
        .is_some();

    let identity = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .map(|u| u.identity);

    SessionSnapshot {
        // Token without identity: the profile bootstrap has not landed.
        loading: token_present && identity.is_none(),
        token_present,
        identity,
    }
}

/// Resolve the session into a settled snapshot.
///
/// Completes the profile bootstrap when needed: a token without an
/// identity triggers the profile fetch, and the result (or its absence,
/// on failure) is what the guards decide on.
pub async fn resolve_snapshot(state: &AppState, session: &Session) -> SessionSnapshot {
    let snapshot = read_snapshot(session).await;
    if !snapshot.loading {
        return snapshot;
    }

    let token: Option<String> = session
        .get(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten();
    let Some(token) = token else {
        return SessionSnapshot::anonymous();
    };

    match state.api().profile(&token).await {
        Ok(identity) => {
            if let Err(e) = set_current_user(
                session,
                &CurrentUser {
                    identity: identity.clone(),
                },
            )
            .await
            {
                tracing::error!("Failed to store bootstrapped profile: {e}");
            }
            SessionSnapshot {
                loading: false,
                token_present: true,
                identity: Some(identity),
            }
        }
        Err(e) => {
            tracing::warn!("Session bootstrap failed: {e}");
            SessionSnapshot {
                loading: false,
                token_present: true,
                identity: None,
            }
        }
    }
}

fn session_from_parts(parts: &Parts) -> Result<Session, AuthRejection> {
    // Set by SessionManagerLayer
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AuthRejection::Unauthorized)
}

fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

/// Run the role guard for `required` and return the identity on access.
async fn guard_role<S>(
    parts: &mut Parts,
    state: &S,
    required: &[Role],
) -> Result<Identity, AuthRejection>
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    let state = AppState::from_ref(state);
    let session = session_from_parts(parts)?;
    let snapshot = resolve_snapshot(&state, &session).await;

    let check = policy::check_role_access(&snapshot, required);
    if check.has_access {
        // has_access implies a present identity
        return snapshot.identity.ok_or(AuthRejection::Unauthorized);
    }

    if is_api_request(parts) {
        return Err(if snapshot.identity.is_some() {
            AuthRejection::Forbidden
        } else {
            AuthRejection::Unauthorized
        });
    }

    Err(check
        .redirect
        .map_or(AuthRejection::Unauthorized, AuthRejection::RedirectTo))
}

/// Extractor that requires an authenticated user of any role.
///
/// If the user is not logged in, returns a redirect to the login page for
/// HTML requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(identity): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state_ref = AppState::from_ref(state);
        let session = session_from_parts(parts)?;
        let snapshot = resolve_snapshot(&state_ref, &session).await;

        snapshot.identity.map(Self).ok_or_else(|| {
            if is_api_request(parts) {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectTo(policy::LOGIN_PATH)
            }
        })
    }
}

/// Extractor that optionally gets the current identity.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is
/// not logged in.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let identity = match parts.extensions.get::<Session>().cloned() {
            Some(session) => resolve_snapshot(&state, &session).await.identity,
            None => None,
        };

        Ok(Self(identity))
    }
}

/// Extractor that requires store staff: superadmin or admin.
pub struct RequireStaff(pub Identity);

impl<S> FromRequestParts<S> for RequireStaff
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        guard_role(parts, state, policy::STAFF_ROLES).await.map(Self)
    }
}

/// Extractor that requires clinical staff: superadmin or veterinarian.
pub struct RequireVeterinarian(pub Identity);

impl<S> FromRequestParts<S> for RequireVeterinarian
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        guard_role(parts, state, policy::CLINICAL_ROLES)
            .await
            .map(Self)
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session
        .remove::<String>(session_keys::ACCESS_TOKEN)
        .await?;
    Ok(())
}
