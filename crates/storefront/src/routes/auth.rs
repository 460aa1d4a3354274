//! Authentication route handlers.
//!
//! Handles login, registration and logout against the remote pet-shop API,
//! plus the hosted-provider flow: `start` redirects the shopper to the
//! provider's login page, `callback` validates the state parameter,
//! exchanges the authorization code and establishes the session.
//!
//! External-call failures stay user-visible: every failure branch redirects
//! back to the login page with an error code, which is the manual retry
//! path.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use wagtail_core::Identity;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::api::NewUser;
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: Option<String>,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters from the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for a token.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Echoed auth page state.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Generate a random string for the OAuth state parameter.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Write the token and identity into the session as a pair.
///
/// The two entries are only ever set together: if the identity write
/// fails, the token is rolled back so the session never holds one without
/// the other.
pub async fn establish_session(
    session: &Session,
    token: &str,
    identity: &Identity,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ACCESS_TOKEN, token).await?;

    if let Err(e) = set_current_user(
        session,
        &CurrentUser {
            identity: identity.clone(),
        },
    )
    .await
    {
        let _ = session
            .remove::<String>(session_keys::ACCESS_TOKEN)
            .await;
        return Err(e);
    }

    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Echo login page state (error/success from the query string).
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    Json(MessageView {
        error: query.error,
        success: query.success,
    })
}

/// Handle login form submission.
///
/// Authenticates against the remote API, fetches and validates the
/// profile, then establishes the session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.api().login(&form.email, &form.password).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    let identity = match state.api().profile(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Failed to fetch profile after login: {e}");
            return Redirect::to("/auth/login?error=profile").into_response();
        }
    };

    if let Err(e) = establish_session(&session, &token, &identity).await {
        tracing::error!("Failed to establish session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&identity.id, Some(identity.email.as_str()));

    Redirect::to("/account").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Echo register page state.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    Json(MessageView {
        error: query.error,
        success: query.success,
    })
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let new_user = NewUser {
        email: form.email,
        password: form.password,
        name: form.name.unwrap_or_default(),
    };

    match state.api().register(&new_user).await {
        Ok(()) => Redirect::to("/auth/login?success=registered").into_response(),
        Err(e) => {
            // A 2xx logical rejection is terminal; the shopper retries by hand.
            tracing::warn!("Registration failed: {e}");
            Redirect::to("/auth/register?error=rejected").into_response()
        }
    }
}

// =============================================================================
// Hosted Provider Flow
// =============================================================================

/// Initiate the hosted login flow.
///
/// Generates a state parameter, stores it in the session, and redirects to
/// the provider's authorization page.
///
/// # Route
///
/// `GET /auth/start`
pub async fn start(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(32);

    // Store in session for validation on callback
    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);

    match state.api().authorization_url(&redirect_uri, &oauth_state) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            tracing::error!("Failed to build authorization URL: {e}");
            Redirect::to("/auth/login?error=provider").into_response()
        }
    }
}

/// Handle the provider callback.
///
/// Validates the state parameter, exchanges the authorization code for a
/// token and profile payload, validates the payload, and stores both in
/// the session together.
///
/// # Route
///
/// `GET /auth/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Check for errors reported by the provider
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("Provider callback error: {error} - {description}");
        return Redirect::to("/auth/login?error=provider_denied").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("Provider callback missing code");
        return Redirect::to("/auth/login?error=missing_code").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Provider callback missing state");
        return Redirect::to("/auth/login?error=missing_state").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Provider callback state mismatch");
        return Redirect::to("/auth/login?error=invalid_state").into_response();
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    // Redirect URI must match the one used in the authorization request
    let redirect_uri = format!("{}/auth/callback", state.config().base_url);

    // Exchange code for a token and profile payload
    let (token, payload) = match state.api().exchange_code(&code, &redirect_uri).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Failed to exchange authorization code: {e}");
            return Redirect::to("/auth/login?error=token_exchange").into_response();
        }
    };

    // Validate the untyped payload into an Identity
    let identity = match Identity::from_payload(&payload) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!("Provider returned an invalid profile payload: {e}");
            return Redirect::to("/auth/login?error=invalid_profile").into_response();
        }
    };

    // Store token and identity together
    if let Err(e) = establish_session(&session, &token, &identity).await {
        tracing::error!("Failed to establish session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&identity.id, Some(identity.email.as_str()));
    tracing::info!("Customer authenticated successfully");

    Redirect::to("/account").into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Logout: drop the identity and token, keep the cart.
///
/// # Route
///
/// `POST /auth/logout`
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session on logout: {e}");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}
