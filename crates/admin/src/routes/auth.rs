//! Admin authentication route handlers.
//!
//! Login goes through the same remote API as the storefront, but a session
//! is only established for identities passing the staff policy; everyone
//! else is turned away at the door.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use wagtail_core::policy;

use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AdminState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Echoed login page state.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub error: Option<String>,
}

/// Echo login page state.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    Json(MessageView { error: query.error })
}

/// Handle login form submission.
///
/// Authenticates against the remote API and verifies the staff policy
/// before establishing a session.
pub async fn login(
    State(state): State<AdminState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.api().login(&form.email, &form.password).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    let identity = match state.api().profile(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Failed to fetch profile after admin login: {e}");
            return Redirect::to("/auth/login?error=profile").into_response();
        }
    };

    // The door check: only staff get an admin session at all.
    if !policy::is_staff(Some(&identity)) {
        tracing::warn!(user = %identity.id, "Non-staff login attempt on admin panel");
        return Redirect::to("/auth/login?error=forbidden").into_response();
    }

    if let Err(e) = session.insert(session_keys::ACCESS_TOKEN, &token).await {
        tracing::error!("Failed to store admin token: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }
    if let Err(e) = set_current_admin(&session, &CurrentAdmin { identity }).await {
        tracing::error!("Failed to store admin identity: {e}");
        let _ = session
            .remove::<String>(session_keys::ACCESS_TOKEN)
            .await;
        return Redirect::to("/auth/login?error=session").into_response();
    }

    Redirect::to("/products").into_response()
}

/// Logout: clear the admin session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear admin session: {e}");
    }

    Redirect::to("/auth/login").into_response()
}
