//! Account route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use wagtail_core::Identity;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::api::PasswordChange;
use crate::state::AppState;

/// Account overview: the authenticated identity.
#[instrument(skip(identity))]
pub async fn index(RequireAuth(identity): RequireAuth) -> Json<Identity> {
    Json(identity)
}

/// Change-password form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
}

/// Change the account password at the remote API.
///
/// On success the session identity is rewritten with the
/// must-change-password flag lowered, which releases the password gate.
#[instrument(skip(state, session, identity, form))]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(identity): RequireAuth,
    Json(form): Json<ChangePasswordForm>,
) -> Result<StatusCode> {
    let token: Option<String> = session
        .get(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten();
    let Some(token) = token else {
        return Err(AppError::Unauthorized("no session token".to_owned()));
    };

    let change = PasswordChange {
        current_password: form.current_password,
        new_password: form.new_password,
    };
    state.api().change_password(&token, &change).await?;

    let updated = Identity {
        must_change_password: false,
        ..identity
    };
    set_current_user(&session, &CurrentUser { identity: updated }).await?;

    Ok(StatusCode::NO_CONTENT)
}
