//! Staff account route handlers (superadmin only).

use axum::{
    Json,
    extract::State,
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{AdminToken, RequireSuperAdmin};
use crate::state::AdminState;

/// Staff account listing.
#[instrument(skip(state, admin, token))]
pub async fn index(
    State(state): State<AdminState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    AdminToken(token): AdminToken,
) -> Result<Json<Vec<serde_json::Value>>> {
    tracing::debug!(viewer = %admin.id, "Staff listing requested");

    let staff = state.api().list_staff(&token).await?;
    Ok(Json(staff))
}
