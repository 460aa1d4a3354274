//! Product editing route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use wagtail_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::{AdminToken, RequireStaffAuth};
use crate::services::api::{Product, ProductUpdate};
use crate::state::AdminState;

/// Product listing.
#[instrument(skip(state, admin, token))]
pub async fn index(
    State(state): State<AdminState>,
    RequireStaffAuth(admin): RequireStaffAuth,
    AdminToken(token): AdminToken,
) -> Result<Json<Vec<Product>>> {
    tracing::debug!(viewer = %admin.id, "Product listing requested");

    let products = state.api().list_products(&token).await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state, admin, token))]
pub async fn show(
    State(state): State<AdminState>,
    RequireStaffAuth(admin): RequireStaffAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    tracing::debug!(viewer = %admin.id, "Product detail requested");

    let id = ProductId::new(id);
    match state.api().get_product(&token, &id).await {
        Ok(product) => Ok(Json(product)),
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => Err(e.into()),
    }
}

/// Update a product.
#[instrument(skip(state, admin, token, update))]
pub async fn update(
    State(state): State<AdminState>,
    RequireStaffAuth(admin): RequireStaffAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<String>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    if update.name.trim().is_empty() {
        return Err(AppError::BadRequest("product name cannot be empty".to_owned()));
    }

    let id = ProductId::new(id);
    match state.api().update_product(&token, &id, &update).await {
        Ok(product) => {
            tracing::info!(product = %product.id, editor = %admin.id, "Product updated");
            Ok(Json(product))
        }
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => Err(e.into()),
    }
}
