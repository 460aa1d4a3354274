//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use wagtail_core::ProductId;

use crate::error::{AppError, Result};
use crate::services::api::Product;
use crate::state::AppState;

/// Product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.api().list_products().await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    match state.api().get_product(&id).await {
        Ok(product) => Ok(Json(product)),
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => Err(e.into()),
    }
}
