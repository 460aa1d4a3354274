//! Clinical and staff route handlers.
//!
//! These views carry a required-role parameter via their extractors: the
//! clinic dashboard is for veterinarians, the stock report for store
//! staff. Anonymous visitors are sent to login, everyone else to the home
//! page.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{RequireStaff, RequireVeterinarian};
use crate::services::api::Product;
use crate::state::AppState;

/// Stock level below which a product shows up in the staff report.
const LOW_STOCK_THRESHOLD: u32 = 5;

/// Clinic dashboard data.
#[derive(Debug, Serialize)]
pub struct ClinicView {
    pub veterinarian: String,
    pub email: String,
}

/// Clinic dashboard (veterinarians and superadmins).
#[instrument(skip(identity))]
pub async fn clinic(RequireVeterinarian(identity): RequireVeterinarian) -> Json<ClinicView> {
    Json(ClinicView {
        veterinarian: identity.name,
        email: identity.email.to_string(),
    })
}

/// Low-stock report data.
#[derive(Debug, Serialize)]
pub struct StockReportView {
    pub threshold: u32,
    pub low_stock: Vec<Product>,
}

/// Low-stock report (admins and superadmins).
#[instrument(skip(state, identity))]
pub async fn stock_report(
    State(state): State<AppState>,
    RequireStaff(identity): RequireStaff,
) -> Result<Json<StockReportView>> {
    tracing::debug!(viewer = %identity.id, "Stock report requested");

    let low_stock = state
        .api()
        .list_products()
        .await?
        .into_iter()
        .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
        .collect();

    Ok(Json(StockReportView {
        threshold: LOW_STOCK_THRESHOLD,
        low_stock,
    }))
}
