//! Checkout route handlers.
//!
//! Shipping-draft operations write through the shipping state manager so
//! the draft survives restarts; preference creation sends the session cart
//! plus the payer to the payment provider and returns the hosted checkout
//! URL.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use wagtail_core::ShippingData;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::routes::cart::get_cart;
use crate::services::payments::{
    BackUrls, Preference, PreferenceItem, PreferencePayer, PreferenceRequest,
};
use crate::state::AppState;

/// Postal-code patch body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCodeForm {
    pub postal_code: String,
}

/// Current shipping draft.
#[instrument(skip(state))]
pub async fn shipping_show(State(state): State<AppState>) -> Json<ShippingData> {
    Json(state.shipping().get())
}

/// Replace the shipping draft.
#[instrument(skip(state, data))]
pub async fn shipping_update(
    State(state): State<AppState>,
    Json(data): Json<ShippingData>,
) -> StatusCode {
    state.shipping().set(data);
    StatusCode::NO_CONTENT
}

/// Patch only the postal code.
#[instrument(skip(state, form))]
pub async fn shipping_postal_code(
    State(state): State<AppState>,
    Json(form): Json<PostalCodeForm>,
) -> StatusCode {
    state.shipping().update_postal_code(form.postal_code);
    StatusCode::NO_CONTENT
}

/// Clear the shipping draft.
#[instrument(skip(state))]
pub async fn shipping_clear(State(state): State<AppState>) -> StatusCode {
    state.shipping().clear();
    StatusCode::NO_CONTENT
}

/// Create a payment preference for the session cart.
///
/// Requires an authenticated shopper, a non-empty cart, and a shipping
/// draft with a postal code. Provider failures surface as an inline error
/// the shopper can retry from.
#[instrument(skip(state, session))]
pub async fn create_preference(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    session: Session,
) -> Result<Json<Preference>> {
    let cart = get_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    if !state.shipping().get().has_postal_code() {
        return Err(AppError::BadRequest(
            "shipping postal code is required".to_owned(),
        ));
    }

    let items = cart
        .items
        .iter()
        .map(|item| PreferenceItem {
            title: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.amount,
            currency_id: item.unit_price.currency_code.code().to_owned(),
        })
        .collect();

    let base_url = &state.config().base_url;
    let request = PreferenceRequest {
        items,
        payer: PreferencePayer {
            name: identity.name.clone(),
            email: identity.email.to_string(),
        },
        back_urls: BackUrls {
            success: format!("{base_url}/checkout/success"),
            failure: format!("{base_url}/checkout/failure"),
            pending: format!("{base_url}/checkout/pending"),
        },
    };

    let preference = state.payments().create_preference(&request).await?;

    tracing::info!(preference_id = %preference.id, "Payment preference created");

    Ok(Json(preference))
}
