//! Home route handler.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use tracing::instrument;

use crate::middleware::OptionalAuth;
use crate::services::api::Product;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 4;

/// Shop summary returned from the home route.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub shop: &'static str,
    /// Display name of the signed-in customer, if any.
    pub customer: Option<String>,
    pub featured: Vec<Product>,
}

/// Shop summary with a few featured products.
///
/// The catalog fetch is best-effort: an unreachable API yields an empty
/// featured list, not an error page.
#[instrument(skip(state, identity))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
) -> impl IntoResponse {
    let featured = match state.api().list_products().await {
        Ok(mut products) => {
            products.truncate(FEATURED_COUNT);
            products
        }
        Err(e) => {
            tracing::warn!("Failed to fetch featured products: {e}");
            Vec::new()
        }
    };

    Json(HomeView {
        shop: "Wagtail Pets",
        customer: identity.map(|i| i.name),
        featured,
    })
}
