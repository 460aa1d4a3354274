//! Cart route handlers.
//!
//! The cart lives in the session; product names and prices are snapshotted
//! from the catalog at add time.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use wagtail_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{Cart, CartItem, session_keys};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let currency = cart
            .items
            .first()
            .map(|i| i.unit_price.currency_code)
            .unwrap_or_default();

        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartLineView {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price.display(),
                    line_total: format!("{}{:.2}", currency.symbol(), item.line_total()),
                })
                .collect(),
            subtotal: format!("{}{:.2}", currency.symbol(), cart.subtotal()),
            item_count: cart.total_quantity(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, defaulting to empty.
pub async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Save the cart to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = get_cart(&session).await;
    Json(CartView::from(&cart))
}

/// Add a product to the cart.
///
/// Fetches the product from the catalog to snapshot its name and price.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    let quantity = form.quantity.unwrap_or(1).max(1);
    let product_id = ProductId::new(form.product_id);

    let product = match state.api().get_product(&product_id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            return Err(AppError::NotFound(format!("product {product_id}")));
        }
        Err(e) => return Err(e.into()),
    };

    if product.stock == 0 {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.name
        )));
    }

    let mut cart = get_cart(&session).await;
    cart.add(CartItem {
        product_id,
        name: product.name,
        unit_price: product.price,
        quantity,
    });
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Update a cart line's quantity.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await;
    cart.set_quantity(&ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await;
    cart.remove(&ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = get_cart(&session).await;
    Json(CartCountView {
        count: cart.total_quantity(),
    })
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<StatusCode> {
    session.remove::<Cart>(session_keys::CART).await?;
    Ok(StatusCode::NO_CONTENT)
}
