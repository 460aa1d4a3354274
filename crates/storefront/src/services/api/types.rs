//! Wire types for the remote pet-shop API.

use serde::{Deserialize, Serialize};

use wagtail_core::{Price, ProductId};

/// A catalog product as served by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Opaque product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Catalog category (e.g., "food", "toys", "health").
    #[serde(default)]
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Primary image URL.
    #[serde(default)]
    pub image_url: String,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
}

/// Envelope the auth endpoints answer with.
///
/// A 2xx response with `ok: false` is a logical failure and maps to
/// `ApiError::Rejected`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// Whether the operation logically succeeded.
    #[serde(default = "default_true")]
    pub ok: bool,
    /// Bearer token, present on successful login/exchange.
    pub token: Option<String>,
    /// Untyped profile payload, validated by `Identity::from_payload`.
    pub user: Option<serde_json::Value>,
    /// Human-readable failure reason when `ok` is false.
    pub message: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// Registration request body.
#[derive(Debug, Serialize)]
pub struct NewUser {
    /// Email address for the account.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub name: String,
}

/// Password-change request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// The password being replaced.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}
