//! Remote pet-shop API client for the admin surface.
//!
//! Separate from the storefront's client on purpose: the admin panel calls
//! the API's write endpoints with the logged-in staff member's own token,
//! and the two binaries must not share credentials.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use url::Url;

use wagtail_core::{Identity, Price, ProductId};

use crate::config::AdminConfig;

/// Errors that can occur talking to the remote pet-shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("api returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A successful HTTP response that signals a logical failure.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The API answered 2xx but the payload failed validation.
    #[error("invalid payload from api: {0}")]
    Payload(#[from] wagtail_core::PayloadError),

    /// A request URL could not be built.
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this error is the remote saying "no such resource".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}

/// A catalog product as served by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock: u32,
}

/// Editable product fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub image_url: String,
    pub stock: u32,
}

/// Envelope the auth endpoints answer with.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default = "default_true")]
    ok: bool,
    token: Option<String>,
    message: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// Client for the admin surface of the remote pet-shop API.
#[derive(Clone)]
pub struct AdminApiClient {
    inner: Arc<AdminApiClientInner>,
}

struct AdminApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl AdminApiClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status, message })
    }

    /// Login with email and password; returns the bearer token.
    ///
    /// # Errors
    ///
    /// `Rejected` for wrong credentials signalled inside a 2xx envelope.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = self.endpoint("auth/login")?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: AuthResponse = Self::check_status(response).await?.json().await?;
        if !body.ok {
            return Err(ApiError::Rejected(
                body.message.unwrap_or_else(|| "login rejected".to_owned()),
            ));
        }

        body.token
            .ok_or_else(|| ApiError::Rejected("login response missing token".to_owned()))
    }

    /// Fetch and validate the profile behind a bearer token.
    ///
    /// # Errors
    ///
    /// `Payload` when the profile fails the validation boundary.
    pub async fn profile(&self, token: &str) -> Result<Identity, ApiError> {
        let url = self.endpoint("users/me")?;
        let response = self.inner.client.get(url).bearer_auth(token).send().await?;

        let payload: serde_json::Value = Self::check_status(response).await?.json().await?;
        Ok(Identity::from_payload(&payload)?)
    }

    /// List the product catalog.
    ///
    /// # Errors
    ///
    /// Transport and status errors from the API.
    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("products")?;
        let response = self.inner.client.get(url).bearer_auth(token).send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// `Status` with 404 when the product does not exist.
    pub async fn get_product(&self, token: &str, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        let response = self.inner.client.get(url).bearer_auth(token).send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// `Status` with 404 when the product does not exist; `Rejected` when
    /// the API refuses the update.
    pub async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        let response = self
            .inner
            .client
            .put(url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// List staff accounts (superadmin only upstream).
    ///
    /// # Errors
    ///
    /// Transport and status errors from the API.
    pub async fn list_staff(&self, token: &str) -> Result<Vec<serde_json::Value>, ApiError> {
        let mut url = self.endpoint("users")?;
        url.query_pairs_mut().append_pair("role", "staff");
        let response = self.inner.client.get(url).bearer_auth(token).send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }
}
