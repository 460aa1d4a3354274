//! Remote pet-shop API client.
//!
//! The API owns accounts, profiles and the product catalog; this client
//! wraps its REST surface. Authentication uses an authorization-code flow:
//!
//! 1. Generate the authorization URL with `authorization_url()`
//! 2. Redirect the shopper to the provider's login page
//! 3. The provider redirects back with an authorization code
//! 4. Exchange the code with `exchange_code()`
//! 5. Use the bearer token for account-scoped calls
//!
//! Product reads go through a short-TTL in-process cache.

mod cache;
mod error;
pub mod types;

pub use error::ApiError;
pub use types::{AuthResponse, NewUser, PasswordChange, Product};

use std::sync::Arc;

use moka::future::Cache;
use serde_json::json;
use url::Url;

use wagtail_core::{Identity, ProductId};

use crate::config::BackendApiConfig;
use crate::services::api::cache::{CacheKey, CacheValue};

/// Maximum number of cached catalog entries.
const PRODUCT_CACHE_CAPACITY: u64 = 1024;

/// Client for the remote pet-shop REST API.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth_client_id: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl BackendClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &BackendApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.product_cache_ttl)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                auth_client_id: config.auth_client_id.clone(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Turn a non-success response into `ApiError::Status`.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status, message })
    }

    /// Unwrap the auth envelope, mapping logical failures to `Rejected`.
    fn check_envelope(body: AuthResponse) -> Result<AuthResponse, ApiError> {
        if body.ok {
            Ok(body)
        } else {
            Err(ApiError::Rejected(
                body.message.unwrap_or_else(|| "request rejected".to_owned()),
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────

    /// Build the authorization URL for the hosted login flow.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after login
    /// * `state` - Random string stored in the session to prevent CSRF
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the endpoint cannot be built.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("auth/authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.inner.auth_client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for a token and profile payload.
    ///
    /// # Errors
    ///
    /// `Rejected` when the provider logically refuses the code; `Status`,
    /// `Http` and `Url` for the transport-level failures.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<(String, serde_json::Value), ApiError> {
        let url = self.endpoint("auth/token")?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&json!({
                "grant_type": "authorization_code",
                "client_id": self.inner.auth_client_id,
                "code": code,
                "redirect_uri": redirect_uri,
            }))
            .send()
            .await?;

        let body: AuthResponse = Self::check_status(response).await?.json().await?;
        let body = Self::check_envelope(body)?;

        let token = body
            .token
            .ok_or_else(|| ApiError::Rejected("exchange response missing token".to_owned()))?;
        let user = body
            .user
            .ok_or_else(|| ApiError::Rejected("exchange response missing profile".to_owned()))?;

        Ok((token, user))
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
        let body = Self::check_envelope(body)?;

        body.token
            .ok_or_else(|| ApiError::Rejected("login response missing token".to_owned()))
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// `Rejected` when the API refuses the registration (e.g., duplicate
    /// email) inside a 2xx envelope.
    pub async fn register(&self, new_user: &NewUser) -> Result<(), ApiError> {
        let url = self.endpoint("auth/register")?;
        let response = self.inner.client.post(url).json(new_user).send().await?;

        let body: AuthResponse = Self::check_status(response).await?.json().await?;
        Self::check_envelope(body)?;
        Ok(())
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

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// `Rejected` when the current password does not match.
    pub async fn change_password(
        &self,
        token: &str,
        change: &PasswordChange,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("users/me/password")?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token)
            .json(change)
            .send()
            .await?;

        let body: AuthResponse = Self::check_status(response).await?.json().await?;
        Self::check_envelope(body)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────

    /// List the product catalog (cached).
    ///
    /// # Errors
    ///
    /// Transport and status errors from the API.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            return Ok(products);
        }

        let url = self.endpoint("products")?;
        let response = self.inner.client.get(url).send().await?;
        let products: Vec<Product> = Self::check_status(response).await?.json().await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Fetch one product (cached).
    ///
    /// # Errors
    ///
    /// `Status` with 404 when the product does not exist.
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.as_str().to_owned());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{id}"))?;
        let response = self.inner.client.get(url).send().await?;
        let product: Product = Self::check_status(response).await?.json().await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Liveness probe against the API base URL.
    pub async fn ping(&self) -> bool {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await
            .is_ok()
    }
}
