//! Payment provider client.
//!
//! Creates checkout preferences at the third-party payment provider: the
//! cart lines and payer go in, a preference id plus a hosted checkout URL
//! (`init_point`) come back. The client is constructed exactly once in
//! `AppState::new` and handed out by reference; there is no module-level
//! instance.

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wagtail_core::PreferenceId;

use crate::config::PaymentProviderConfig;

/// Errors that can occur talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("payment provider returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A request URL could not be built.
    #[error("invalid payment url: {0}")]
    Url(#[from] url::ParseError),
}

/// One purchasable line in a preference.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceItem {
    /// Display title for the provider's checkout page.
    pub title: String,
    /// Number of units.
    pub quantity: u32,
    /// Unit price in the currency's standard unit.
    pub unit_price: Decimal,
    /// ISO 4217 currency code.
    pub currency_id: String,
}

/// The paying customer.
#[derive(Debug, Clone, Serialize)]
pub struct PreferencePayer {
    /// Payer display name.
    pub name: String,
    /// Payer email.
    pub email: String,
}

/// Where the provider sends the shopper after checkout.
#[derive(Debug, Clone, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Request body for preference creation.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub payer: PreferencePayer,
    pub back_urls: BackUrls,
}

/// A created checkout preference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Preference {
    /// Provider-issued preference id.
    pub id: PreferenceId,
    /// Hosted checkout URL to send the shopper to.
    pub init_point: String,
    /// When the provider created the preference.
    #[serde(default)]
    pub date_created: Option<chrono::DateTime<chrono::Utc>>,
}

/// Client for the payment provider's checkout API.
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentClientInner>,
}

struct PaymentClientInner {
    client: reqwest::Client,
    base_url: Url,
    public_key: String,
    access_token: String,
}

impl PaymentClient {
    /// Create a new payment client.
    #[must_use]
    pub fn new(config: &PaymentProviderConfig) -> Self {
        Self {
            inner: Arc::new(PaymentClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                public_key: config.public_key.clone(),
                access_token: config.access_token.expose_secret().to_owned(),
            }),
        }
    }

    /// Publishable key (safe to expose to the browser).
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.inner.public_key
    }

    /// Create a checkout preference.
    ///
    /// # Errors
    ///
    /// `Status` when the provider refuses the request; `Http`/`Url` for
    /// transport failures.
    pub async fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Result<Preference, PaymentError> {
        let url = self.inner.base_url.join("checkout/preferences")?;

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(&self.inner.access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Status { status, message });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_request_serializes_provider_shape() {
        let request = PreferenceRequest {
            items: vec![PreferenceItem {
                title: "Dog food 5kg".to_owned(),
                quantity: 2,
                unit_price: Decimal::new(1999, 2),
                currency_id: "USD".to_owned(),
            }],
            payer: PreferencePayer {
                name: "Dana".to_owned(),
                email: "dana@wagtail.example".to_owned(),
            },
            back_urls: BackUrls {
                success: "https://shop.example/checkout/success".to_owned(),
                failure: "https://shop.example/checkout/failure".to_owned(),
                pending: "https://shop.example/checkout/pending".to_owned(),
            },
        };

        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["items"][0]["title"], "Dog food 5kg");
        assert_eq!(json["items"][0]["unit_price"], "19.99");
        assert_eq!(json["payer"]["email"], "dana@wagtail.example");
        assert_eq!(json["back_urls"]["pending"], "https://shop.example/checkout/pending");
    }

    #[test]
    fn preference_response_deserializes() {
        let raw = r#"{"id":"pref_123","init_point":"https://pay.example/init/pref_123","date_created":"2026-08-01T12:00:00Z"}"#;
        let preference: Preference = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(preference.id.as_str(), "pref_123");
        assert!(preference.init_point.ends_with("pref_123"));
        assert!(preference.date_created.is_some());
    }
}
