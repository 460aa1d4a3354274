//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::api::BackendClient;
use crate::services::payments::PaymentClient;
use crate::shipping::ShippingManager;
use crate::storage::LocalStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the remote API client, the payment client, and the
/// shipping state manager. Everything is constructed exactly once here;
/// handlers receive the same instances on every access.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: BackendClient,
    payments: PaymentClient,
    shipping: ShippingManager,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = BackendClient::new(&config.api);
        let payments = PaymentClient::new(&config.payments);
        let store = LocalStore::new(config.data_dir.clone());
        let shipping = ShippingManager::new(store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                payments,
                shipping,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the remote pet-shop API client.
    #[must_use]
    pub fn api(&self) -> &BackendClient {
        &self.inner.api
    }

    /// Get a reference to the payment provider client.
    ///
    /// Always the same instance; the client is built once in [`Self::new`].
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get a reference to the shipping state manager.
    #[must_use]
    pub fn shipping(&self) -> &ShippingManager {
        &self.inner.shipping
    }
}
