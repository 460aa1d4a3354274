//! Application state shared across admin handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::services::api::AdminApiClient;

/// Application state shared across all admin handlers.
#[derive(Clone)]
pub struct AdminState {
    inner: Arc<AdminStateInner>,
}

struct AdminStateInner {
    config: AdminConfig,
    api: AdminApiClient,
}

impl AdminState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let api = AdminApiClient::new(&config);

        Self {
            inner: Arc::new(AdminStateInner { config, api }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the remote pet-shop API client.
    #[must_use]
    pub fn api(&self) -> &AdminApiClient {
        &self.inner.api
    }
}
