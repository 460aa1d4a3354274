//! Integration tests for Wagtail Pets.
//!
//! The tests drive the real routers in-process with `tower::ServiceExt`;
//! no live servers and no network. The remote API base URLs point at a
//! reserved address, which is fine because every tested path decides
//! before any outbound call would happen.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wagtail-integration-tests
//! ```

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use wagtail_admin::config::AdminConfig;
use wagtail_storefront::config::{
    BackendApiConfig, PaymentProviderConfig, StorefrontConfig,
};

/// A base URL no test is allowed to actually reach.
const UNREACHABLE_API: &str = "http://127.0.0.1:9/v1/";

/// Storefront configuration for in-process tests.
///
/// `data_dir` controls shipping-draft persistence; `None` disables it.
#[must_use]
pub fn storefront_config(data_dir: Option<PathBuf>) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        base_url: "http://storefront.test".to_owned(),
        session_secret: SecretString::from("kD93hfz02mQ81lrVbN56wyTgXc47JpRa".to_owned()),
        api: BackendApiConfig {
            base_url: Url::parse(UNREACHABLE_API).expect("valid url"),
            auth_client_id: "wagtail-storefront-test".to_owned(),
            product_cache_ttl: Duration::from_secs(60),
        },
        payments: PaymentProviderConfig {
            base_url: Url::parse("http://127.0.0.1:9/").expect("valid url"),
            public_key: "TEST-public-key".to_owned(),
            access_token: SecretString::from("TEST-access-token-0000000000000000".to_owned()),
        },
        data_dir,
        sentry_dsn: None,
    }
}

/// Admin configuration for in-process tests.
#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        base_url: "http://admin.test".to_owned(),
        session_secret: SecretString::from("kD93hfz02mQ81lrVbN56wyTgXc47JpRa".to_owned()),
        api_base_url: Url::parse(UNREACHABLE_API).expect("valid url"),
        sentry_dsn: None,
    }
}
