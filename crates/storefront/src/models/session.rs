//! Session-related types.
//!
//! Types stored in the session for authentication state. The access token
//! and the identity are only ever written together (see
//! `routes::auth::establish_session`); a token without an identity means
//! the profile bootstrap has not landed yet.

use serde::{Deserialize, Serialize};

use wagtail_core::Identity;

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The validated identity from the remote API.
    pub identity: Identity,
}

/// Session keys for authentication and cart data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the remote API access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the session-held shopping cart.
    pub const CART: &str = "cart";

    /// Key for the auth-provider state parameter (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";
}
