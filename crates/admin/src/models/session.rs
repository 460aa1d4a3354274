//! Session-related types.
//!
//! Types stored in the session for admin authentication state.

use serde::{Deserialize, Serialize};

use wagtail_core::Identity;

/// Session-stored admin identity.
///
/// Only identities passing the staff policy are ever stored here; the
/// login handler refuses everyone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// The validated identity from the remote API.
    pub identity: Identity,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the remote API access token.
    pub const ACCESS_TOKEN: &str = "access_token";
}
