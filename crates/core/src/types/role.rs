//! Authorization roles.

use serde::{Deserialize, Serialize};

/// Authorization role with different permission levels.
///
/// The wire/storage representation is a lowercase string; parsing is
/// case-insensitive (`"ADMIN"`, `"Admin"` and `"admin"` are the same role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to everything including admin-user management.
    SuperAdmin,
    /// Full access to store management features.
    Admin,
    /// Clinical staff with access to veterinary features.
    Veterinarian,
    /// Regular shopper.
    User,
}

impl Role {
    /// Parse a role from its wire representation, case-insensitively.
    ///
    /// Returns `None` for unrecognized (or empty) input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "superadmin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "veterinarian" => Some(Self::Veterinarian),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Lowercase wire form of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::Veterinarian => "veterinarian",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid role: {s}"))
    }
}
