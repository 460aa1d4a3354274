//! Shipping address draft.

use serde::{Deserialize, Serialize};

/// A user-entered delivery address draft, persisted across sessions.
///
/// The persisted wire form is a camelCase JSON object; fields absent from a
/// stored blob deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingData {
    /// Postal code; the only field checkout requires to be non-empty.
    pub postal_code: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Province or state.
    pub province: String,
    /// Free-text delivery notes.
    pub additional_info: String,
}

impl ShippingData {
    /// Whether the draft carries enough data to quote shipping.
    #[must_use]
    pub fn has_postal_code(&self) -> bool {
        !self.postal_code.is_empty()
    }
}
