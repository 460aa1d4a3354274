//! Core domain types.

pub mod email;
pub mod id;
pub mod identity;
pub mod price;
pub mod role;
pub mod shipping;

pub use email::{Email, EmailError};
pub use id::{PreferenceId, ProductId, UserId};
pub use identity::{Identity, PayloadError};
pub use price::{CurrencyCode, Price};
pub use role::Role;
pub use shipping::ShippingData;
