//! Domain models for storefront.

pub mod cart;
pub mod session;

pub use cart::{Cart, CartItem};
pub use session::{CurrentUser, keys as session_keys};
