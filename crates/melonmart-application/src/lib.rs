//! MelonMart application services.
//!
//! Wires the shared application state ([`AppContext`]) to the core ports:
//! the session lifecycle (hydrate / login / logout), cart operations,
//! checkout orchestration against the payment widget, and the seller
//! submission flow. The UI layer calls these services and never touches the
//! cart or session directly.

pub mod cart_service;
pub mod checkout_service;
pub mod context;
pub mod seller_service;
pub mod session_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use cart_service::CartService;
pub use checkout_service::{CheckoutReport, CheckoutService};
pub use context::AppContext;
pub use seller_service::{SellerService, SellerSubmission};
pub use session_service::SessionService;
