//! MelonMart core domain.
//!
//! Domain models and port traits for the client-side storefront: the
//! shopping cart and its derived totals, the authentication session, the
//! checkout state machine, and the contracts the outer crates implement
//! (token storage, the remote storefront API, the payment widget, and the
//! optional image-quality analyzer).
//!
//! This crate is a leaf: no I/O, no HTTP, no runtime. Everything here is
//! either a value type or a trait seam.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod quality;
pub mod session;
pub mod storefront;

pub use cart::{Cart, CartLine, CheckoutTotals, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};
pub use catalog::{ImageUpload, NewProductForm, Product, ProductId, SellerInfo};
pub use checkout::{CheckoutAttempt, CheckoutState, PaymentOutcome, PaymentWidget};
pub use error::{MartError, Result};
pub use quality::{QualityAnalyzer, QualityAssessment, QualityGrade};
pub use session::{HydrationOutcome, LogoutEffect, Session, TokenStore, User};
pub use storefront::{
    AuthToken, PaymentRequest, PaymentTransaction, ProfileUpdate, StorefrontGateway,
};
