//! Authentication session domain.

pub mod model;
pub mod token_store;

pub use model::{HydrationOutcome, LogoutEffect, Session, User};
pub use token_store::TokenStore;
