//! Shopping cart domain.

pub mod model;
pub mod totals;

pub use model::{Cart, CartLine};
pub use totals::{CheckoutTotals, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};
