//! Derived checkout totals.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Orders strictly above this subtotal ship for free. Whole rupiah.
pub const FREE_SHIPPING_THRESHOLD: u64 = 150_000;

/// Flat shipping fee applied below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: u64 = 20_000;

/// Totals derived from the current cart state.
///
/// Purely a function of the cart; recomputed on every read and never cached,
/// so it cannot go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: u64,
    pub shipping: u64,
    pub total: u64,
}

impl CheckoutTotals {
    /// Computes totals for the given cart.
    ///
    /// `shipping` is zero iff the subtotal strictly exceeds
    /// [`FREE_SHIPPING_THRESHOLD`].
    pub fn for_cart(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            0
        } else {
            FLAT_SHIPPING_FEE
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    pub fn free_shipping(&self) -> bool {
        self.shipping == 0
    }
}
