//! Cart operations over the shared application state.

use std::sync::Arc;

use tracing::debug;

use melonmart_core::{CartLine, CheckoutTotals, Product, ProductId, Result};

use crate::context::AppContext;

/// The only way the UI layer mutates the cart.
///
/// Every operation takes the write lock for its whole read-modify-write, so
/// rapid-fire adds on the same product always merge; there is no suspension
/// point between reading an existing quantity and writing the merged one.
pub struct CartService {
    ctx: Arc<AppContext>,
}

impl CartService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Adds `qty` units of `product`, merging into an existing line for the
    /// same product id.
    pub async fn add_to_cart(&self, product: Product, qty: u32) -> Result<()> {
        let mut cart = self.ctx.cart.write().await;
        cart.add(product, qty)?;
        debug!(lines = cart.len(), "cart updated");
        Ok(())
    }

    /// Removes the line for `id`; a miss is a no-op. Returns whether a line
    /// was removed.
    pub async fn remove_from_cart(&self, id: &ProductId) -> bool {
        self.ctx.cart.write().await.remove(id)
    }

    /// Empties the cart.
    pub async fn clear_cart(&self) {
        self.ctx.cart.write().await.clear();
    }

    pub async fn lines(&self) -> Vec<CartLine> {
        self.ctx.cart_lines().await
    }

    pub async fn is_empty(&self) -> bool {
        self.ctx.cart.read().await.is_empty()
    }

    /// Totals for the cart as it is right now; derived, never cached.
    pub async fn totals(&self) -> CheckoutTotals {
        self.ctx.totals().await
    }
}
