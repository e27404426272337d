//! Cart aggregate.
//!
//! The cart is an insertion-ordered collection of lines, unique by product
//! id. The line container is private and `add` is the only insertion path,
//! which makes the uniqueness invariant structural rather than something
//! callers have to maintain.

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductId};
use crate::error::{MartError, Result};

/// One (product, quantity) pairing in the cart.
///
/// The product is the copy taken at add-time. Quantity is always ≥ 1; a
/// removal deletes the whole line rather than decrementing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub qty: u32,
}

impl CartLine {
    /// Price of this line: unit price times quantity, in whole rupiah.
    pub fn line_total(&self) -> u64 {
        self.product.price * u64::from(self.qty)
    }
}

/// The in-memory shopping cart.
///
/// Created empty at application start, mutated only through [`Cart::add`],
/// [`Cart::remove`] and [`Cart::clear`], and never persisted across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `qty` units of `product`.
    ///
    /// If a line for the same product id already exists its quantity is
    /// incremented (merge, not replace) and the line keeps its position;
    /// otherwise a new line is appended at the end.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if `qty` is zero, or if merging would
    /// overflow the line's quantity. The cart is left unchanged either way.
    pub fn add(&mut self, product: Product, qty: u32) -> Result<()> {
        if qty == 0 {
            return Err(MartError::validation("quantity must be at least 1"));
        }
        if let Some(existing) = self.lines.iter_mut().find(|line| line.product.id == product.id) {
            existing.qty = existing
                .qty
                .checked_add(qty)
                .ok_or_else(|| MartError::validation("quantity too large"))?;
        } else {
            self.lines.push(CartLine { product, qty });
        }
        Ok(())
    }

    /// Removes the line for `id`, if present.
    ///
    /// Ids are compared as text, so a numeric id and its string form match.
    /// Returns `true` if a line was removed; removing an absent id is a
    /// no-op, not an error.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != *id);
        self.lines.len() != before
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not units).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Quantity currently carried for `id`, if any.
    pub fn qty_of(&self, id: &ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product.id == *id)
            .map(|line| line.qty)
    }

    /// Sum of all line totals, in whole rupiah.
    pub fn subtotal(&self) -> u64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}
