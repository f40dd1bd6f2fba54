//! Cart

use serde::{Deserialize, Serialize};

use crate::{pricing, products::Product};

/// A product and how many of it are wanted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken when the line was first added
    #[serde(flatten)]
    pub product: Product,

    /// Always at least one
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Pre-checkout selection, at most one line per product, in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Lines are merged by product id and non-positive quantities dropped so the
    /// one-line-per-product invariant holds even for hand-edited snapshots.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines {
            if line.quantity > 0 {
                cart.add(line.product, line.quantity);
            }
        }

        cart
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// A zero quantity is ignored.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.line_mut(product.id.as_str()) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine { product, quantity }),
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.product.id != *product_id);

        self.lines.len() != before
    }

    /// Replace the quantity of an existing line; `quantity <= 0` removes it.
    ///
    /// Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> bool {
        let Ok(quantity) = u32::try_from(quantity) else {
            return self.remove(product_id);
        };

        if quantity == 0 {
            return self.remove(product_id);
        }

        match self.line_mut(product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            Some(_) | None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn total(&self) -> u64 {
        pricing::subtotal(&self.lines)
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in first-added order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Copy the lines out, detached from this cart.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Line for `product_id`, if present.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.product.id == *product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == *product_id)
    }
}
