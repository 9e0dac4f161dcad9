//! Cart aggregate: a visitor's pending, uncommitted selection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// One cart line: a product snapshot plus a quantity.
///
/// `name`, `price` and `image` are denormalized at add time; a later
/// catalog edit does not reprice lines already in a cart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: u32,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot the product's display fields at add time.
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A visitor's cart. At most one line per product id; a line's quantity
/// is always at least 1.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines, not the sum of quantities.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Recomputed on every call; never cached.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Merge-or-append: a repeated add bumps the existing line's
    /// quantity and keeps the original snapshot fields.
    pub fn add_line(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Removing an absent product id is a no-op.
    pub fn remove_line(&mut self, product_id: u32) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Empty the cart, returning its lines.
    pub fn take_lines(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}
