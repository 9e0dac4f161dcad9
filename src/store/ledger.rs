//! The order ledger: append-only, with status mutation.

use parking_lot::Mutex;

use crate::domain::{CartLine, Order};
use crate::{Result, StoreError};

/// Orders number from here; their id space is distinct from products.
const FIRST_ORDER_ID: u32 = 1001;

/// Process-wide order collection. Orders are appended by checkout and
/// never deleted; only the status label changes afterwards.
pub struct OrderLedger {
    orders: Mutex<Vec<Order>>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Append a new order built from checked-out cart lines.
    pub fn create(
        &self,
        items: Vec<CartLine>,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
    ) -> Result<Order> {
        if items.is_empty() {
            return Err(StoreError::validation("cannot create an order with no items"));
        }
        let mut orders = self.orders.lock();
        let id = orders
            .iter()
            .map(|o| o.id)
            .max()
            .map_or(FIRST_ORDER_ID, |max| max + 1);
        let order = Order::create(id, items, customer_name, customer_email);
        orders.push(order.clone());
        Ok(order)
    }

    /// All orders in creation order.
    pub fn list(&self) -> Vec<Order> {
        self.orders.lock().clone()
    }

    /// The last `n` orders by creation order.
    pub fn recent(&self, n: usize) -> Vec<Order> {
        let orders = self.orders.lock();
        let skip = orders.len().saturating_sub(n);
        orders[skip..].to_vec()
    }

    /// Overwrite an order's status label.
    ///
    /// Any non-empty label is accepted and transitions go in any
    /// direction; "cancelled" back to "pending" is allowed.
    pub fn update_status(&self, id: u32, status: impl Into<String>) -> Result<Order> {
        let status = status.into();
        if status.trim().is_empty() {
            return Err(StoreError::validation("status cannot be empty"));
        }
        let mut orders = self.orders.lock();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::OrderNotFound)?;
        order.status = status;
        Ok(order.clone())
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}
