//! Order records: frozen checkout results with a mutable status label.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::CartLine;

/// Initial status for every new order.
pub const STATUS_PENDING: &str = "pending";

/// A historical record of a completed checkout.
///
/// `items` and `total` are frozen at creation; only `status` changes
/// afterwards, and only through the ledger. The status is an open label
/// rather than a fixed enum, so the admin can introduce workflow states
/// without a schema change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
}

impl Order {
    /// Build an order from checked-out cart lines. The total comes from
    /// the lines' snapshot prices and is never recomputed afterwards.
    pub fn create(
        id: u32,
        items: Vec<CartLine>,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
    ) -> Self {
        let total = items.iter().map(CartLine::line_total).sum();
        Self {
            id,
            items,
            total,
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
        }
    }
}
