//! In-memory stores owning the process-wide shared state.
//!
//! Each store guards its own collection behind its own lock; nothing
//! else in the crate can reach the underlying lists.
pub mod carts;
pub mod catalog;
pub mod ledger;

pub use carts::{CartStore, CartView};
pub use catalog::ProductCatalog;
pub use ledger::OrderLedger;
