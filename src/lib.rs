//! NeonMart Storefront Backend
//!
//! Self-hosted storefront service: product catalog, per-visitor carts,
//! single-admin management, and checkout with stock reconciliation.
//!
//! ## Features
//! - Product catalog management
//! - Per-session shopping carts with idle eviction
//! - Checkout turning a cart into a persisted order with stock decrement
//! - Order ledger with admin status transitions
//!
//! All state lives in memory for the lifetime of the process; durability,
//! template rendering and static assets are external concerns.

use thiserror::Error;

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod store;

pub use api::AppState;
pub use checkout::CheckoutCoordinator;
pub use store::{CartStore, OrderLedger, ProductCatalog};

// =============================================================================
// Error Types
// =============================================================================

/// Error taxonomy shared by every core operation.
///
/// Operations fail fast: `ProductNotFound`/`OrderNotFound`/`Validation`/
/// `Unauthorized` leave all store state unchanged. `Internal` is the
/// catch-all for the unanticipated; its detail is logged, never sent to
/// the client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Admin authentication required")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
