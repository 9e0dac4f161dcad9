//! Checkout: the single path from a cart to a persisted order.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::Order;
use crate::store::{CartStore, OrderLedger, ProductCatalog};
use crate::{Result, StoreError};

/// Placeholder identity recorded when a checkout names no customer.
pub const GUEST_NAME: &str = "Guest";
pub const GUEST_EMAIL: &str = "guest@neonmart.local";

/// Optional customer identity supplied with a checkout request.
#[derive(Debug, Default)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Orchestrates cart -> order with stock reconciliation.
///
/// The whole read-modify-write sequence runs under `gate`, so checkouts
/// are serialized: another checkout never observes stock decremented
/// without the order appended, or the reverse.
pub struct CheckoutCoordinator {
    catalog: Arc<ProductCatalog>,
    carts: Arc<CartStore>,
    ledger: Arc<OrderLedger>,
    gate: Mutex<()>,
}

impl CheckoutCoordinator {
    pub fn new(catalog: Arc<ProductCatalog>, carts: Arc<CartStore>, ledger: Arc<OrderLedger>) -> Self {
        Self {
            catalog,
            carts,
            ledger,
            gate: Mutex::new(()),
        }
    }

    /// Convert the visitor's cart into an order.
    ///
    /// An empty cart fails validation and leaves every store untouched.
    /// On success the cart is empty, each referenced product's stock has
    /// dropped by the line quantity (clamped at zero), and the order
    /// carries the cart's snapshot total.
    pub fn checkout(&self, visitor: Uuid, customer: CustomerInfo) -> Result<Order> {
        let _gate = self.gate.lock();

        // Draining the cart is both the emptiness check and the clear.
        // Nothing after this point can fail, so the lines are never lost.
        let lines = self.carts.take(visitor);
        if lines.is_empty() {
            return Err(StoreError::validation("cart is empty"));
        }

        // Lines keep their add-time prices; a catalog price change after
        // add-to-cart is not reflected here. A product deleted since it
        // was added is skipped, but the order still records its line.
        for line in &lines {
            self.catalog.adjust_stock(line.product_id, -i64::from(line.quantity));
        }

        let name = customer
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| GUEST_NAME.to_string());
        let email = customer
            .email
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| GUEST_EMAIL.to_string());
        let order = self.ledger.create(lines, name, email)?;

        tracing::info!(order_id = order.id, total = %order.total, "checkout completed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CartLine;
    use crate::store::catalog::starter_products;
    use rust_decimal::Decimal;

    struct Fixture {
        catalog: Arc<ProductCatalog>,
        carts: Arc<CartStore>,
        ledger: Arc<OrderLedger>,
        coordinator: CheckoutCoordinator,
        visitor: Uuid,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(ProductCatalog::with_products(starter_products()));
        let carts = Arc::new(CartStore::new(std::time::Duration::from_secs(60)));
        let ledger = Arc::new(OrderLedger::new());
        let coordinator =
            CheckoutCoordinator::new(catalog.clone(), carts.clone(), ledger.clone());
        Fixture {
            catalog,
            carts,
            ledger,
            coordinator,
            visitor: Uuid::new_v4(),
        }
    }

    fn add(f: &Fixture, product_id: u32, quantity: u32) {
        let product = f.catalog.get(product_id).unwrap();
        f.carts.add(f.visitor, CartLine::snapshot(&product, quantity));
    }

    #[test]
    fn test_empty_cart_fails_without_side_effects() {
        let f = fixture();
        let err = f.coordinator.checkout(f.visitor, CustomerInfo::default());
        assert!(matches!(err, Err(StoreError::Validation(_))));
        assert!(f.ledger.list().is_empty());
        assert_eq!(f.catalog.get(1).unwrap().stock, 15);
    }

    #[test]
    fn test_checkout_freezes_total_and_decrements_stock() {
        let f = fixture();
        add(&f, 1, 3); // 79.99 each, stock 15

        let cart_total = f.carts.view(f.visitor).total;
        let order = f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();

        assert_eq!(order.total, cart_total);
        assert_eq!(order.total, Decimal::new(23997, 2));
        assert_eq!(order.status, "pending");
        assert_eq!(order.id, 1001);
        assert_eq!(order.customer_name, GUEST_NAME);
        assert_eq!(f.catalog.get(1).unwrap().stock, 12);
        assert_eq!(f.carts.view(f.visitor).count, 0);
    }

    #[test]
    fn test_overdrawn_checkout_clamps_stock_at_zero() {
        let f = fixture();
        add(&f, 6, 10); // stock is only 6

        let order = f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();
        assert_eq!(order.items[0].quantity, 10);
        assert_eq!(f.catalog.get(6).unwrap().stock, 0);
    }

    #[test]
    fn test_product_deleted_mid_session_is_skipped() {
        let f = fixture();
        add(&f, 2, 1);
        add(&f, 3, 2);
        f.catalog.delete(2);

        let order = f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();
        // the order still records both snapshot lines
        assert_eq!(order.items.len(), 2);
        assert_eq!(f.catalog.get(3).unwrap().stock, 18);
        assert!(matches!(f.catalog.get(2), Err(StoreError::ProductNotFound)));
    }

    #[test]
    fn test_price_change_after_add_keeps_snapshot_price() {
        let f = fixture();
        add(&f, 4, 2); // 29.99 each
        f.catalog
            .update(
                4,
                crate::domain::ProductPatch {
                    price: Some(Decimal::new(9999, 2)),
                    ..Default::default()
                },
            )
            .unwrap();

        let order = f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();
        assert_eq!(order.total, Decimal::new(5998, 2));
    }

    #[test]
    fn test_order_ids_continue_from_previous_max() {
        let f = fixture();
        add(&f, 1, 1);
        let first = f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();
        add(&f, 1, 1);
        let second = f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();
        assert_eq!(first.id, 1001);
        assert_eq!(second.id, 1002);
    }

    #[test]
    fn test_second_checkout_of_the_same_cart_fails() {
        let f = fixture();
        add(&f, 1, 2);
        f.coordinator.checkout(f.visitor, CustomerInfo::default()).unwrap();

        // the drain left nothing behind for a replayed request
        let err = f.coordinator.checkout(f.visitor, CustomerInfo::default());
        assert!(matches!(err, Err(StoreError::Validation(_))));
        assert_eq!(f.ledger.list().len(), 1);
        assert_eq!(f.catalog.get(1).unwrap().stock, 13);
    }

    #[test]
    fn test_customer_identity_defaults_to_guest() {
        let f = fixture();
        add(&f, 1, 1);
        let order = f
            .coordinator
            .checkout(
                f.visitor,
                CustomerInfo {
                    name: Some("  ".into()),
                    email: None,
                },
            )
            .unwrap();
        assert_eq!(order.customer_name, GUEST_NAME);
        assert_eq!(order.customer_email, GUEST_EMAIL);
    }

    #[test]
    fn test_supplied_customer_identity_is_recorded() {
        let f = fixture();
        add(&f, 5, 1);
        let order = f
            .coordinator
            .checkout(
                f.visitor,
                CustomerInfo {
                    name: Some("Ada".into()),
                    email: Some("ada@example.com".into()),
                },
            )
            .unwrap();
        assert_eq!(order.customer_name, "Ada");
        assert_eq!(order.customer_email, "ada@example.com");
    }
}
