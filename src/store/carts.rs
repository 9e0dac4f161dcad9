//! Per-visitor cart registry with idle eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Cart, CartLine};

/// Snapshot of one cart handed back to the HTTP layer.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub count: usize,
}

struct Entry {
    cart: Cart,
    touched_at: Instant,
}

impl Entry {
    fn new() -> Self {
        Self {
            cart: Cart::new(),
            touched_at: Instant::now(),
        }
    }
}

/// All live carts, keyed by the visitor id stored in each session.
///
/// A cart is created empty on the visitor's first interaction, is never
/// shared between visitors, and is evicted once idle for longer than the
/// TTL (the sweeper task in `main` drives `purge_idle`).
pub struct CartStore {
    carts: Mutex<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl CartStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            carts: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn add(&self, visitor: Uuid, line: CartLine) {
        let mut carts = self.carts.lock();
        let entry = carts.entry(visitor).or_insert_with(Entry::new);
        entry.cart.add_line(line);
        entry.touched_at = Instant::now();
    }

    /// Idempotent: removing from an absent cart or an absent line is a
    /// successful no-op.
    pub fn remove(&self, visitor: Uuid, product_id: u32) {
        if let Some(entry) = self.carts.lock().get_mut(&visitor) {
            entry.cart.remove_line(product_id);
            entry.touched_at = Instant::now();
        }
    }

    /// Lines, recomputed total and distinct-line count.
    pub fn view(&self, visitor: Uuid) -> CartView {
        let mut carts = self.carts.lock();
        match carts.get_mut(&visitor) {
            Some(entry) => {
                entry.touched_at = Instant::now();
                CartView {
                    lines: entry.cart.lines().to_vec(),
                    total: entry.cart.total(),
                    count: entry.cart.line_count(),
                }
            }
            None => CartView {
                lines: Vec::new(),
                total: Decimal::ZERO,
                count: 0,
            },
        }
    }

    pub fn clear(&self, visitor: Uuid) {
        if let Some(entry) = self.carts.lock().get_mut(&visitor) {
            entry.cart.clear();
            entry.touched_at = Instant::now();
        }
    }

    /// Drain the visitor's cart in one critical section. Checkout uses
    /// this so two concurrent checkouts cannot spend the same lines.
    pub fn take(&self, visitor: Uuid) -> Vec<CartLine> {
        match self.carts.lock().get_mut(&visitor) {
            Some(entry) => {
                entry.touched_at = Instant::now();
                entry.cart.take_lines()
            }
            None => Vec::new(),
        }
    }

    /// Evict carts idle for longer than the TTL; returns how many went.
    pub fn purge_idle(&self) -> usize {
        let mut carts = self.carts.lock();
        let before = carts.len();
        carts.retain(|_, entry| entry.touched_at.elapsed() <= self.ttl);
        before - carts.len()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.carts.lock().len()
    }
}
