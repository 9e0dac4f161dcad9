//! The product catalog: the authoritative set of sellable products.

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{Product, ProductDraft, ProductPatch};
use crate::{Result, StoreError};

/// Process-wide mutable product collection, insertion-ordered.
///
/// Concurrent admin edits are last-writer-wins; every operation is a
/// single critical section under the catalog lock.
pub struct ProductCatalog {
    products: Mutex<Vec<Product>>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    /// Full catalog in insertion order.
    pub fn list(&self) -> Vec<Product> {
        self.products.lock().clone()
    }

    pub fn get(&self, id: u32) -> Result<Product> {
        self.products
            .lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::ProductNotFound)
    }

    /// Append a new product. Ids count up from the current maximum and
    /// are never reused after a delete.
    pub fn create(&self, draft: ProductDraft) -> Product {
        let mut products = self.products.lock();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Product {
            id,
            name: draft.name,
            price: draft.price,
            category: draft.category,
            image: draft.image,
            stock: draft.stock,
            description: draft.description,
            featured: draft.featured,
        };
        products.push(product.clone());
        product
    }

    /// Overwrite the provided fields; absent fields keep their values.
    pub fn update(&self, id: u32, patch: ProductPatch) -> Result<Product> {
        let mut products = self.products.lock();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::ProductNotFound)?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(featured) = patch.featured {
            product.featured = featured;
        }
        Ok(product.clone())
    }

    /// Filter-based removal: deleting an absent id succeeds.
    pub fn delete(&self, id: u32) {
        self.products.lock().retain(|p| p.id != id);
    }

    /// Clamp stock at zero rather than rejecting. An unknown id is
    /// ignored; the product may have been deleted mid-session.
    pub fn adjust_stock(&self, id: u32, delta: i64) {
        let mut products = self.products.lock();
        if let Some(product) = products.iter_mut().find(|p| p.id == id) {
            product.stock = (i64::from(product.stock) + delta).max(0) as u32;
        }
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Starter catalog seeded at boot.
pub fn starter_products() -> Vec<Product> {
    let product = |id, name: &str, cents, category: &str, image: &str, stock, description: &str| Product {
        id,
        name: name.into(),
        price: Decimal::new(cents, 2),
        category: category.into(),
        image: image.into(),
        stock,
        description: description.into(),
        featured: false,
    };
    vec![
        product(1, "Neon Headphones", 7999, "audio", "🎧", 15, "Over-ear headphones with reactive LED rings"),
        product(2, "Synthwave Keyboard", 12900, "peripherals", "⌨️", 8, "Hot-swappable mechanical keyboard, magenta backlight"),
        product(3, "Pulse Mouse", 4500, "peripherals", "🖱️", 20, "Lightweight mouse with RGB underglow"),
        product(4, "LED Strip Kit", 2999, "lighting", "💡", 40, "5m addressable strip with remote"),
        product(5, "Retro Controller", 3499, "gaming", "🕹️", 12, "Bluetooth gamepad in translucent purple"),
        product(6, "Bass Cube Speaker", 8999, "audio", "🔊", 6, "Desk speaker with beat-synced glow"),
    ]
}
