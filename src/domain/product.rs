//! Product records and the admin-facing create/update payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A sellable product in the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub stock: u32,
    pub description: String,
    #[serde(default)]
    pub featured: bool,
}

/// Payload for creating a product.
///
/// Absent numeric fields default to zero, strings to empty and
/// `featured` to false; the id is assigned by the catalog.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "non_negative_price")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
}

/// Partial update for an existing product; absent fields keep their
/// previous values.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[validate(custom = "non_negative_price")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub featured: Option<bool>,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("price must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let draft: ProductDraft = serde_json::from_str(r#"{"name": "Neon Mug"}"#).unwrap();
        assert_eq!(draft.name, "Neon Mug");
        assert_eq!(draft.price, Decimal::ZERO);
        assert_eq!(draft.stock, 0);
        assert!(!draft.featured);
    }

    #[test]
    fn test_negative_price_rejected() {
        let draft: ProductDraft = serde_json::from_str(r#"{"name": "X", "price": -1.0}"#).unwrap();
        assert!(draft.validate().is_err());

        let patch: ProductPatch = serde_json::from_str(r#"{"price": -0.01}"#).unwrap();
        assert!(patch.validate().is_err());
    }
}
