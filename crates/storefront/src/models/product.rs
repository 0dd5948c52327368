//! Catalog product type.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use tidepool_core::ProductId;

/// A read-only catalog product.
///
/// The catalog is seeded by the CLI and never mutated by the storefront.
/// `price` serializes as a string (`rust_decimal` serde-with-str), and ids
/// are plain integers, so nothing in the JSON surface depends on a client
/// being able to represent wide or arbitrary-precision numbers.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    /// Catalog row id.
    pub id: ProductId,
    /// Display name.
    pub product_name: String,
    /// Unit price.
    pub price: Decimal,
    /// One of the canonical catalog categories.
    pub category: String,
    /// Product image URL.
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_serializes_as_string() {
        let product = Product {
            id: ProductId::new(1),
            product_name: "Wireless Headphones".to_string(),
            price: Decimal::new(9999, 2),
            category: "Electronics".to_string(),
            image_url: "https://example.com/p.jpg".to_string(),
        };

        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(json["price"], serde_json::json!("99.99"));
        assert_eq!(json["id"], serde_json::json!(1));
    }
}
