//! Catalog records served by the product and stock API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;
use super::Quantity;

/// A product descriptor as returned by `GET /products/{id}`.
///
/// The cart only relies on `id`. The remaining fields are carried along so
/// the UI can render a cart line without another lookup; fields the cart
/// does not know about are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Any other descriptive fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Purchasable stock for a product, as returned by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Maximum number of units a cart line may hold.
    pub amount: u32,
}

impl Stock {
    /// Returns `true` if a cart line may hold `quantity` units.
    #[must_use]
    pub const fn allows(&self, quantity: Quantity) -> bool {
        quantity.get() <= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_product_deserialize_keeps_unknown_fields() {
        let json = r#"{
            "id": 2,
            "title": "Tênis VR Caminhada Confortável",
            "price": 139.9,
            "image": "https://example.com/tenis2.jpg",
            "brand": "VR"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(2));
        assert_eq!(product.price, Decimal::from_str("139.9").unwrap());
        assert_eq!(
            product.extra.get("brand"),
            Some(&serde_json::Value::String("VR".to_string()))
        );
    }

    #[test]
    fn test_product_image_is_optional() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "Tênis", "price": "10.00"}"#).unwrap();
        assert!(product.image.is_none());
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_product_missing_title_is_rejected() {
        assert!(serde_json::from_str::<Product>(r#"{"id": 1, "price": 10}"#).is_err());
    }

    #[test]
    fn test_stock_allows() {
        let stock = Stock { amount: 3 };
        assert!(stock.allows(Quantity::try_from(3_i64).unwrap()));
        assert!(!stock.allows(Quantity::try_from(4_i64).unwrap()));
    }

    #[test]
    fn test_stock_ignores_id_field() {
        let stock: Stock = serde_json::from_str(r#"{"id": 1, "amount": 5}"#).unwrap();
        assert_eq!(stock.amount, 5);
    }

    #[test]
    fn test_stock_rejects_negative_amount() {
        assert!(serde_json::from_str::<Stock>(r#"{"amount": -1}"#).is_err());
    }
}
