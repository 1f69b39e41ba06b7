//! The cart collection and its entries.
//!
//! A [`Cart`] is an ordered list of [`CartEntry`] values with at most one
//! entry per product. Order is insertion order; the cart never reorders
//! entries on its own.

use serde::{Deserialize, Serialize};

use super::{Product, ProductId, Quantity};

const AMOUNT_KEY: &str = "amount";

/// Errors raised when a cart would violate its shape invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartShapeError {
    /// Two entries refer to the same product.
    #[error("product {0} appears more than once in the cart")]
    DuplicateProduct(ProductId),
}

/// One cart line: a product descriptor plus the quantity held.
///
/// Serializes flat, with `amount` next to the product fields:
///
/// ```json
/// { "id": 1, "title": "Tênis", "price": "179.9", "image": "...", "amount": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    product: Product,
    amount: Quantity,
}

impl CartEntry {
    /// Create an entry holding a single unit of `product`.
    ///
    /// An `amount` key among the descriptor's extra fields is dropped; the
    /// entry's own amount is the only one serialized.
    #[must_use]
    pub fn new(mut product: Product) -> Self {
        product.extra.remove(AMOUNT_KEY);
        Self {
            product,
            amount: Quantity::ONE,
        }
    }

    /// The product this entry refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// The product descriptor captured when the entry was created.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Units of the product held in the cart.
    #[must_use]
    pub const fn amount(&self) -> Quantity {
        self.amount
    }
}

/// The ordered set of entries in a user's cart.
///
/// Deserialization rejects snapshots containing the same product twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total units across all entries (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.amount.get()))
            .sum()
    }

    /// Look up the entry for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries
            .iter()
            .find(|entry| entry.product_id() == product_id)
    }

    /// Returns `true` if the cart has an entry for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Append a new entry at the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartShapeError::DuplicateProduct` if the product is already in the cart.
    pub fn push(&mut self, entry: CartEntry) -> Result<(), CartShapeError> {
        if self.contains(entry.product_id()) {
            return Err(CartShapeError::DuplicateProduct(entry.product_id()));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Replace the amount held for `product_id`, keeping the entry in place.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_amount(&mut self, product_id: ProductId, amount: Quantity) -> bool {
        self.entries
            .iter_mut()
            .find(|entry| entry.product_id() == product_id)
            .map(|entry| entry.amount = amount)
            .is_some()
    }

    /// Remove the entry for `product_id`, preserving the order of the rest.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.product_id() == product_id)?;
        Some(self.entries.remove(index))
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = CartShapeError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for entry in entries {
            cart.push(entry)?;
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Decimal::new(17990, 2),
            image: Some(format!("https://example.com/{id}.jpg")),
            extra: serde_json::Map::new(),
        }
    }

    fn cart_of(ids: &[i32]) -> Cart {
        let mut cart = Cart::new();
        for id in ids {
            cart.push(CartEntry::new(product(*id))).unwrap();
        }
        cart
    }

    fn ids(cart: &Cart) -> Vec<i32> {
        cart.iter().map(|e| e.product_id().as_i32()).collect()
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut cart = cart_of(&[1]);
        let err = cart.push(CartEntry::new(product(1))).unwrap_err();
        assert_eq!(err, CartShapeError::DuplicateProduct(ProductId::new(1)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart = cart_of(&[1, 2, 3]);
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.product_id(), ProductId::new(2));
        assert_eq!(ids(&cart), vec![1, 3]);
    }

    #[test]
    fn test_remove_missing() {
        let mut cart = cart_of(&[1]);
        assert!(cart.remove(ProductId::new(9)).is_none());
        assert_eq!(ids(&cart), vec![1]);
    }

    #[test]
    fn test_set_amount_keeps_position() {
        let mut cart = cart_of(&[1, 2, 3]);
        let five = Quantity::try_from(5_i64).unwrap();
        assert!(cart.set_amount(ProductId::new(1), five));
        assert_eq!(ids(&cart), vec![1, 2, 3]);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount(), five);
        assert!(!cart.set_amount(ProductId::new(4), five));
    }

    #[test]
    fn test_item_count() {
        let mut cart = cart_of(&[1, 2]);
        cart.set_amount(ProductId::new(2), Quantity::try_from(3_i64).unwrap());
        assert_eq!(cart.item_count(), 4);
        assert_eq!(Cart::new().item_count(), 0);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let cart = cart_of(&[1]);
        let value = serde_json::to_value(&cart).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["amount"], 1);
        assert_eq!(first["title"], "Tênis 1");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = cart_of(&[3, 1, 2]);
        cart.set_amount(ProductId::new(1), Quantity::try_from(4_i64).unwrap());

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_browser_snapshot() {
        let json = r#"[
            {"id": 1, "title": "Tênis de Caminhada", "price": 179.9,
             "image": "https://example.com/1.jpg", "amount": 2}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        let entry = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(entry.amount().get(), 2);
        assert_eq!(entry.product().title, "Tênis de Caminhada");
        assert!(entry.product().extra.is_empty());
    }

    #[test]
    fn test_descriptor_amount_does_not_shadow_entry_amount() {
        let mut descriptor = product(1);
        descriptor
            .extra
            .insert("amount".to_string(), serde_json::json!(99));
        descriptor
            .extra
            .insert("brand".to_string(), serde_json::json!("Nike"));

        let mut cart = Cart::new();
        cart.push(CartEntry::new(descriptor)).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json.matches("\"amount\"").count(), 1);

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
        let entry = restored.get(ProductId::new(1)).unwrap();
        assert_eq!(entry.amount(), Quantity::ONE);
        assert_eq!(entry.product().extra.get("brand"), Some(&serde_json::json!("Nike")));
        assert!(!entry.product().extra.contains_key("amount"));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[
            {"id": 1, "title": "A", "price": 1, "amount": 1},
            {"id": 1, "title": "A", "price": 1, "amount": 2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero_amount() {
        let json = r#"[{"id": 1, "title": "A", "price": 1, "amount": 0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
