//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod product;
pub mod quantity;

pub use cart::{Cart, CartEntry, CartShapeError};
pub use id::*;
pub use product::{Product, Stock};
pub use quantity::{Quantity, QuantityError};
