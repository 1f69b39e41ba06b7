//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `cart` - Cart state store, catalog client, and storage backends
//! - `integration-tests` - End-to-end tests against a mock product API
//!
//! # Architecture
//!
//! The core crate contains only types and pure collection logic - no I/O,
//! no HTTP clients, no storage. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, validated quantities, catalog records, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
