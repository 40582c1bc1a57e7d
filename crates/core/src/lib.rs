//! Chickyen Core - shared domain library.
//!
//! Used by both client surfaces:
//! - `storefront` - product listing, cart and customer sign-in
//! - `admin` - order workflow, catalogue, staff and analytics console
//!
//! # Architecture
//!
//! Everything except [`http`] is pure: value types, backend records, the cart
//! engine and the sales folds never touch the network. The key-value store
//! does file I/O only. The REST transport sits behind the `http` feature so
//! the domain types stay usable without an HTTP stack.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, weights and statuses
//! - [`models`] - Orders, products, customers, staff, locations and logs
//! - [`cart`] - Cart lines and the add/change/remove rules
//! - [`sales`] - Sales rollups and dashboard counters
//! - [`store`] - Key-value persistence for cart and session slots
//! - [`http`] - JSON REST transport (feature `http`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
#[cfg(feature = "http")]
pub mod http;
pub mod models;
pub mod sales;
pub mod store;
pub mod types;

pub use cart::{CART_SLOT, Cart, CartLine, CartProduct, QuantityChange};
pub use models::*;
pub use sales::{LocationRollup, OrderStats, ProductRollup, SalesReport};
pub use store::{FileStore, KeyValueStore, MemoryStore, SharedStore, StoreError};
pub use types::*;
