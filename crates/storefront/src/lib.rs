//! Chickyen storefront.
//!
//! Public menu, a cart persisted in the local key-value store, and customer
//! login, two-step signup and logout against the backend API. Everything a
//! front end shows comes out of the pure renderers in [`views`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod views;

pub use api::{CustomerLogin, StorefrontClient};
pub use cart::{CartChange, CartService, CartUpdate, CheckoutReady, FlyToCart};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{AppError, Result};
pub use session::{CustomerSession, PendingSignup, SignedIn};
pub use state::Storefront;
