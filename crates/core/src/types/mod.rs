//! Core value types for Chickyen.
//!
//! Type-safe wrappers for ids, money, weights, emails and statuses.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod weight;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
pub use weight::grams_prefix;
