//! Backend records and request bodies.
//!
//! Field names follow the backend's camelCase JSON; document ids arrive as
//! `_id`.

pub mod activity;
pub mod catalog;
pub mod order;
pub mod people;

pub use activity::{ActivityKind, ActivityLog};
pub use catalog::{
    ADMIN_STOCK_HIGHLIGHT, LOW_STOCK_THRESHOLD, LocationInput, PickupLocation, Product,
    ProductInput,
};
pub use order::{Order, OrderItem, PickupRef, StatusUpdate};
pub use people::{Customer, CustomerDetails, StaffAccount, StaffInput, StaffUser};
