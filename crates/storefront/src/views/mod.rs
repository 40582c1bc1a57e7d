//! Storefront view models.
//!
//! Each `render_*` function is pure: data in, display-ready structs out.
//! Front ends decide how to draw them.

pub mod cart;
pub mod catalog;
pub mod profile;

pub use cart::{CartLineView, CartPanelView, EMPTY_CART_MESSAGE, render_cart_panel};
pub use catalog::{
    CatalogView, ComingSoonCard, ProductCardView, StockBadge, render_catalog,
};
pub use profile::{ProfileHeaderView, render_profile_header};
