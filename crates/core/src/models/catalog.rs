//! Products and pickup locations.

use serde::{Deserialize, Serialize};

use crate::types::{LocationId, Price, ProductId};

/// Stock below which the storefront shows a "Limited Stock" badge and the
/// post-verification stock check raises an alert.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Stock below which the admin grid highlights a product.
pub const ADMIN_STOCK_HIGHLIGHT: i64 = 15;

/// A menu product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub spice_level: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: i64,
}

impl Product {
    /// Chilli count shown on cards; unset or zero spice shows one.
    #[must_use]
    pub fn spice_count(&self) -> u32 {
        self.spice_level.filter(|level| *level > 0).unwrap_or(1)
    }

    /// Nothing left to sell.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// In stock but below [`LOW_STOCK_THRESHOLD`].
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
    }
}

/// Body of `POST /products/add` and `PUT /products/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub weight: String,
    pub spice_level: u32,
    pub description: String,
    pub image: String,
    pub stock: i64,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            weight: product.weight.clone(),
            spice_level: product.spice_level.unwrap_or(1),
            description: product.description.clone(),
            image: product.image.clone(),
            stock: product.stock,
        }
    }
}

/// A customer collection centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupLocation {
    #[serde(rename = "_id")]
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub google_maps_link: String,
}

/// Body of `POST /locations/pickup-points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub name: String,
    pub address: String,
    pub google_maps_link: String,
}
