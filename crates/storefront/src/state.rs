//! Storefront state shared by every front-end command.

use std::sync::Arc;

use chickyen_core::{FileStore, Product, ProductId, SharedStore};
use tracing::instrument;

use crate::api::StorefrontClient;
use crate::cart::{CartService, CartUpdate};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::session::CustomerSession;
use crate::views::{CatalogView, render_catalog};

/// The storefront: menu, cart and customer session over one store.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    client: StorefrontClient,
    cart: CartService,
    session: CustomerSession,
}

impl Storefront {
    /// Build the storefront over the configured state file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let store: SharedStore = Arc::new(FileStore::new(config.state_file.clone()));
        let client = StorefrontClient::new(&config)?;
        Ok(Self::with_parts(config, store, client))
    }

    /// Build the storefront over an explicit store and client.
    #[must_use]
    pub fn with_parts(config: StorefrontConfig, store: SharedStore, client: StorefrontClient) -> Self {
        Self {
            inner: Arc::new(StorefrontInner {
                cart: CartService::new(store.clone()),
                session: CustomerSession::new(store, client.clone()),
                client,
                config,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &StorefrontClient {
        &self.inner.client
    }

    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    #[must_use]
    pub fn session(&self) -> &CustomerSession {
        &self.inner.session
    }

    /// Fetch and render the menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    #[instrument(skip(self))]
    pub async fn catalog(&self) -> Result<CatalogView> {
        let products = self.inner.client.public_products().await?;
        tracing::debug!(count = products.len(), "Menu loaded");
        Ok(render_catalog(&products))
    }

    /// Look a product up on the public menu.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is not on the menu.
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        self.inner
            .client
            .public_products()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
    }

    /// Add a menu product to the cart by id, refusing sold-out items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `OutOfStock`, or a fetch/store error.
    pub async fn add_to_cart(&self, id: &ProductId) -> Result<CartUpdate> {
        let product = self.product(id).await?;
        self.inner.cart.add(&product)
    }
}
