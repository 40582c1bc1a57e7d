//! Cart service bound to the key-value store.
//!
//! Every mutation reads the full line list, applies one [`Cart`] operation and
//! writes the list back, then hands the caller a refreshed panel to render.

use chickyen_core::{
    CART_SLOT, Cart, CartProduct, KeyValueStore, Product, ProductId, QuantityChange, SharedStore,
};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::views::{CartPanelView, render_cart_panel};

/// Page the checkout button leads to.
pub const CHECKOUT_PAGE: &str = "checkout.html";

/// Animation cue after an add: the product image flies to the cart icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyToCart {
    pub product: ProductId,
    pub image: String,
}

/// What changed in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// The line now holds this quantity.
    Quantity(u32),
    /// The line left the cart.
    Removed,
    /// Nothing matched; the cart is as it was.
    Unchanged,
    /// Every line was dropped.
    Cleared,
}

/// Result of a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub panel: CartPanelView,
    pub change: CartChange,
    pub cue: Option<FlyToCart>,
}

/// Go-ahead for checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReady {
    pub destination: &'static str,
    pub item_count: u64,
}

/// Cart operations against the persisted `cartItems` slot.
#[derive(Clone)]
pub struct CartService {
    store: SharedStore,
}

impl CartService {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Read the persisted cart; missing or unreadable means empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(&self) -> Result<Cart> {
        Ok(self.store.load_json::<Cart>(CART_SLOT)?.unwrap_or_default())
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        self.store.save_json(CART_SLOT, cart)?;
        Ok(())
    }

    /// Current panel state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn panel(&self) -> Result<CartPanelView> {
        Ok(render_cart_panel(&self.load()?))
    }

    /// Add one unit of a menu product. Sold-out products are refused.
    ///
    /// # Errors
    ///
    /// Returns `OutOfStock` for a product with no stock, or a store error.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&self, product: &Product) -> Result<CartUpdate> {
        if product.is_out_of_stock() {
            return Err(AppError::OutOfStock(product.name.clone()));
        }
        self.add_item(CartProduct::from(product))
    }

    /// Add one unit of an arbitrary line, without a stock check.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: CartProduct) -> Result<CartUpdate> {
        let mut cart = self.load()?;
        let cue = FlyToCart {
            product: product.id.clone(),
            image: product.image.clone(),
        };
        let id = product.id.to_string();
        let quantity = cart.add_item(product);
        self.save(&cart)?;

        add_breadcrumb(
            "cart",
            "Added to cart",
            &[("product_id", &id), ("quantity", &quantity.to_string())],
        );
        tracing::debug!(quantity, "Cart line added");

        Ok(CartUpdate {
            panel: render_cart_panel(&cart),
            change: CartChange::Quantity(quantity),
            cue: Some(cue),
        })
    }

    /// Step a line's quantity by `delta`, removing it at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn change_quantity(&self, id: &ProductId, delta: i64) -> Result<CartUpdate> {
        let mut cart = self.load()?;
        let change = match cart.change_quantity(id, delta) {
            QuantityChange::Missing => CartChange::Unchanged,
            QuantityChange::Updated(quantity) => CartChange::Quantity(quantity),
            QuantityChange::Removed => CartChange::Removed,
        };
        if change != CartChange::Unchanged {
            self.save(&cart)?;
            add_breadcrumb(
                "cart",
                "Changed quantity",
                &[("product_id", id.as_str()), ("delta", &delta.to_string())],
            );
        }

        Ok(CartUpdate {
            panel: render_cart_panel(&cart),
            change,
            cue: None,
        })
    }

    /// Drop a line regardless of quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_item(&self, id: &ProductId) -> Result<CartUpdate> {
        let mut cart = self.load()?;
        let change = if cart.remove_item(id) {
            self.save(&cart)?;
            add_breadcrumb("cart", "Removed from cart", &[("product_id", id.as_str())]);
            CartChange::Removed
        } else {
            CartChange::Unchanged
        };

        Ok(CartUpdate {
            panel: render_cart_panel(&cart),
            change,
            cue: None,
        })
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<CartUpdate> {
        self.store.remove(CART_SLOT)?;
        add_breadcrumb("cart", "Cleared cart", &[]);

        Ok(CartUpdate {
            panel: render_cart_panel(&Cart::new()),
            change: CartChange::Cleared,
            cue: None,
        })
    }

    /// Proceed to checkout when the cart has something in it.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` when there is nothing to check out.
    pub fn checkout(&self) -> Result<CheckoutReady> {
        let cart = self.load()?;
        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }
        Ok(CheckoutReady {
            destination: CHECKOUT_PAGE,
            item_count: cart.count(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chickyen_core::{MemoryStore, Price};

    use super::*;

    fn service() -> (CartService, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        (CartService::new(store.clone()), store)
    }

    fn product(id: &str, stock: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Pickle {id}"),
            price: Price::from_rupees(150),
            weight: "250g".to_string(),
            spice_level: Some(2),
            description: String::new(),
            image: format!("{id}.jpg"),
            stock,
        }
    }

    #[test]
    fn test_add_persists_and_cues() {
        let (cart, store) = service();
        let update = cart.add(&product("p1", 5)).unwrap();
        assert_eq!(update.change, CartChange::Quantity(1));
        assert_eq!(
            update.cue,
            Some(FlyToCart {
                product: ProductId::new("p1"),
                image: "p1.jpg".to_string(),
            })
        );

        let update = cart.add(&product("p1", 5)).unwrap();
        assert_eq!(update.change, CartChange::Quantity(2));
        assert_eq!(update.panel.total, Price::from_rupees(300));

        let raw = store.get(CART_SLOT).unwrap().unwrap();
        assert!(raw.contains("\"quantity\":2"));
    }

    #[test]
    fn test_sold_out_refused() {
        let (cart, store) = service();
        let err = cart.add(&product("p1", 0)).unwrap_err();
        assert!(matches!(err, AppError::OutOfStock(ref name) if name == "Pickle p1"));
        assert!(store.get(CART_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_quantity_steps_down_to_removal() {
        let (cart, _) = service();
        cart.add(&product("p1", 5)).unwrap();
        cart.add(&product("p1", 5)).unwrap();

        let update = cart.change_quantity(&ProductId::new("p1"), -1).unwrap();
        assert_eq!(update.change, CartChange::Quantity(1));
        let update = cart.change_quantity(&ProductId::new("p1"), -1).unwrap();
        assert_eq!(update.change, CartChange::Removed);
        assert!(update.panel.lines.is_empty());

        let update = cart.change_quantity(&ProductId::new("p1"), 1).unwrap();
        assert_eq!(update.change, CartChange::Unchanged);
    }

    #[test]
    fn test_remove_and_clear() {
        let (cart, _) = service();
        cart.add(&product("p1", 5)).unwrap();
        cart.add(&product("p2", 5)).unwrap();

        let update = cart.remove_item(&ProductId::new("p1")).unwrap();
        assert_eq!(update.change, CartChange::Removed);
        assert_eq!(update.panel.count, 1);
        assert_eq!(
            cart.remove_item(&ProductId::new("p1")).unwrap().change,
            CartChange::Unchanged
        );

        let update = cart.clear().unwrap();
        assert_eq!(update.change, CartChange::Cleared);
        assert!(cart.load().unwrap().is_empty());
    }

    #[test]
    fn test_checkout_needs_items() {
        let (cart, _) = service();
        assert!(matches!(cart.checkout(), Err(AppError::EmptyCart)));

        cart.add(&product("p1", 5)).unwrap();
        let ready = cart.checkout().unwrap();
        assert_eq!(ready.destination, CHECKOUT_PAGE);
        assert_eq!(ready.item_count, 1);
    }

    #[test]
    fn test_corrupt_slot_reads_as_empty() {
        let (cart, store) = service();
        store.set(CART_SLOT, "{not json").unwrap();
        assert!(cart.load().unwrap().is_empty());
    }
}
