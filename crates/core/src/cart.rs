//! Shopping cart engine.
//!
//! The cart is an ordered list of lines keyed by product id. It is persisted
//! as a JSON array under [`CART_SLOT`]; callers read the whole list, apply one
//! operation and write the whole list back.

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::{Price, ProductId};

/// Key-value slot holding the persisted cart.
pub const CART_SLOT: &str = "cartItems";

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub weight: String,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// What gets added when a customer taps "add to cart".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub weight: String,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            weight: product.weight.clone(),
        }
    }
}

/// Outcome of [`Cart::change_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line with that id; nothing changed.
    Missing,
    /// The line now has this quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
}

/// The cart lines, in insertion order.
///
/// Invariants: ids are unique and every quantity is at least 1. Deserializing
/// restores both, so a hand-edited or stale store cannot break them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`: bumps the existing line or appends a new
    /// line with quantity 1. Returns the line's quantity afterwards.
    pub fn add_item(&mut self, product: CartProduct) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            weight: product.weight,
            quantity: 1,
        });
        1
    }

    /// Add `delta` to a line's quantity, removing the line when the result
    /// is zero or negative. Unknown ids are ignored.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) -> QuantityChange {
        let Some(index) = self.lines.iter().position(|line| &line.id == id) else {
            return QuantityChange::Missing;
        };
        let current = self.lines.get(index).map_or(0, |line| line.quantity);
        let next = i64::from(current).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
            return QuantityChange::Removed;
        }

        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        QuantityChange::Updated(quantity)
    }

    /// Remove the line with `id`. Returns whether one was present.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Merges duplicate ids into the first occurrence and drops empty lines.
    fn from(raw: Vec<CartLine>) -> Self {
        let mut lines: Vec<CartLine> = Vec::with_capacity(raw.len());
        for line in raw.into_iter().filter(|line| line.quantity > 0) {
            match lines.iter_mut().find(|existing| existing.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }
        Self { lines }
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
