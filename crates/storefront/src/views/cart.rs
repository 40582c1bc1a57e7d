//! Cart panel.

use chickyen_core::{Cart, CartLine, Price};

/// Placeholder text for an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Your jar is empty...";

/// One line of the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub weight: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            weight: line.weight.clone(),
            quantity: line.quantity,
            line_total: line.line_total().display(),
        }
    }
}

/// The slide-out cart: lines, totals and the checkout button state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanelView {
    pub lines: Vec<CartLineView>,
    pub total: Price,
    pub total_display: String,
    pub count: u64,
    pub checkout_enabled: bool,
    pub empty_message: Option<&'static str>,
}

impl From<&Cart> for CartPanelView {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total,
            total_display: total.display(),
            count: cart.count(),
            checkout_enabled: !cart.is_empty(),
            empty_message: cart.is_empty().then_some(EMPTY_CART_MESSAGE),
        }
    }
}

#[must_use]
pub fn render_cart_panel(cart: &Cart) -> CartPanelView {
    CartPanelView::from(cart)
}
