//! Menu management grid.

use chickyen_core::{ADMIN_STOCK_HIGHLIGHT, Product};

pub const DELETE_PRODUCT_PROMPT: &str = "Delete this product permanently?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProductCard {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub stock: i64,
    /// Stock under 15 is shown in red.
    pub stock_highlight: bool,
    pub spice_count: u32,
    pub weight: String,
}

impl From<&Product> for AdminProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            stock: product.stock,
            stock_highlight: product.stock < ADMIN_STOCK_HIGHLIGHT,
            spice_count: product.spice_count(),
            weight: product.weight.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsView {
    pub title: &'static str,
    pub description: &'static str,
    pub heading: &'static str,
    pub cards: Vec<AdminProductCard>,
}

#[must_use]
pub fn render_products(products: &[Product]) -> ProductsView {
    ProductsView {
        title: "Menu Management",
        description: "Manage products, pricing, and stock.",
        heading: "Active Menu Items",
        cards: products.iter().map(AdminProductCard::from).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use chickyen_core::{Price, ProductId};

    use super::*;

    fn product(stock: i64, spice: Option<u32>) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Garlic Pickle".to_string(),
            price: Price::from_rupees(220),
            weight: "500g".to_string(),
            spice_level: spice,
            description: String::new(),
            image: "garlic.jpg".to_string(),
            stock,
        }
    }

    #[test]
    fn test_stock_highlight_threshold() {
        let view = render_products(&[product(14, Some(3)), product(15, None)]);
        assert_eq!(view.title, "Menu Management");
        assert!(view.cards[0].stock_highlight);
        assert_eq!(view.cards[0].spice_count, 3);
        assert!(!view.cards[1].stock_highlight);
        assert_eq!(view.cards[1].spice_count, 1);
        assert_eq!(view.cards[1].price, "₹220");
    }
}
