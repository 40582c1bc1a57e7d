//! Menu cards.

use chickyen_core::Product;

/// Stock badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBadge {
    OutOfStock,
    LimitedStock,
}

impl StockBadge {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::LimitedStock => "Limited Stock",
        }
    }

    fn for_product(product: &Product) -> Option<Self> {
        if product.is_out_of_stock() {
            Some(Self::OutOfStock)
        } else if product.is_low_stock() {
            Some(Self::LimitedStock)
        } else {
            None
        }
    }
}

/// One product on the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
    /// Weight label, hidden when the product has none.
    pub weight: Option<String>,
    pub stock_badge: Option<StockBadge>,
    pub spice_count: u32,
    /// Sold-out products render a disabled button.
    pub can_add: bool,
    pub button_label: &'static str,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let can_add = !product.is_out_of_stock();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            description: product.description.clone(),
            image: product.image.clone(),
            weight: Some(product.weight.clone()).filter(|w| !w.is_empty()),
            stock_badge: StockBadge::for_product(product),
            spice_count: product.spice_count(),
            can_add,
            button_label: if can_add { "Add +" } else { "Sold Out" },
        }
    }
}

/// The static teaser card that closes the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComingSoonCard {
    pub title: &'static str,
    pub headline: &'static str,
    pub description: &'static str,
    pub badge: &'static str,
}

impl Default for ComingSoonCard {
    fn default() -> Self {
        Self {
            title: "Custom Taste",
            headline: "Customize Your Own Pickle",
            description: "Choose ingredients, spice level, and oil quantity.",
            badge: "Coming Soon",
        }
    }
}

/// The full menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub cards: Vec<ProductCardView>,
    pub coming_soon: ComingSoonCard,
}

/// Build the menu in backend order, followed by the coming-soon card.
#[must_use]
pub fn render_catalog(products: &[Product]) -> CatalogView {
    CatalogView {
        cards: products.iter().map(ProductCardView::from).collect(),
        coming_soon: ComingSoonCard::default(),
    }
}
