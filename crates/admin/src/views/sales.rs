//! Sales analytics screen.

use chickyen_core::{Order, SalesReport};
use chrono::{DateTime, TimeZone};

use crate::components::data_table::{DataTableConfig, sales_locations_table, sales_products_table};

/// Headline figure on the sales screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
    /// Secondary line, only on the most-sold card.
    pub detail: Option<String>,
}

impl SummaryCard {
    fn new(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            detail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSalesRow {
    pub name: String,
    pub image: Option<String>,
    /// `N/A` for products sold without a weight.
    pub unit_weight: String,
    pub total_quantity: u64,
    /// `"1.25 kg"`.
    pub total_mass: String,
    pub revenue: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSalesRow {
    pub name: String,
    /// `"N Successful Orders"`.
    pub orders_label: String,
    pub revenue: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesView {
    pub cards: Vec<SummaryCard>,
    pub product_table: DataTableConfig,
    pub products: Vec<ProductSalesRow>,
    pub location_heading: &'static str,
    pub location_table: DataTableConfig,
    pub locations: Vec<LocationSalesRow>,
}

/// Render the sales screen from the order snapshot as of `now`.
#[must_use]
pub fn render_sales<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> SalesView {
    let report = SalesReport::from_orders(orders, now);

    let (most_sold, units) = report
        .most_sold()
        .map_or(("N/A".to_string(), 0), |p| (p.name.clone(), p.total_quantity));
    let cards = vec![
        SummaryCard::new("Total Revenue", report.total_revenue.display()),
        SummaryCard::new("Today's Revenue", report.today_revenue.display()),
        SummaryCard::new("Orders Completed", report.completed_orders.to_string()),
        SummaryCard::new("Total Items Sold", report.total_items.to_string()),
        SummaryCard::new("Total Weight Sold", format!("{:.2}kg", report.total_weight_kg())),
        SummaryCard {
            label: "Most Sold",
            value: most_sold,
            detail: Some(format!("{units} Units")),
        },
    ];

    let products = report
        .products
        .iter()
        .map(|p| ProductSalesRow {
            name: p.name.clone(),
            image: p.image.clone(),
            unit_weight: p.unit_weight_label().unwrap_or("N/A").to_string(),
            total_quantity: p.total_quantity,
            total_mass: format!("{:.2} kg", p.total_mass_kg()),
            revenue: p.revenue.display(),
        })
        .collect();

    let locations = report
        .locations
        .iter()
        .map(|l| LocationSalesRow {
            name: l.name.clone(),
            orders_label: format!("{} Successful Orders", l.count),
            revenue: l.revenue.display(),
        })
        .collect();

    SalesView {
        cards,
        product_table: sales_products_table(),
        products,
        location_heading: "Pickup Point Performance",
        location_table: sales_locations_table(),
        locations,
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use chickyen_core::{OrderId, OrderItem, OrderStatus, PickupRef, Price};
    use chrono::Utc;

    use super::*;

    fn delivered(id: &str, items: Vec<OrderItem>, pickup: Option<&str>) -> Order {
        let total = items.iter().map(OrderItem::line_total).sum();
        Order {
            id: OrderId::new(id),
            order_id: format!("ORD-{id}"),
            customer_id: None,
            customer_name: String::new(),
            phone: None,
            email: String::new(),
            status: OrderStatus::Delivered,
            items,
            total_amount: total,
            pickup_location: pickup.map(|name| PickupRef {
                location_name: Some(name.to_string()),
            }),
            created_at: Utc::now(),
        }
    }

    fn item(name: &str, quantity: u32, weight: Option<&str>) -> OrderItem {
        OrderItem {
            product_id: None,
            name: name.to_string(),
            price: Price::from_rupees(100),
            quantity,
            weight: weight.map(str::to_string),
            image: None,
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let view = render_sales(&[], &Utc::now());
        assert_eq!(view.cards[0].value, "₹0");
        assert_eq!(view.cards[4].value, "0.00kg");
        assert_eq!(view.cards[5].value, "N/A");
        assert_eq!(view.cards[5].detail.as_deref(), Some("0 Units"));
        assert!(view.products.is_empty());
    }

    #[test]
    fn test_rows() {
        let orders = vec![
            delivered("1", vec![item("Mango", 3, Some("250g")), item("Chilli", 1, None)], Some("Kondapur")),
            delivered("2", vec![item("Mango", 2, Some("250g"))], None),
        ];
        let view = render_sales(&orders, &Utc::now());

        assert_eq!(view.cards[2].value, "2");
        assert_eq!(view.cards[3].value, "6");
        assert_eq!(view.cards[4].value, "1.25kg");
        assert_eq!(view.cards[5].value, "Mango");
        assert_eq!(view.cards[5].detail.as_deref(), Some("5 Units"));

        assert_eq!(view.products[0].total_mass, "1.25 kg");
        assert_eq!(view.products[0].revenue, "₹500");
        assert_eq!(view.products[1].unit_weight, "N/A");
        assert_eq!(view.products[1].total_mass, "0.00 kg");

        assert_eq!(view.locations.len(), 2);
        assert_eq!(view.locations[0].orders_label, "1 Successful Orders");
        assert_eq!(view.product_table.headers()[3], "Total Mass (kg)");
    }
}
