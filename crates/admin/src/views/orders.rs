//! Orders board.

use chickyen_core::{Order, OrderStats, OrderStatus};
use chrono::{DateTime, TimeZone};

use crate::orders::{Tone, action_label};

/// Pickup label for orders without a pickup point.
pub const UNSPECIFIED_POINT: &str = "Unspecified Point";

/// Which orders the board shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// `None` shows every status.
    pub status: Option<OrderStatus>,
    /// Matched against order number and customer name.
    pub search: String,
}

impl OrderFilter {
    #[must_use]
    pub const fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            search: String::new(),
        }
    }

    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.status.is_none_or(|status| order.status == status) && order.matches_search(&self.search)
    }

    /// Board title for this filter.
    #[must_use]
    pub fn title(&self) -> String {
        self.status.map_or_else(
            || "Order Management".to_string(),
            |status| format!("{status} Orders"),
        )
    }
}

/// A workflow button on an order card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAction {
    pub label: &'static str,
    pub target: OrderStatus,
    pub tone: Tone,
}

/// One order on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCardView {
    pub id: String,
    pub reference: String,
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Processing and out-for-delivery orders get a call button when a phone
    /// number is on file.
    pub can_call: bool,
    pub status: OrderStatus,
    pub tone: Tone,
    /// `Name - weight (xN)` per line.
    pub items: Vec<String>,
    pub pickup: String,
    pub amount: String,
    pub actions: Vec<OrderAction>,
    pub has_invoice: bool,
}

impl From<&Order> for OrderCardView {
    fn from(order: &Order) -> Self {
        let phone = order.contact_phone().map(str::to_string);
        let can_call = phone.is_some()
            && matches!(
                order.status,
                OrderStatus::Processing | OrderStatus::OutForDelivery
            );
        Self {
            id: order.id.to_string(),
            reference: order.reference().to_string(),
            customer_name: order.customer_name.clone(),
            email: order.email.clone(),
            phone,
            can_call,
            status: order.status,
            tone: Tone::for_status(order.status),
            items: order
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{} - {} (x{})",
                        item.name,
                        item.weight.as_deref().unwrap_or_default(),
                        item.quantity
                    )
                })
                .collect(),
            pickup: order.pickup_name().unwrap_or(UNSPECIFIED_POINT).to_string(),
            amount: order.total_amount.display(),
            actions: order
                .status
                .transitions()
                .into_iter()
                .map(|target| OrderAction {
                    label: action_label(target),
                    target,
                    tone: Tone::for_status(target),
                })
                .collect(),
            has_invoice: order.status == OrderStatus::Delivered,
        }
    }
}

/// Dashboard counters above the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub today_revenue: String,
    pub pending: u64,
    pub completed: u64,
    pub total: u64,
    /// One dot per pending order; selecting it filters the board.
    pub pending_dots: Vec<(OrderStatus, Tone)>,
}

impl From<OrderStats> for StatsView {
    fn from(stats: OrderStats) -> Self {
        Self {
            today_revenue: stats.today_revenue.display(),
            pending: stats.pending,
            completed: stats.completed,
            total: stats.total,
            pending_dots: stats
                .pending_dots
                .into_iter()
                .map(|status| (status, Tone::for_status(status)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersBoardView {
    pub title: String,
    /// Counters always cover the whole snapshot, not just the filtered cards.
    pub stats: StatsView,
    pub cards: Vec<OrderCardView>,
}

/// Render the board for `filter` as of `now`.
#[must_use]
pub fn render_orders_board<Tz: TimeZone>(
    orders: &[Order],
    filter: &OrderFilter,
    now: &DateTime<Tz>,
) -> OrdersBoardView {
    OrdersBoardView {
        title: filter.title(),
        stats: OrderStats::from_orders(orders, now).into(),
        cards: orders
            .iter()
            .filter(|order| filter.matches(order))
            .map(OrderCardView::from)
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chickyen_core::{OrderId, OrderItem, PickupRef, Price};
    use chrono::Utc;

    use super::*;

    fn order(id: &str, name: &str, status: OrderStatus, phone: Option<&str>) -> Order {
        Order {
            id: OrderId::new(id),
            order_id: format!("ORD-{id}"),
            customer_id: None,
            customer_name: name.to_string(),
            phone: phone.map(str::to_string),
            email: format!("{}@example.com", name.to_lowercase()),
            status,
            items: vec![OrderItem {
                product_id: None,
                name: "Mango".to_string(),
                price: Price::from_rupees(180),
                quantity: 2,
                weight: Some("250g".to_string()),
                image: None,
            }],
            total_amount: Price::from_rupees(360),
            pickup_location: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_and_title() {
        let orders = vec![
            order("1", "Asha", OrderStatus::Processing, Some("98450")),
            order("2", "Bala", OrderStatus::Delivered, None),
            order("3", "Chitra", OrderStatus::Processing, None),
        ];
        let now = Utc::now();

        let board = render_orders_board(&orders, &OrderFilter::default(), &now);
        assert_eq!(board.title, "Order Management");
        assert_eq!(board.cards.len(), 3);

        let board = render_orders_board(&orders, &OrderFilter::status(OrderStatus::Processing), &now);
        assert_eq!(board.title, "Processing Orders");
        assert_eq!(board.cards.len(), 2);
        assert_eq!(board.stats.pending, 2);
        assert_eq!(board.stats.completed, 1);

        let filter = OrderFilter {
            status: None,
            search: "CHIT".to_string(),
        };
        let board = render_orders_board(&orders, &filter, &now);
        assert_eq!(board.cards.len(), 1);
        assert_eq!(board.cards[0].customer_name, "Chitra");
    }

    #[test]
    fn test_card_details() {
        let mut processing = order("1", "Asha", OrderStatus::Processing, Some("98450"));
        processing.pickup_location = Some(PickupRef {
            location_name: Some("Anna Nagar".to_string()),
        });
        let card = OrderCardView::from(&processing);
        assert_eq!(card.reference, "1");
        assert!(card.can_call);
        assert_eq!(card.pickup, "Anna Nagar");
        assert_eq!(card.items, vec!["Mango - 250g (x2)"]);
        assert_eq!(card.amount, "₹360");
        let labels: Vec<_> = card.actions.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Verify", "Cancel"]);
        assert!(!card.has_invoice);

        let packed = OrderCardView::from(&order("2", "Bala", OrderStatus::Packed, Some("1")));
        assert!(!packed.can_call);
        assert_eq!(packed.pickup, UNSPECIFIED_POINT);
        assert_eq!(packed.actions[0].target, OrderStatus::OutForDelivery);

        let delivered = OrderCardView::from(&order("3", "C", OrderStatus::Delivered, None));
        assert!(delivered.actions.is_empty());
        assert!(delivered.has_invoice);
    }
}
