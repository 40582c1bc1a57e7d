//! Orders as served by `GET /orders/all`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, OrderId, OrderStatus, Price, ProductId};

/// A customer order. Owned by the backend; the client only reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id, used in status and invoice URLs.
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Human-facing order number, e.g. `ORD-48213`.
    pub order_id: String,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    #[serde(default)]
    pub pickup_location: Option<PickupRef>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Short reference shown on order cards: the segment after the first `-`
    /// of the order number, or the whole number when it has no dash.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.order_id
            .split('-')
            .nth(1)
            .unwrap_or(self.order_id.as_str())
    }

    /// Customer phone, ignoring blanks.
    #[must_use]
    pub fn contact_phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Pickup point name, ignoring blanks.
    #[must_use]
    pub fn pickup_name(&self) -> Option<&str> {
        self.pickup_location
            .as_ref()
            .and_then(|p| p.location_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Calendar day the order was placed, in the given time zone.
    #[must_use]
    pub fn placed_on<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.created_at.with_timezone(tz).date_naive()
    }

    /// Whether the order number or customer name contains `term`
    /// (case-insensitive). An empty term matches everything.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.order_id.to_lowercase().contains(&term)
            || self.customer_name.to_lowercase().contains(&term)
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl OrderItem {
    /// Grouping key for rollups: the product id, or the name for lines that
    /// predate product ids.
    #[must_use]
    pub fn rollup_key(&self) -> &str {
        self.product_id
            .as_ref()
            .map(ProductId::as_str)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.name.as_str())
    }

    /// Line total (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Pickup point reference embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PickupRef {
    #[serde(default)]
    pub location_name: Option<String>,
}

/// Body of `PUT /orders/status/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ORDER_JSON: &str = r#"{
        "_id": "66a1",
        "orderId": "ORD-1042",
        "customerId": "c1",
        "customerName": "Asha Rao",
        "phone": "9876543210",
        "email": "asha@example.com",
        "status": "Out for Delivery",
        "items": [
            {"productId": "p1", "name": "Mango Pickle", "price": 180, "quantity": 2, "weight": "250g", "image": "mango.jpg"},
            {"name": "Lime Pickle", "price": 150, "quantity": 1}
        ],
        "totalAmount": 510,
        "pickupLocation": {"locationName": "Gachibowli"},
        "createdAt": "2024-05-04T10:30:00.000Z"
    }"#;

    #[test]
    fn test_parses_backend_order() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert_eq!(order.status, OrderStatus::OutForDelivery);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_amount, Price::from_rupees(510));
        assert_eq!(order.pickup_name(), Some("Gachibowli"));
    }

    #[test]
    fn test_reference_and_rollup_key() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert_eq!(order.reference(), "1042");
        assert_eq!(order.items[0].rollup_key(), "p1");
        assert_eq!(order.items[1].rollup_key(), "Lime Pickle");
        assert_eq!(order.items[0].line_total(), Price::from_rupees(360));
    }

    #[test]
    fn test_reference_without_dash() {
        let mut order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        order.order_id = "1042".to_owned();
        assert_eq!(order.reference(), "1042");
    }

    #[test]
    fn test_search_matches_number_or_name() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert!(order.matches_search("ord-10"));
        assert!(order.matches_search("ASHA"));
        assert!(order.matches_search(""));
        assert!(!order.matches_search("ravi"));
    }

    #[test]
    fn test_blank_pickup_and_phone_are_absent() {
        let mut order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        order.pickup_location = Some(PickupRef {
            location_name: Some(String::new()),
        });
        order.phone = Some("  ".to_owned());
        assert_eq!(order.pickup_name(), None);
        assert_eq!(order.contact_phone(), None);
    }
}
