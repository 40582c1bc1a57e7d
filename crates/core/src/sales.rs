//! Sales analytics and dashboard counters folded from an order snapshot.
//!
//! Both folds are pure. Dates are compared in the time zone of the `now`
//! argument so callers decide what "today" means.

use chrono::{DateTime, Datelike, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Order, OrderItem};
use crate::types::{OrderStatus, Price, grams_prefix};

/// Location label for delivered orders without a pickup point.
pub const DEFAULT_LOCATION: &str = "Standard Delivery";

/// Weight label recorded for items that carry none.
pub const MISSING_WEIGHT: &str = "0g";

/// Per-product totals over delivered orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRollup {
    /// Product id, or the item name when the line has no id.
    pub key: String,
    pub name: String,
    pub image: Option<String>,
    pub revenue: Price,
    pub total_quantity: u64,
    /// Weight label of the first line seen for this product.
    pub unit_weight: String,
}

impl ProductRollup {
    /// Unit weight for display; `None` when the product had no weight.
    #[must_use]
    pub fn unit_weight_label(&self) -> Option<&str> {
        (self.unit_weight != MISSING_WEIGHT).then_some(self.unit_weight.as_str())
    }

    /// Total mass sold in kilograms, rounded to two places.
    #[must_use]
    pub fn total_mass_kg(&self) -> Decimal {
        let grams = Decimal::from(grams_prefix(&self.unit_weight))
            .saturating_mul(Decimal::from(self.total_quantity));
        grams_to_kg(grams)
    }

    fn new(key: &str, item: &OrderItem) -> Self {
        Self {
            key: key.to_owned(),
            name: item.name.clone(),
            image: item.image.clone(),
            revenue: Price::ZERO,
            total_quantity: 0,
            unit_weight: weight_label(item).to_owned(),
        }
    }
}

/// Per-pickup-point totals over delivered orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRollup {
    pub name: String,
    pub count: u64,
    pub revenue: Price,
}

/// Sales summary for the analytics screen.
///
/// Revenue figures count `Delivered` orders only. `products` is sorted by
/// quantity sold and `locations` by order count, both descending; ties keep
/// the order in which the key first appeared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesReport {
    pub today_revenue: Price,
    pub month_revenue: Price,
    pub total_revenue: Price,
    pub completed_orders: u64,
    pub total_items: u64,
    pub total_weight_grams: i64,
    pub products: Vec<ProductRollup>,
    pub locations: Vec<LocationRollup>,
}

impl SalesReport {
    /// Fold `orders` into a report as of `now`.
    #[must_use]
    pub fn from_orders<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let mut report = Self::default();

        for order in orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
        {
            let placed = order.placed_on(&tz);
            report.completed_orders += 1;
            report.total_revenue += order.total_amount;
            if placed == today {
                report.today_revenue += order.total_amount;
            }
            if placed.year() == today.year() && placed.month() == today.month() {
                report.month_revenue += order.total_amount;
            }

            report.record_location(order);
            for item in &order.items {
                report.record_item(item);
            }
        }

        // `sort_by` is stable, so equal keys keep first-seen order.
        report
            .products
            .sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
        report.locations.sort_by(|a, b| b.count.cmp(&a.count));
        report
    }

    /// Total mass sold in kilograms, rounded to two places.
    #[must_use]
    pub fn total_weight_kg(&self) -> Decimal {
        grams_to_kg(Decimal::from(self.total_weight_grams))
    }

    /// The best-selling product, if anything was delivered.
    #[must_use]
    pub fn most_sold(&self) -> Option<&ProductRollup> {
        self.products.first()
    }

    fn record_location(&mut self, order: &Order) {
        let name = order.pickup_name().unwrap_or(DEFAULT_LOCATION);
        let rollup = match self.locations.iter().position(|l| l.name == name) {
            Some(index) => self.locations.get_mut(index),
            None => {
                self.locations.push(LocationRollup {
                    name: name.to_owned(),
                    count: 0,
                    revenue: Price::ZERO,
                });
                self.locations.last_mut()
            }
        };
        if let Some(rollup) = rollup {
            rollup.count += 1;
            rollup.revenue += order.total_amount;
        }
    }

    fn record_item(&mut self, item: &OrderItem) {
        let quantity = u64::from(item.quantity);
        self.total_items = self.total_items.saturating_add(quantity);
        // Weight labels are free text, so gram totals saturate.
        let grams = grams_prefix(weight_label(item)).saturating_mul(i64::from(item.quantity));
        self.total_weight_grams = self.total_weight_grams.saturating_add(grams);

        let key = item.rollup_key();
        let rollup = match self.products.iter().position(|p| p.key == key) {
            Some(index) => self.products.get_mut(index),
            None => {
                self.products.push(ProductRollup::new(key, item));
                self.products.last_mut()
            }
        };
        if let Some(rollup) = rollup {
            rollup.total_quantity = rollup.total_quantity.saturating_add(quantity);
            rollup.revenue += item.line_total();
        }
    }
}

/// Dashboard counters shown above the orders board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderStats {
    /// Revenue-eligible orders placed today.
    pub today_revenue: Price,
    /// Orders still moving through the workflow.
    pub pending: u64,
    /// Delivered orders.
    pub completed: u64,
    /// Revenue-eligible orders.
    pub total: u64,
    /// One entry per pending order, in snapshot order; each links to that
    /// status's filtered board.
    pub pending_dots: Vec<OrderStatus>,
}

impl OrderStats {
    #[must_use]
    pub fn from_orders<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        orders.iter().fold(Self::default(), |mut stats, order| {
            let eligible = order.status.is_revenue_eligible();
            if order.status.is_pending() {
                stats.pending += 1;
                stats.pending_dots.push(order.status);
            }
            if eligible && order.placed_on(&tz) == today {
                stats.today_revenue += order.total_amount;
            }
            if order.status == OrderStatus::Delivered {
                stats.completed += 1;
            }
            if eligible {
                stats.total += 1;
            }
            stats
        })
    }
}

fn weight_label(item: &OrderItem) -> &str {
    item.weight
        .as_deref()
        .filter(|w| !w.is_empty())
        .unwrap_or(MISSING_WEIGHT)
}

fn grams_to_kg(grams: Decimal) -> Decimal {
    (grams / Decimal::ONE_THOUSAND).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
