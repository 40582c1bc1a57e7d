//! Customer community screen.
//!
//! Order counts and lifetime spend come from the cached order snapshot,
//! matched on `customerId`. Filters narrow the list and set the member count
//! in the description; the search box then hides non-matching cards without
//! changing that count.

use core::fmt;
use core::str::FromStr;

use chickyen_core::{Customer, Order, Price};

/// Number of customers shown by the top-spenders filter.
pub const TOP_SPENDERS: usize = 10;

/// Customer list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CustomerFilter {
    #[default]
    All,
    /// Ten highest lifetime spends.
    Top,
    /// More than one order.
    Repeat,
    /// Exactly one order.
    OneTime,
}

impl CustomerFilter {
    pub const ALL: [Self; 4] = [Self::All, Self::Top, Self::Repeat, Self::OneTime];

    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Top => "top",
            Self::Repeat => "repeat",
            Self::OneTime => "onetime",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Members",
            Self::Top => "Top Spenders",
            Self::Repeat => "Repeat Buyers",
            Self::OneTime => "One-Time",
        }
    }

    fn apply(self, mut insights: Vec<CustomerInsight>) -> Vec<CustomerInsight> {
        match self {
            Self::All => insights,
            Self::Top => {
                // Stable, so equal spends keep list order.
                insights.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
                insights.truncate(TOP_SPENDERS);
                insights
            }
            Self::Repeat => {
                insights.retain(|c| c.order_count > 1);
                insights
            }
            Self::OneTime => {
                insights.retain(|c| c.order_count == 1);
                insights
            }
        }
    }
}

impl fmt::Display for CustomerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for CustomerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|f| f.value() == normalized)
            .ok_or_else(|| format!("invalid customer filter: {s}"))
    }
}

/// A customer with their order history folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInsight {
    pub customer: Customer,
    pub order_count: usize,
    pub total_spent: Price,
}

impl CustomerInsight {
    /// Fold every order placed by `customer`.
    #[must_use]
    pub fn new(customer: Customer, orders: &[Order]) -> Self {
        let (order_count, total_spent) = orders
            .iter()
            .filter(|o| o.customer_id.as_ref() == Some(&customer.id))
            .fold((0, Price::ZERO), |(count, spent), o| {
                (count + 1, spent + o.total_amount)
            });
        Self {
            customer,
            order_count,
            total_spent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerCard {
    pub id: String,
    pub initial: char,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// `"N Orders"`.
    pub orders_label: String,
    pub lifetime_spend: String,
}

impl From<&CustomerInsight> for CustomerCard {
    fn from(insight: &CustomerInsight) -> Self {
        let name = insight
            .customer
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        Self {
            id: insight.customer.id.to_string(),
            initial: name
                .and_then(|n| n.chars().next())
                .map_or('U', |c| c.to_uppercase().next().unwrap_or(c)),
            name: name.unwrap_or("Anonymous").to_string(),
            email: insight.customer.email.clone(),
            phone: insight
                .customer
                .phone
                .clone()
                .filter(|p| !p.trim().is_empty()),
            orders_label: format!("{} Orders", insight.order_count),
            lifetime_spend: insight.total_spent.display(),
        }
    }
}

impl CustomerCard {
    fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomersView {
    pub title: &'static str,
    pub description: String,
    pub filter: CustomerFilter,
    pub cards: Vec<CustomerCard>,
}

/// Render the customer screen.
#[must_use]
pub fn render_customers(
    customers: Vec<Customer>,
    orders: &[Order],
    filter: CustomerFilter,
    search: &str,
) -> CustomersView {
    let insights = filter.apply(
        customers
            .into_iter()
            .map(|c| CustomerInsight::new(c, orders))
            .collect(),
    );
    CustomersView {
        title: "Customer Community",
        description: format!("Managing {} registered members.", insights.len()),
        filter,
        cards: insights
            .iter()
            .map(CustomerCard::from)
            .filter(|card| card.matches_search(search))
            .collect(),
    }
}
