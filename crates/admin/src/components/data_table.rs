//! Data table component types.
//!
//! Column and filter definitions for the console's tabular screens. Front
//! ends read headers, alignment and filter choices from here so the labels
//! live in one place.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    pub align: Align,
}

impl TableColumn {
    /// Create a left-aligned column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            align: Align::Left,
        }
    }

    /// Set the column alignment.
    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// One choice of a select filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Select filter choices, in display order.
    pub filters: Vec<FilterOption>,
    /// Search placeholder text; `None` when the table has no search.
    pub search_placeholder: Option<String>,
    /// Title for empty state.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            search_placeholder: None,
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter choice.
    #[must_use]
    pub fn filter(mut self, option: FilterOption) -> Self {
        self.filters.push(option);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = Some(placeholder.to_string());
        self
    }

    /// Set empty state title.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Header labels in column order.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Sales screen: per-product table.
#[must_use]
pub fn sales_products_table() -> DataTableConfig {
    DataTableConfig::new("sales_products")
        .column(TableColumn::new("name", "Product Name"))
        .column(TableColumn::new("unit_weight", "Unit Weight").align(Align::Center))
        .column(TableColumn::new("quantity", "Total Quantity").align(Align::Center))
        .column(TableColumn::new("mass", "Total Mass (kg)").align(Align::Center))
        .column(TableColumn::new("revenue", "Revenue Generated").align(Align::Right))
        .empty_state("No delivered orders yet")
}

/// Sales screen: pickup point performance.
#[must_use]
pub fn sales_locations_table() -> DataTableConfig {
    DataTableConfig::new("sales_locations")
        .column(TableColumn::new("name", "Pickup Point"))
        .column(TableColumn::new("count", "Successful Orders").align(Align::Center))
        .column(TableColumn::new("revenue", "Total Revenue").align(Align::Right))
        .empty_state("No delivered orders yet")
}

/// Customers screen: filter chips and search.
#[must_use]
pub fn customers_table() -> DataTableConfig {
    DataTableConfig::new("customers")
        .column(TableColumn::new("name", "Customer"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::new("orders", "Orders").align(Align::Center))
        .column(TableColumn::new("spent", "Life-time Spend").align(Align::Right))
        .filter(FilterOption::new("all", "All Members"))
        .filter(FilterOption::new("top", "Top Spenders"))
        .filter(FilterOption::new("repeat", "Repeat Buyers"))
        .filter(FilterOption::new("onetime", "One-Time"))
        .search_placeholder("Search by name or email...")
        .empty_state("No customers found")
}

/// Orders board: status filter and search.
#[must_use]
pub fn orders_table() -> DataTableConfig {
    chickyen_core::OrderStatus::ALL.into_iter().fold(
        DataTableConfig::new("orders")
            .column(TableColumn::new("reference", "Order"))
            .column(TableColumn::new("customer", "Customer"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("pickup", "Pickup Point"))
            .column(TableColumn::new("amount", "Amount").align(Align::Right))
            .filter(FilterOption::new("all", "All Orders"))
            .search_placeholder("Search by order id or customer...")
            .empty_state("No orders found"),
        |table, status| table.filter(FilterOption::new(status.label(), status.label())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_headers() {
        assert_eq!(
            sales_products_table().headers(),
            vec![
                "Product Name",
                "Unit Weight",
                "Total Quantity",
                "Total Mass (kg)",
                "Revenue Generated"
            ]
        );
    }

    #[test]
    fn test_customer_filters_in_order() {
        let values: Vec<_> = customers_table()
            .filters
            .iter()
            .map(|f| f.value.clone())
            .collect();
        assert_eq!(values, vec!["all", "top", "repeat", "onetime"]);
    }

    #[test]
    fn test_orders_filter_lists_every_status() {
        let table = orders_table();
        assert_eq!(table.filters.len(), 7);
        assert!(table.filters.iter().any(|f| f.value == "Out for Delivery"));
    }
}
