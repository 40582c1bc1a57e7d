//! Admin console view models.
//!
//! Pure functions from fetched data plus filter state to display-ready
//! structs; the console feeds them and front ends draw them.

pub mod customers;
pub mod locations;
pub mod logs;
pub mod orders;
pub mod products;
pub mod sales;
pub mod staff;

pub use customers::{CustomerCard, CustomerFilter, CustomerInsight, CustomersView, render_customers};
pub use locations::{DELETE_LOCATION_PROMPT, LocationCard, LocationsView, render_locations};
pub use logs::{CLEAR_LOGS_PROMPT, LogEntryView, LogsView, render_logs};
pub use orders::{
    OrderAction, OrderCardView, OrderFilter, OrdersBoardView, StatsView, UNSPECIFIED_POINT,
    render_orders_board,
};
pub use products::{AdminProductCard, DELETE_PRODUCT_PROMPT, ProductsView, render_products};
pub use sales::{LocationSalesRow, ProductSalesRow, SalesView, SummaryCard, render_sales};
pub use staff::{DELETE_STAFF_PROMPT, PROTECTED_BADGE, StaffCard, StaffView, render_staff};
