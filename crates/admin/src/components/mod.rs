//! Reusable console components.

pub mod data_table;

pub use data_table::{Align, DataTableConfig, FilterOption, TableColumn};
