//! Dashboard module
//!
//! Provides a yearly overview page with monthly income, expense and savings
//! totals, a category breakdown and charts of both.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
