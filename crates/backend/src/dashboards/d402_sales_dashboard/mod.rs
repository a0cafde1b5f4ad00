pub mod aggregator;
pub mod catalog_joiner;
pub mod error;
pub mod flattener;
pub mod service;
pub mod window_filter;

pub use error::DashboardError;
