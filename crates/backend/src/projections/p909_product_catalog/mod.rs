pub mod cache;
pub mod catalog;
pub mod error;
pub mod service;

pub use cache::CatalogSource;
pub use catalog::{ProductCatalog, ProductMeta, CATALOG_COLUMNS};
pub use error::CatalogError;
