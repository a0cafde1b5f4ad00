use chrono::NaiveDate;
use thiserror::Error;

use crate::projections::p909_product_catalog::CatalogError;
use crate::usecases::u508_fetch_from_trendyol::FetchError;

/// Ошибки построения дашборда продаж
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid date range: date_from {from} is after date_to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),
}
