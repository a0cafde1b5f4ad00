use std::path::PathBuf;
use thiserror::Error;

/// Ошибки загрузки справочника товаров
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(
        "Product catalog not found: neither '{}' nor '{}' exists",
        .cache.display(),
        .legacy.display()
    )]
    Missing { cache: PathBuf, legacy: PathBuf },

    #[error("Catalog I/O error at '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported catalog format: '{}'", .0.display())]
    UnsupportedLegacyFormat(PathBuf),

    #[error("Catalog column '{0}' is missing")]
    MissingColumn(String),

    #[error("Catalog loading task failed: {0}")]
    Task(String),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> CatalogError {
        let path = path.into();
        move |source| CatalogError::Io { path, source }
    }
}
