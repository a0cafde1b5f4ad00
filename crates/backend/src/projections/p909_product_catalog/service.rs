use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::cache::CatalogSource;
use super::catalog::ProductCatalog;
use super::error::CatalogError;
use crate::shared::config::CatalogConfig;

/// Catalog loaded at most once and shared afterwards.
///
/// A failed load is not remembered, the next call tries again.
#[derive(Default)]
pub struct CatalogCell {
    cell: OnceCell<Arc<ProductCatalog>>,
}

impl CatalogCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub async fn get_or_load(&self, source: &CatalogSource) -> Result<Arc<ProductCatalog>, CatalogError> {
        if let Some(catalog) = self.cell.get() {
            return Ok(catalog.clone());
        }

        let source = source.clone();
        let catalog = tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|e| CatalogError::Task(e.to_string()))??;

        // Another request may have finished first; keep whichever was stored
        let catalog = self.cell.get_or_init(|| Arc::new(catalog));
        Ok(catalog.clone())
    }
}

static CATALOG: CatalogCell = CatalogCell::new();

/// Process-wide catalog for the configured paths
pub async fn get_catalog(config: &CatalogConfig) -> Result<Arc<ProductCatalog>, CatalogError> {
    CATALOG.get_or_load(&CatalogSource::from_config(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_catalog_is_loaded_once() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("products.csv");
        std::fs::write(&legacy, "barcode,brand\n111,Koton\n").unwrap();
        let source = CatalogSource::new(dir.path().join("products.parquet"), &legacy);

        let cell = CatalogCell::new();
        let first = cell.get_or_load(&source).await.unwrap();

        // sources gone: the stored catalog is still served
        std::fs::remove_file(&legacy).unwrap();
        std::fs::remove_file(dir.path().join("products.parquet")).unwrap();
        let second = cell.get_or_load(&source).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get("111").unwrap().brand.as_deref(), Some("Koton"));
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("products.csv");
        let source = CatalogSource::new(dir.path().join("products.parquet"), &legacy);

        let cell = CatalogCell::new();
        assert!(matches!(
            cell.get_or_load(&source).await,
            Err(CatalogError::Missing { .. })
        ));

        std::fs::write(&legacy, "barcode\n222\n").unwrap();
        let catalog = cell.get_or_load(&source).await.unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
