use super::flattener::FlatRecord;
use crate::projections::p909_product_catalog::{ProductCatalog, ProductMeta};

pub const DEFAULT_PRODUCT_MAIN_ID: &str = "UNKNOWN";
pub const DEFAULT_IMAGE: &str = "https://via.placeholder.com/150";
pub const DEFAULT_PRODUCT_URL: &str = "#";
pub const DEFAULT_BRAND: &str = "-";
pub const DEFAULT_CATEGORY_NAME: &str = "-";

/// Группировочный ключ товара
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductKey {
    pub product_main_id: String,
    pub image: String,
    pub product_url: String,
    pub brand: String,
    pub category_name: String,
}

impl ProductKey {
    /// Catalog fields with defaults for an unknown barcode or an empty field
    pub fn from_meta(meta: Option<&ProductMeta>) -> Self {
        fn field(value: Option<&String>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            product_main_id: field(
                meta.and_then(|m| m.product_main_id.as_ref()),
                DEFAULT_PRODUCT_MAIN_ID,
            ),
            image: field(meta.and_then(|m| m.image.as_ref()), DEFAULT_IMAGE),
            product_url: field(
                meta.and_then(|m| m.product_url.as_ref()),
                DEFAULT_PRODUCT_URL,
            ),
            brand: field(meta.and_then(|m| m.brand.as_ref()), DEFAULT_BRAND),
            category_name: field(
                meta.and_then(|m| m.category_name.as_ref()),
                DEFAULT_CATEGORY_NAME,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: FlatRecord,
    pub product: ProductKey,
}

/// Left join on the exact barcode; output order follows `records`
pub fn join_catalog(records: &[FlatRecord], catalog: &ProductCatalog) -> Vec<EnrichedRecord> {
    let mut unmatched = 0usize;

    let enriched: Vec<EnrichedRecord> = records
        .iter()
        .map(|record| {
            let meta = catalog.get(&record.barcode);
            if meta.is_none() {
                unmatched += 1;
            }
            EnrichedRecord {
                record: record.clone(),
                product: ProductKey::from_meta(meta),
            }
        })
        .collect();

    if unmatched > 0 {
        tracing::info!(
            "{} of {} records have no catalog entry",
            unmatched,
            enriched.len()
        );
    }

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Istanbul;

    fn record(barcode: &str) -> FlatRecord {
        FlatRecord {
            created_date: Istanbul.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap(),
            barcode: barcode.to_string(),
            quantity: 1,
            price: 10.0,
            revenue: 10.0,
        }
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::from_rows(vec![
            ProductMeta {
                barcode: "A".to_string(),
                product_main_id: Some("PM-A".to_string()),
                image: Some("https://cdn/a.jpg".to_string()),
                product_url: Some("https://ty/a".to_string()),
                brand: Some("Koton".to_string()),
                category_name: Some("Elbise".to_string()),
            },
            ProductMeta {
                barcode: "B".to_string(),
                product_main_id: Some("PM-B".to_string()),
                brand: Some(String::new()),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_matched_barcode_takes_catalog_fields() {
        let enriched = join_catalog(&[record("A")], &catalog());
        assert_eq!(enriched[0].product.product_main_id, "PM-A");
        assert_eq!(enriched[0].product.brand, "Koton");
        assert_eq!(enriched[0].record, record("A"));
    }

    #[test]
    fn test_unmatched_barcode_gets_all_defaults() {
        let enriched = join_catalog(&[record("Z")], &catalog());
        assert_eq!(
            enriched[0].product,
            ProductKey {
                product_main_id: "UNKNOWN".to_string(),
                image: "https://via.placeholder.com/150".to_string(),
                product_url: "#".to_string(),
                brand: "-".to_string(),
                category_name: "-".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_fields_of_matched_row_get_defaults() {
        let enriched = join_catalog(&[record("B")], &catalog());
        let product = &enriched[0].product;
        assert_eq!(product.product_main_id, "PM-B");
        assert_eq!(product.image, DEFAULT_IMAGE);
        assert_eq!(product.brand, DEFAULT_BRAND);
    }

    #[test]
    fn test_join_is_pure_and_keeps_order() {
        let records = vec![record("Z"), record("A"), record("B"), record("A")];
        let catalog = catalog();

        let first = join_catalog(&records, &catalog);
        let second = join_catalog(&records, &catalog);

        assert_eq!(first, second);
        assert_eq!(first.len(), records.len());
        let barcodes: Vec<_> = first.iter().map(|e| e.record.barcode.as_str()).collect();
        assert_eq!(barcodes, vec!["Z", "A", "B", "A"]);
        assert_eq!(catalog.len(), 2);
    }
}
