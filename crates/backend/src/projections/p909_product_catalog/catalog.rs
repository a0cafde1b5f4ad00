use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Column names of the catalog table, key first
pub const CATALOG_COLUMNS: [&str; 6] = [
    "barcode",
    "productMainId",
    "image",
    "productUrl",
    "brand",
    "categoryName",
];

/// Карточка товара из справочника (ключ - штрихкод)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductMeta {
    pub barcode: String,
    pub product_main_id: Option<String>,
    pub image: Option<String>,
    pub product_url: Option<String>,
    pub brand: Option<String>,
    pub category_name: Option<String>,
}

impl ProductMeta {
    /// Build from column values ordered as `CATALOG_COLUMNS`; `None` without a barcode
    pub fn from_values(values: [Option<String>; 6]) -> Option<Self> {
        let [barcode, product_main_id, image, product_url, brand, category_name] =
            values.map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()));

        Some(Self {
            barcode: barcode?,
            product_main_id,
            image,
            product_url,
            brand,
            category_name,
        })
    }

    /// Values ordered as `CATALOG_COLUMNS`
    pub fn values(&self) -> [Option<&str>; 6] {
        [
            Some(self.barcode.as_str()),
            self.product_main_id.as_deref(),
            self.image.as_deref(),
            self.product_url.as_deref(),
            self.brand.as_deref(),
            self.category_name.as_deref(),
        ]
    }
}

/// Read-only lookup by barcode
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    by_barcode: HashMap<String, ProductMeta>,
}

impl ProductCatalog {
    /// Index rows by barcode. The first row of a barcode wins, later ones are ignored.
    pub fn from_rows(rows: Vec<ProductMeta>) -> Self {
        let mut by_barcode = HashMap::with_capacity(rows.len());
        let mut duplicates = 0usize;

        for row in rows {
            match by_barcode.entry(row.barcode.clone()) {
                Entry::Occupied(_) => {
                    duplicates += 1;
                    tracing::debug!("Duplicate catalog barcode ignored: {}", row.barcode);
                }
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }
        }

        if duplicates > 0 {
            tracing::warn!(
                "Product catalog: {} duplicate barcode rows ignored, first row kept",
                duplicates
            );
        }

        Self { by_barcode }
    }

    pub fn get(&self, barcode: &str) -> Option<&ProductMeta> {
        self.by_barcode.get(barcode)
    }

    pub fn len(&self) -> usize {
        self.by_barcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_barcode.is_empty()
    }
}
