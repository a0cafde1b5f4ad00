//! Product catalog storage.
//!
//! The catalog lives in a Parquet file with the six `CATALOG_COLUMNS`. When the
//! file does not exist yet it is built once from the legacy spreadsheet export
//! (xlsx/xls/xlsm/xlsb/ods or csv).

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use super::catalog::{ProductCatalog, ProductMeta, CATALOG_COLUMNS};
use super::error::CatalogError;
use crate::shared::config::{resolve_path, CatalogConfig};

/// Where the catalog is read from
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub cache_path: PathBuf,
    pub legacy_path: PathBuf,
}

impl CatalogSource {
    pub fn new(cache_path: impl Into<PathBuf>, legacy_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            legacy_path: legacy_path.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            resolve_path(&config.cache_path),
            resolve_path(&config.legacy_path),
        )
    }

    pub fn load(&self) -> Result<ProductCatalog, CatalogError> {
        let rows = self.load_rows()?;
        let catalog = ProductCatalog::from_rows(rows);
        tracing::info!("Product catalog loaded: {} barcodes", catalog.len());
        Ok(catalog)
    }

    /// Rows as stored, duplicates included
    pub fn load_rows(&self) -> Result<Vec<ProductMeta>, CatalogError> {
        if self.cache_path.exists() {
            tracing::info!("Reading product catalog: {}", self.cache_path.display());
            return read_parquet(&self.cache_path);
        }

        if self.legacy_path.exists() {
            tracing::info!(
                "Catalog cache {} not found, converting {}",
                self.cache_path.display(),
                self.legacy_path.display()
            );
            let rows = read_legacy(&self.legacy_path)?;
            write_parquet(&self.cache_path, &rows)?;
            tracing::info!(
                "Catalog cache written: {} rows -> {}",
                rows.len(),
                self.cache_path.display()
            );
            return Ok(rows);
        }

        Err(CatalogError::Missing {
            cache: self.cache_path.clone(),
            legacy: self.legacy_path.clone(),
        })
    }
}

fn catalog_schema() -> SchemaRef {
    Arc::new(Schema::new(
        CATALOG_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, *name != "barcode"))
            .collect::<Vec<_>>(),
    ))
}

fn read_parquet(path: &Path) -> Result<Vec<ProductMeta>, CatalogError> {
    let file = File::open(path).map_err(CatalogError::io(path))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;

        let mut columns = Vec::with_capacity(CATALOG_COLUMNS.len());
        for name in CATALOG_COLUMNS {
            columns.push(string_column(&batch, name)?);
        }
        if columns[0].is_none() {
            return Err(CatalogError::MissingColumn(CATALOG_COLUMNS[0].to_string()));
        }

        for i in 0..batch.num_rows() {
            let values: [Option<String>; 6] = std::array::from_fn(|c| {
                columns[c]
                    .as_ref()
                    .and_then(|column| column.get(i).cloned().flatten())
            });
            if let Some(meta) = ProductMeta::from_values(values) {
                rows.push(meta);
            }
        }
    }

    Ok(rows)
}

/// Column as strings; numbers (barcodes saved as int or float) are normalized
fn string_column(
    batch: &RecordBatch,
    name: &str,
) -> Result<Option<Vec<Option<String>>>, CatalogError> {
    let Some(column) = batch.column_by_name(name) else {
        return Ok(None);
    };

    let column: ArrayRef = match column.data_type() {
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let floats = cast(column, &DataType::Float64)?;
            // Целые значения (штрихкоды, сохранённые как float) без ".0"
            let integral = floats
                .as_primitive::<Float64Type>()
                .iter()
                .flatten()
                .all(|f| f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0);
            if integral {
                cast(&floats, &DataType::Int64)?
            } else {
                floats
            }
        }
        _ => column.clone(),
    };
    let strings = cast(&column, &DataType::Utf8)?;
    let strings = strings.as_string::<i32>();

    Ok(Some(
        (0..strings.len())
            .map(|i| strings.is_valid(i).then(|| strings.value(i).to_string()))
            .collect(),
    ))
}

/// Write through a temporary sibling and rename it into place
fn write_parquet(path: &Path, rows: &[ProductMeta]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(CatalogError::io(parent))?;
    }

    let schema = catalog_schema();
    let columns: Vec<ArrayRef> = (0..CATALOG_COLUMNS.len())
        .map(|c| {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.values()[c].map(str::to_string))
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let tmp_path = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
    let result = (|| -> Result<(), CatalogError> {
        let file = File::create(&tmp_path).map_err(CatalogError::io(&tmp_path))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        std::fs::rename(&tmp_path, path).map_err(CatalogError::io(path))
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

fn read_legacy(path: &Path) -> Result<Vec<ProductMeta>, CatalogError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        _ => Err(CatalogError::UnsupportedLegacyFormat(path.to_path_buf())),
    }
}

/// First sheet, first row is the header
fn read_workbook(path: &Path) -> Result<Vec<ProductMeta>, CatalogError> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(CatalogError::MissingColumn(CATALOG_COLUMNS[0].to_string()));
    };
    let range = workbook.worksheet_range(&sheet)?;

    let mut grid = range.rows();
    let headers: Vec<String> = grid
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    rows_to_products(
        &headers,
        grid.map(|row| row.iter().map(cell_to_string).collect()),
    )
}

fn read_csv(path: &Path) -> Result<Vec<ProductMeta>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(CatalogError::io(path))?;
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record.iter().map(|v| v.to_string()).collect()),
            Err(e) => tracing::warn!("Skipping malformed catalog CSV record: {}", e),
        }
    }

    rows_to_products(&headers, records.into_iter())
}

/// Map header names (case-insensitive) to `CATALOG_COLUMNS`
fn rows_to_products(
    headers: &[String],
    records: impl Iterator<Item = Vec<String>>,
) -> Result<Vec<ProductMeta>, CatalogError> {
    let positions: Vec<Option<usize>> = CATALOG_COLUMNS
        .iter()
        .map(|name| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name)))
        .collect();

    if positions[0].is_none() {
        return Err(CatalogError::MissingColumn(CATALOG_COLUMNS[0].to_string()));
    }
    for (name, position) in CATALOG_COLUMNS.iter().zip(&positions) {
        if position.is_none() {
            tracing::warn!("Catalog column '{}' not found, defaults will be used", name);
        }
    }

    Ok(records
        .filter_map(|record| {
            let values: [Option<String>; 6] = std::array::from_fn(|c| {
                positions[c].and_then(|i| record.get(i).cloned())
            });
            ProductMeta::from_values(values)
        })
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
