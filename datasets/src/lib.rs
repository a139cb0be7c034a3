//! `sales-forecast-datasets` reads raw sales records from CSV files.
//!
//! ## The Big Picture
//!
//! The upload boundary of the sales forecasting toolkit is a table with the columns
//! `sales_date`, `product_description` and `quantity_sold`. This crate parses such tables into
//! [`RawRecord`]s ready for the
//! [`PreprocessingPipeline`](sales_forecast_preprocessing::PreprocessingPipeline).
//!
//! Header names are matched case-insensitively after trimming whitespace and additional columns
//! are ignored. Cells are trimmed as well, empty cells become [`Field::Missing`]. Values are not
//! interpreted here, malformed dates or quantities are left to the preprocessing stages.
//!
//! ## Using the sample dataset
//!
//! A small bundled dataset is available behind the `sample` feature:
//! ```ignore
//! sales-forecast-datasets = { version = "0.1.0", features = ["sample"] }
//! ```
//! ```ignore
//! let records = sales_forecast_datasets::sample_sales()?;
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use sales_forecast_preprocessing::record::REQUIRED_COLUMNS;
use sales_forecast_preprocessing::{Field, RawRecord};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("cannot read sales data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Read raw sales records from CSV bytes with a header row
pub fn read_sales_csv<R: Read>(csv: R) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(csv);

    let columns = column_indices(reader.headers()?)?;
    let records = reader
        .records()
        .map(|record| {
            let record = record?;
            let cell = |idx: usize| record.get(idx).map(to_field).unwrap_or_default();
            Ok(RawRecord::new(
                cell(columns[0]),
                cell(columns[1]),
                cell(columns[2]),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(rows = records.len(), "read sales records");
    Ok(records)
}

/// Read raw sales records from gzipped CSV bytes
pub fn read_sales_gz_csv<R: Read>(gz: R) -> Result<Vec<RawRecord>> {
    read_sales_csv(GzDecoder::new(gz))
}

/// Read raw sales records from a `.csv` or `.csv.gz` file
pub fn read_sales_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    tracing::info!(path = %path.display(), "reading sales data");

    let gzipped = path
        .extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("gz"));
    if gzipped {
        read_sales_gz_csv(file)
    } else {
        read_sales_csv(file)
    }
}

#[cfg(feature = "sample")]
/// Read in the bundled sample of monthly widget and gadget sales.
///
/// Some rows carry deliberate defects: a missing and a non-numeric quantity, and a date in ISO
/// format.
pub fn sample_sales() -> Result<Vec<RawRecord>> {
    let data = include_bytes!("../data/sales.csv.gz");
    read_sales_gz_csv(&data[..])
}

/// Positions of the required columns, in the order of `REQUIRED_COLUMNS`
fn column_indices(headers: &StringRecord) -> Result<Vec<usize>> {
    let normalized = headers
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect::<Vec<_>>();

    let mut indices = Vec::with_capacity(REQUIRED_COLUMNS.len());
    let mut missing = Vec::new();
    for column in REQUIRED_COLUMNS.iter() {
        match normalized.iter().position(|name| name.as_str() == *column) {
            Some(idx) => indices.push(idx),
            None => missing.push(column.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(DatasetError::MissingColumns(missing))
    }
}

fn to_field(cell: &str) -> Field {
    let cell = cell.trim();
    if cell.is_empty() {
        Field::Missing
    } else {
        Field::Text(cell.to_string())
    }
}
