//! Dataset ingestion — lazy CSV/Parquet readers and typed record conversion.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::debug;

use crate::data::schema::{LoadSchema, SchemaError};
use crate::domain::LoadRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Data ingestor for CSV and Parquet files.
pub struct DataIngestor {
    schema: Schema,
}

impl DataIngestor {
    pub fn new() -> Self {
        Self {
            schema: LoadSchema::schema(),
        }
    }

    /// Ingest a CSV file.
    pub fn ingest_csv(&self, path: &Path) -> Result<LazyFrame, DataLoadError> {
        LazyCsvReader::new(path)
            .with_schema(Some(Arc::new(self.schema.clone())))
            .with_has_header(true)
            .finish()
            .map_err(|e| DataLoadError::Ingest(e.to_string()))
    }

    /// Ingest a Parquet file.
    pub fn ingest_parquet(&self, path: &Path) -> Result<LazyFrame, DataLoadError> {
        LazyFrame::scan_parquet(path, Default::default())
            .map_err(|e| DataLoadError::Ingest(e.to_string()))
    }
}

impl Default for DataIngestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a validated DataFrame into typed records.
///
/// Grouping keys are strict: a null or unparsable `DATE`/`HOUR` fails the
/// whole load. Measure columns are lenient: a null becomes NaN and is
/// excluded per-field during aggregation.
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<LoadRecord>, DataLoadError> {
    LoadSchema::validate(df)?;

    let map_err = |e: PolarsError| DataLoadError::Ingest(format!("column read: {e}"));

    let dates = df.column("DATE").map_err(map_err)?;
    let hours = df.column("HOUR").map_err(map_err)?;
    let loads = df.column("LOAD").map_err(map_err)?;
    let predicted = df.column("PREDICTED_LOAD").map_err(map_err)?;
    let errors = df.column("ERROR").map_err(map_err)?;

    let date_ca = dates.str().map_err(map_err)?;
    let hour_ca = hours.i64().map_err(map_err)?;
    let load_ca = loads.f64().map_err(map_err)?;
    let pred_ca = predicted.f64().map_err(map_err)?;
    let err_ca = errors.f64().map_err(map_err)?;

    let n = df.height();
    let mut records = Vec::with_capacity(n);
    let mut missing_values = 0usize;

    for i in 0..n {
        let raw_date = date_ca.get(i).ok_or(DataLoadError::MissingKey {
            row: i,
            column: "DATE",
        })?;
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
            DataLoadError::BadDate {
                row: i,
                value: raw_date.to_string(),
            }
        })?;

        let raw_hour = hour_ca.get(i).ok_or(DataLoadError::MissingKey {
            row: i,
            column: "HOUR",
        })?;
        if !(0..=23).contains(&raw_hour) {
            return Err(DataLoadError::BadHour {
                row: i,
                value: raw_hour,
            });
        }

        let load = load_ca.get(i).unwrap_or(f64::NAN);
        let predicted_load = pred_ca.get(i).unwrap_or(f64::NAN);
        let error = err_ca.get(i).unwrap_or(f64::NAN);
        if load.is_nan() || predicted_load.is_nan() || error.is_nan() {
            missing_values += 1;
        }

        records.push(LoadRecord {
            date,
            hour: raw_hour as u8,
            load,
            predicted_load,
            error,
        });
    }

    if missing_values > 0 {
        debug!(rows = n, missing_values, "dataset has rows with missing measure values");
    }

    Ok(records)
}

/// Load records from a dataset file, dispatching on extension: `.parquet`
/// takes the Parquet path, anything else is read as CSV.
pub fn load_records(path: &Path) -> Result<Vec<LoadRecord>, DataLoadError> {
    let ingestor = DataIngestor::new();
    let frame = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => ingestor.ingest_parquet(path)?,
        _ => ingestor.ingest_csv(path)?,
    };
    let df = frame
        .collect()
        .map_err(|e| DataLoadError::Ingest(e.to_string()))?;
    records_from_frame(&df)
}

/// Errors from loading the dataset. Fatal: a dataset that fails here aborts
/// startup rather than producing a partially valid store.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("ingest failed: {0}")]
    Ingest(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("row {row}: null {column}")]
    MissingKey { row: usize, column: &'static str },

    #[error("row {row}: unparsable DATE '{value}'")]
    BadDate { row: usize, value: String },

    #[error("row {row}: HOUR {value} outside 0..=23")]
    BadHour { row: usize, value: i64 },

    #[error("dataset contains no records")]
    Empty,
}
