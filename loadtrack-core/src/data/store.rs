//! TimeSeriesStore — immutable, sorted in-memory dataset.

use std::path::Path;

use chrono::NaiveDate;

use crate::data::ingest::{self, DataLoadError};
use crate::domain::{DateRange, LoadRecord};

/// The full dataset, sorted ascending by `(date, hour)` once at construction
/// and never mutated afterwards.
///
/// The store is the only state the engine holds. It has no interior
/// mutability, so any number of concurrent readers may share it without
/// locking; every derived view is recomputed from it per request.
#[derive(Debug, Clone)]
pub struct TimeSeriesStore {
    records: Vec<LoadRecord>,
    fingerprint: String,
}

impl TimeSeriesStore {
    /// Build a store from raw records. Fails on an empty set or an
    /// out-of-range hour; sorts the rest.
    pub fn new(mut records: Vec<LoadRecord>) -> Result<Self, DataLoadError> {
        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }
        for (row, rec) in records.iter().enumerate() {
            if rec.hour > 23 {
                return Err(DataLoadError::BadHour {
                    row,
                    value: rec.hour as i64,
                });
            }
        }
        records.sort_by(|a, b| (a.date, a.hour).cmp(&(b.date, b.hour)));
        let fingerprint = fingerprint(&records);
        Ok(Self {
            records,
            fingerprint,
        })
    }

    /// Convenience: ingest a dataset file (CSV or Parquet) straight into a store.
    pub fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        Self::new(ingest::load_records(path)?)
    }

    /// All records with `date` inside `range`, inclusive, in ascending date
    /// order. Empty slice (not an error) when nothing falls in range.
    pub fn records_in_range(&self, range: &DateRange) -> &[LoadRecord] {
        let lo = self.records.partition_point(|r| r.date < range.start());
        let hi = self.records.partition_point(|r| r.date <= range.end());
        &self.records[lo..hi]
    }

    pub fn records(&self) -> &[LoadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last date present in the dataset.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        // Non-empty by construction.
        (
            self.records.first().map(|r| r.date).unwrap_or_default(),
            self.records.last().map(|r| r.date).unwrap_or_default(),
        )
    }

    /// BLAKE3 fingerprint of the sorted records, for provenance reporting.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Content hash over the canonical (sorted) record sequence. Float fields are
/// hashed by bit pattern so NaN-carrying records fingerprint stably.
fn fingerprint(records: &[LoadRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for rec in records {
        hasher.update(rec.date.to_string().as_bytes());
        hasher.update(&[rec.hour]);
        hasher.update(&rec.load.to_bits().to_le_bytes());
        hasher.update(&rec.predicted_load.to_bits().to_le_bytes());
        hasher.update(&rec.error.to_bits().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
