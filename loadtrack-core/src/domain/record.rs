//! LoadRecord — the fundamental dataset unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed hour of utility load alongside its pre-fitted baseline prediction.
///
/// `error` is a fractional ratio (0.05 means a 5% load reduction), not a
/// percentage. A missing measure value is carried as NaN and excluded
/// per-field during aggregation; `date` and `hour` are grouping keys and are
/// never missing in a loaded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub load: f64,
    pub predicted_load: f64,
    pub error: f64,
}

impl LoadRecord {
    /// Returns true if every measure field is NaN (void record).
    pub fn is_void(&self) -> bool {
        self.load.is_nan() && self.predicted_load.is_nan() && self.error.is_nan()
    }

    /// Basic sanity check: hour in 0..=23 and at least one finite measure.
    pub fn is_sane(&self) -> bool {
        self.hour <= 23 && !self.is_void()
    }
}
