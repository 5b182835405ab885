//! KeyEventMarker — fixed domain milestones annotated on the daily error chart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A statically configured milestone (e.g. a public-health order) drawn as a
/// positioned annotation when its date falls inside the active range.
///
/// Markers are configuration: loaded once, never mutated at runtime. The
/// offsets position the annotation relative to the daily series value at the
/// marker's date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEventMarker {
    pub date: NaiveDate,
    /// Added to the series value to lift or drop the annotation anchor.
    pub vertical_offset: f64,
    /// Arrow tail offset in x, chart pixels.
    pub arrow_dx: f64,
    /// Arrow tail offset in y, chart pixels.
    pub arrow_dy: f64,
    pub label: String,
}
