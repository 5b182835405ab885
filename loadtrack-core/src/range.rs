//! Range normalization — heterogeneous selection input to a canonical DateRange.
//!
//! A selection event arrives from the hosting shell with zero, one, or two
//! endpoint tokens, each in one of two textual encodings. Parsing walks an
//! explicit ordered format list; normalization failures never escape this
//! module — every degenerate input resolves to the configured default range.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::{range::InvertedRange, DateRange};

/// Accepted endpoint encodings, tried in order. The first carries a
/// time-of-day (discarded after parse), the second is a bare calendar date.
pub const ACCEPTED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d"];

/// A range-selection event from the presentation layer. The endpoint pair is
/// absent for non-range interactions (zoom reset, autoscale).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectionEvent {
    #[serde(default)]
    pub range_endpoints: Option<[String; 2]>,
}

impl SelectionEvent {
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            range_endpoints: Some([start.into(), end.into()]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeParseError {
    #[error("'{token}' matches none of the accepted date encodings")]
    Unrecognized { token: String },

    #[error(transparent)]
    Inverted(#[from] InvertedRange),
}

/// Parse one endpoint token, trying each accepted format in sequence.
/// Time-of-day, if present, is truncated to calendar-date granularity.
pub fn parse_endpoint(token: &str) -> Result<NaiveDate, RangeParseError> {
    for format in ACCEPTED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(token, format) {
            return Ok(dt.date());
        }
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            return Ok(date);
        }
    }
    Err(RangeParseError::Unrecognized {
        token: token.to_string(),
    })
}

/// Canonical range from an event, if it carries one.
///
/// `Ok(None)` means "no range in this event" (fall back to the default);
/// `Err` means the event carried endpoints that could not form a valid range.
pub fn range_from_event(event: &SelectionEvent) -> Result<Option<DateRange>, RangeParseError> {
    let Some([start_token, end_token]) = &event.range_endpoints else {
        return Ok(None);
    };
    let start = parse_endpoint(start_token)?;
    let end = parse_endpoint(end_token)?;
    Ok(Some(DateRange::new(start, end)?))
}

/// Resolve a possibly-absent selection event to the range the pipeline will
/// aggregate over. All failure modes recover to `default_range`; nothing is
/// surfaced to the caller as an error.
pub fn resolve(event: Option<&SelectionEvent>, default_range: &DateRange) -> DateRange {
    let Some(event) = event else {
        return *default_range;
    };
    match range_from_event(event) {
        Ok(Some(range)) => range,
        Ok(None) => *default_range,
        Err(err) => {
            warn!(%err, "selection range rejected, falling back to default");
            *default_range
        }
    }
}
