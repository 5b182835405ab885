//! Indicators — rounded scalar summaries of one measure over a range.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::MeanAcc;
use crate::data::TimeSeriesStore;
use crate::domain::{DateRange, LoadRecord};

/// The three summarizable measures. Serialized names match the dataset's
/// column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Measure {
    Load,
    PredictedLoad,
    Error,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Load, Measure::PredictedLoad, Measure::Error];

    fn extract(&self, rec: &LoadRecord) -> f64 {
        match self {
            Measure::Load => rec.load,
            Measure::PredictedLoad => rec.predicted_load,
            Measure::Error => rec.error,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Measure::Load => "LOAD",
            Measure::PredictedLoad => "PREDICTED_LOAD",
            Measure::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// A range with zero finite samples for the requested measure. The indicator
/// is unavailable — callers must not substitute a numeric zero.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("no {measure} samples in {range}")]
pub struct EmptyRangeError {
    pub measure: Measure,
    pub range: DateRange,
}

/// Mean of the measure over the range, rounded per measure: `ERROR` is scaled
/// ×100 and rounded to 2 decimals (a percentage); the load measures round to
/// whole units.
pub fn compute(
    measure: Measure,
    store: &TimeSeriesStore,
    range: &DateRange,
) -> Result<f64, EmptyRangeError> {
    let mut acc = MeanAcc::default();
    for rec in store.records_in_range(range) {
        acc.push(measure.extract(rec));
    }
    let mean = acc.mean().ok_or(EmptyRangeError {
        measure,
        range: *range,
    })?;

    Ok(match measure {
        Measure::Error => round_to(mean * 100.0, 2),
        Measure::Load | Measure::PredictedLoad => round_to(mean, 0),
    })
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(d: NaiveDate, hour: u8, load: f64, predicted_load: f64, error: f64) -> LoadRecord {
        LoadRecord {
            date: d,
            hour,
            load,
            predicted_load,
            error,
        }
    }

    fn range() -> DateRange {
        DateRange::new(date(2020, 1, 1), date(2020, 12, 31)).unwrap()
    }

    #[test]
    fn error_indicator_is_percentage_rounded_to_two_decimals() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 8, 1000.0, 1020.0, 0.02),
            rec(date(2020, 3, 1), 9, 1010.0, 1050.0, 0.04),
        ])
        .unwrap();

        assert_eq!(compute(Measure::Error, &store, &range()).unwrap(), 3.00);
    }

    #[test]
    fn load_indicators_round_to_whole_units() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 8, 1000.4, 1020.8, 0.02),
            rec(date(2020, 3, 1), 9, 1001.0, 1021.0, 0.04),
        ])
        .unwrap();

        assert_eq!(compute(Measure::Load, &store, &range()).unwrap(), 1001.0);
        assert_eq!(
            compute(Measure::PredictedLoad, &store, &range()).unwrap(),
            1021.0
        );
    }

    #[test]
    fn empty_range_is_an_error_not_zero() {
        let store =
            TimeSeriesStore::new(vec![rec(date(2020, 3, 1), 8, 1000.0, 1020.0, 0.02)]).unwrap();
        let disjoint = DateRange::new(date(2021, 1, 1), date(2021, 2, 1)).unwrap();

        let err = compute(Measure::Load, &store, &disjoint).unwrap_err();
        assert_eq!(err.measure, Measure::Load);
        assert_eq!(err.range, disjoint);
    }

    #[test]
    fn all_nan_measure_is_an_error_even_with_records_in_range() {
        let store = TimeSeriesStore::new(vec![rec(
            date(2020, 3, 1),
            8,
            f64::NAN,
            1020.0,
            0.02,
        )])
        .unwrap();

        assert!(compute(Measure::Load, &store, &range()).is_err());
        assert!(compute(Measure::PredictedLoad, &store, &range()).is_ok());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let store = TimeSeriesStore::new(vec![rec(
            date(2020, 3, 1),
            8,
            1000.5,
            1020.0,
            0.00125,
        )])
        .unwrap();

        assert_eq!(compute(Measure::Load, &store, &range()).unwrap(), 1001.0);
        assert_eq!(compute(Measure::Error, &store, &range()).unwrap(), 0.13);
    }
}
