//! Aggregation — pure group-mean functions over `(Store, DateRange)`.
//!
//! Both algorithms are deterministic functions of their inputs with no hidden
//! state. Groups with zero matching records are omitted, never zero-filled or
//! interpolated; within a group, a NaN sample is excluded from that field's
//! mean only (per-field exclusion).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::TimeSeriesStore;
use crate::domain::DateRange;

/// One day's mean prediction error (fractional ratio).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub error: f64,
}

/// One hour-of-day's mean load, predicted load and error. A field is `None`
/// when the hour has no finite sample for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub load: Option<f64>,
    pub predicted_load: Option<f64>,
    pub error: Option<f64>,
}

/// Running mean over finite samples only.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    pub(crate) fn push(&mut self, value: f64) {
        if value.is_finite() {
            self.sum += value;
            self.count += 1;
        }
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ─── Aggregation algorithms ──────────────────────────────────────────

/// Group records in range by date and average `error` per day, ascending by
/// date. A day whose every error sample is NaN is omitted.
pub fn daily_mean_error(store: &TimeSeriesStore, range: &DateRange) -> Vec<DailyPoint> {
    let mut groups: BTreeMap<NaiveDate, MeanAcc> = BTreeMap::new();
    for rec in store.records_in_range(range) {
        groups.entry(rec.date).or_default().push(rec.error);
    }
    groups
        .into_iter()
        .filter_map(|(date, acc)| acc.mean().map(|error| DailyPoint { date, error }))
        .collect()
}

/// Group records in range by hour of day and average `load`,
/// `predicted_load` and `error` independently, ascending by hour. At most 24
/// groups; an hour absent from the range is absent from the output.
pub fn hourly_mean(store: &TimeSeriesStore, range: &DateRange) -> Vec<HourlyPoint> {
    let mut groups: BTreeMap<u8, [MeanAcc; 3]> = BTreeMap::new();
    for rec in store.records_in_range(range) {
        let accs = groups.entry(rec.hour).or_default();
        accs[0].push(rec.load);
        accs[1].push(rec.predicted_load);
        accs[2].push(rec.error);
    }
    groups
        .into_iter()
        .map(|(hour, [load, predicted, error])| HourlyPoint {
            hour,
            load: load.mean(),
            predicted_load: predicted.mean(),
            error: error.mean(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoadRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(d: NaiveDate, hour: u8, load: f64, error: f64) -> LoadRecord {
        LoadRecord {
            date: d,
            hour,
            load,
            predicted_load: load * 1.02,
            error,
        }
    }

    fn full_range() -> DateRange {
        DateRange::new(date(2020, 1, 1), date(2020, 12, 31)).unwrap()
    }

    #[test]
    fn daily_mean_groups_and_averages() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 2), 8, 1000.0, 0.02),
            rec(date(2020, 3, 2), 9, 1010.0, 0.04),
            rec(date(2020, 3, 1), 8, 990.0, 0.01),
        ])
        .unwrap();

        let series = daily_mean_error(&store, &full_range());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date(2020, 3, 1));
        assert_eq!(series[0].error, 0.01);
        assert_eq!(series[1].date, date(2020, 3, 2));
        assert!((series[1].error - 0.03).abs() < 1e-12);
    }

    #[test]
    fn daily_mean_skips_nan_samples() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 8, 1000.0, 0.02),
            rec(date(2020, 3, 1), 9, 1010.0, f64::NAN),
        ])
        .unwrap();

        let series = daily_mean_error(&store, &full_range());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].error, 0.02);
    }

    #[test]
    fn daily_mean_omits_day_with_no_finite_error() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 8, 1000.0, f64::NAN),
            rec(date(2020, 3, 2), 8, 1000.0, 0.05),
        ])
        .unwrap();

        let series = daily_mean_error(&store, &full_range());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, date(2020, 3, 2));
    }

    #[test]
    fn hourly_mean_averages_each_field_independently() {
        let mut missing_load = rec(date(2020, 3, 2), 9, f64::NAN, 0.06);
        missing_load.predicted_load = 1040.0;
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 9, 100.0, 0.02),
            rec(date(2020, 3, 2), 9, 120.0, 0.04),
            missing_load,
        ])
        .unwrap();

        let series = hourly_mean(&store, &full_range());
        assert_eq!(series.len(), 1);
        let point = series[0];
        assert_eq!(point.hour, 9);
        // load mean over the two finite samples only
        assert_eq!(point.load, Some(110.0));
        // error mean over all three samples
        assert!((point.error.unwrap() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn hourly_mean_omits_absent_hours() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 9, 100.0, 0.02),
            rec(date(2020, 3, 1), 17, 140.0, 0.03),
        ])
        .unwrap();

        let series = hourly_mean(&store, &full_range());
        let hours: Vec<u8> = series.iter().map(|p| p.hour).collect();
        assert_eq!(hours, vec![9, 17]);
    }

    #[test]
    fn hourly_mean_is_ascending_by_hour() {
        let store = TimeSeriesStore::new(vec![
            rec(date(2020, 3, 1), 23, 100.0, 0.02),
            rec(date(2020, 3, 1), 0, 90.0, 0.01),
            rec(date(2020, 3, 1), 12, 120.0, 0.03),
        ])
        .unwrap();

        let hours: Vec<u8> = hourly_mean(&store, &full_range())
            .iter()
            .map(|p| p.hour)
            .collect();
        assert_eq!(hours, vec![0, 12, 23]);
    }

    #[test]
    fn field_with_no_finite_samples_is_none() {
        let store = TimeSeriesStore::new(vec![rec(date(2020, 3, 1), 9, f64::NAN, 0.02)])
            .unwrap();

        let series = hourly_mean(&store, &full_range());
        assert_eq!(series[0].load, None);
        assert!(series[0].error.is_some());
    }

    #[test]
    fn empty_range_yields_empty_series() {
        let store = TimeSeriesStore::new(vec![rec(date(2020, 3, 1), 9, 100.0, 0.02)]).unwrap();
        let disjoint = DateRange::new(date(2021, 1, 1), date(2021, 2, 1)).unwrap();
        assert!(daily_mean_error(&store, &disjoint).is_empty());
        assert!(hourly_mean(&store, &disjoint).is_empty());
    }
}
