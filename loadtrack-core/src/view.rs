//! View assembly — the four presentation payloads for one recomputation cycle.
//!
//! Each payload is a pure function of `(Store, DateRange)` plus fixed
//! configuration, and each is reproducible in isolation: recomputing one never
//! depends on whether a sibling was computed first or at all. Styling (colors,
//! pixel sizes, fonts) is a presentation concern and is absent here; grouping
//! keys, averaged values and rounding are the bit-exact contract.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{self, DailyPoint, HourlyPoint};
use crate::config::TrackerConfig;
use crate::data::TimeSeriesStore;
use crate::domain::{DateRange, KeyEventMarker};
use crate::indicator::{self, Measure};
use crate::range::{self, SelectionEvent};

const DAILY_TITLE: &str = "COVID Daily Load Impact";
const DAILY_Y_TITLE: &str = "COVID Daily Load Reduction (%)";
const LOAD_SHAPE_TITLE: &str = "Predicted vs Actual Hourly Load Shape";
const LOAD_SHAPE_Y_TITLE: &str = "Hourly Load (aMW)";
const HOURLY_ERROR_TITLE: &str = "COVID Hourly Load Impact";
const HOURLY_ERROR_Y_TITLE: &str = "COVID Hourly Load Reduction (%)";
const HOUR_AXIS_TITLE: &str = "Hour of Day";

// ─── Payload types ───────────────────────────────────────────────────

/// A `{ data, layout }` structure consumable by any charting library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub x: AxisValues,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

/// X values are calendar dates for the daily chart and hours of day for the
/// hourly charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValues {
    Dates(Vec<NaiveDate>),
    Hours(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "tickformat", skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[NaiveDate; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// A positioned milestone annotation on the daily error chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: NaiveDate,
    pub y: f64,
    pub text: String,
    #[serde(rename = "showarrow")]
    pub show_arrow: bool,
    pub ax: f64,
    pub ay: f64,
}

/// The three summary scalars. `None` means "unavailable for this range" —
/// the presentation layer retains its last valid display rather than showing
/// a misleading zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPanel {
    pub load: Option<f64>,
    pub predicted_load: Option<f64>,
    pub error: Option<f64>,
}

/// One full recomputation cycle's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardUpdate {
    pub range: DateRange,
    pub daily_error: ChartPayload,
    pub load_shape: ChartPayload,
    pub hourly_error: ChartPayload,
    pub indicators: IndicatorPanel,
}

// ─── Payload builders ────────────────────────────────────────────────

/// Daily error trend with in-range milestone annotations.
pub fn daily_error_chart(
    store: &TimeSeriesStore,
    range: &DateRange,
    markers: &[KeyEventMarker],
) -> ChartPayload {
    let series = aggregate::daily_mean_error(store, range);
    let annotations = marker_annotations(&series, range, markers);

    ChartPayload {
        data: vec![Trace {
            kind: TraceKind::Scatter,
            name: None,
            mode: Some("lines".into()),
            x: AxisValues::Dates(series.iter().map(|p| p.date).collect()),
            y: series.iter().map(|p| p.error).collect(),
        }],
        layout: Layout {
            title: DAILY_TITLE.into(),
            xaxis: Axis {
                range: Some([range.start(), range.end()]),
                ..Axis::default()
            },
            yaxis: Axis {
                title: Some(DAILY_Y_TITLE.into()),
                tick_format: Some(",.0%".into()),
                range: None,
            },
            annotations,
        },
    }
}

/// Predicted-vs-actual hourly load shape.
pub fn load_shape_chart(store: &TimeSeriesStore, range: &DateRange) -> ChartPayload {
    let series = aggregate::hourly_mean(store, range);
    let predicted = hourly_trace(&series, "Predicted", |p| p.predicted_load);
    let actual = hourly_trace(&series, "Actual", |p| p.load);

    ChartPayload {
        data: vec![predicted, actual],
        layout: Layout {
            title: LOAD_SHAPE_TITLE.into(),
            xaxis: Axis {
                title: Some(HOUR_AXIS_TITLE.into()),
                ..Axis::default()
            },
            yaxis: Axis {
                title: Some(LOAD_SHAPE_Y_TITLE.into()),
                ..Axis::default()
            },
            annotations: Vec::new(),
        },
    }
}

/// Hourly error distribution, scaled to percentage for display.
pub fn hourly_error_chart(store: &TimeSeriesStore, range: &DateRange) -> ChartPayload {
    let series = aggregate::hourly_mean(store, range);
    let points: Vec<(u8, f64)> = series
        .iter()
        .filter_map(|p| p.error.map(|e| (p.hour, e * 100.0)))
        .collect();

    ChartPayload {
        data: vec![Trace {
            kind: TraceKind::Bar,
            name: None,
            mode: None,
            x: AxisValues::Hours(points.iter().map(|&(h, _)| h).collect()),
            y: points.iter().map(|&(_, e)| e).collect(),
        }],
        layout: Layout {
            title: HOURLY_ERROR_TITLE.into(),
            xaxis: Axis {
                title: Some(HOUR_AXIS_TITLE.into()),
                ..Axis::default()
            },
            yaxis: Axis {
                title: Some(HOURLY_ERROR_Y_TITLE.into()),
                ..Axis::default()
            },
            annotations: Vec::new(),
        },
    }
}

/// The three indicators, each computed and degraded independently.
pub fn indicator_panel(store: &TimeSeriesStore, range: &DateRange) -> IndicatorPanel {
    let available = |measure: Measure| match indicator::compute(measure, store, range) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%err, "indicator unavailable");
            None
        }
    };

    IndicatorPanel {
        load: available(Measure::Load),
        predicted_load: available(Measure::PredictedLoad),
        error: available(Measure::Error),
    }
}

/// Resolve the selection event and rebuild all four payloads.
pub fn assemble(
    store: &TimeSeriesStore,
    event: Option<&SelectionEvent>,
    config: &TrackerConfig,
) -> DashboardUpdate {
    let range = range::resolve(event, &config.default_range);
    DashboardUpdate {
        range,
        daily_error: daily_error_chart(store, &range, &config.markers),
        load_shape: load_shape_chart(store, &range),
        hourly_error: hourly_error_chart(store, &range),
        indicators: indicator_panel(store, &range),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Annotations for markers inside the active range. The annotation anchors to
/// the daily series value at the marker's date, so a marker whose date has no
/// daily sample is skipped.
fn marker_annotations(
    series: &[DailyPoint],
    range: &DateRange,
    markers: &[KeyEventMarker],
) -> Vec<Annotation> {
    markers
        .iter()
        .filter(|m| range.contains(m.date))
        .filter_map(|m| {
            let idx = series.binary_search_by(|p| p.date.cmp(&m.date)).ok()?;
            Some(Annotation {
                x: m.date,
                y: series[idx].error + m.vertical_offset,
                text: m.label.clone(),
                show_arrow: true,
                ax: m.arrow_dx,
                ay: m.arrow_dy,
            })
        })
        .collect()
}

fn hourly_trace(
    series: &[HourlyPoint],
    name: &str,
    field: impl Fn(&HourlyPoint) -> Option<f64>,
) -> Trace {
    let points: Vec<(u8, f64)> = series
        .iter()
        .filter_map(|p| field(p).map(|v| (p.hour, v)))
        .collect();
    Trace {
        kind: TraceKind::Scatter,
        name: Some(name.into()),
        mode: Some("lines+markers".into()),
        x: AxisValues::Hours(points.iter().map(|&(h, _)| h).collect()),
        y: points.iter().map(|&(_, v)| v).collect(),
    }
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

    fn sample_store() -> TimeSeriesStore {
        let mut records = Vec::new();
        for day in 20..25 {
            for hour in [8u8, 9, 17] {
                records.push(rec(date(2020, 1, day), hour, 1000.0 + hour as f64, 0.02));
            }
        }
        TimeSeriesStore::new(records).unwrap()
    }

    fn jan_range() -> DateRange {
        DateRange::new(date(2020, 1, 1), date(2020, 1, 31)).unwrap()
    }

    #[test]
    fn daily_chart_carries_range_and_tickformat() {
        let payload = daily_error_chart(&sample_store(), &jan_range(), &[]);
        assert_eq!(payload.layout.title, DAILY_TITLE);
        assert_eq!(
            payload.layout.xaxis.range,
            Some([date(2020, 1, 1), date(2020, 1, 31)])
        );
        assert_eq!(payload.layout.yaxis.tick_format.as_deref(), Some(",.0%"));
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].y.len(), 5);
    }

    #[test]
    fn marker_annotated_only_when_in_range() {
        let marker = KeyEventMarker {
            date: date(2020, 1, 21),
            vertical_offset: 0.005,
            arrow_dx: 20.0,
            arrow_dy: -65.0,
            label: "First US COVID Case".into(),
        };

        let in_range = daily_error_chart(&sample_store(), &jan_range(), &[marker.clone()]);
        assert_eq!(in_range.layout.annotations.len(), 1);
        let annot = &in_range.layout.annotations[0];
        assert_eq!(annot.x, date(2020, 1, 21));
        assert!((annot.y - 0.025).abs() < 1e-12);
        assert_eq!(annot.ax, 20.0);
        assert_eq!(annot.ay, -65.0);

        let narrow = DateRange::new(date(2020, 1, 22), date(2020, 1, 24)).unwrap();
        let out_of_range = daily_error_chart(&sample_store(), &narrow, &[marker]);
        assert!(out_of_range.layout.annotations.is_empty());
    }

    #[test]
    fn load_shape_has_predicted_and_actual_traces() {
        let payload = load_shape_chart(&sample_store(), &jan_range());
        assert_eq!(payload.data.len(), 2);
        assert_eq!(payload.data[0].name.as_deref(), Some("Predicted"));
        assert_eq!(payload.data[1].name.as_deref(), Some("Actual"));
        assert_eq!(payload.data[1].x, AxisValues::Hours(vec![8, 9, 17]));
    }

    #[test]
    fn hourly_error_is_scaled_to_percent() {
        let payload = hourly_error_chart(&sample_store(), &jan_range());
        assert_eq!(payload.data[0].kind, TraceKind::Bar);
        for y in &payload.data[0].y {
            assert!((y - 2.0).abs() < 1e-9);
        }
        // Already percent: no percent tick format on top.
        assert_eq!(payload.layout.yaxis.tick_format, None);
    }

    #[test]
    fn indicator_panel_degrades_per_measure() {
        let store = TimeSeriesStore::new(vec![LoadRecord {
            date: date(2020, 1, 21),
            hour: 9,
            load: f64::NAN,
            predicted_load: 1020.0,
            error: 0.02,
        }])
        .unwrap();

        let panel = indicator_panel(&store, &jan_range());
        assert_eq!(panel.load, None);
        assert_eq!(panel.predicted_load, Some(1020.0));
        assert_eq!(panel.error, Some(2.0));
    }

    #[test]
    fn assemble_uses_default_range_without_event() {
        let config = TrackerConfig::default();
        let update = assemble(&sample_store(), None, &config);
        assert_eq!(update.range, config.default_range);
    }

    #[test]
    fn payloads_are_independent_of_computation_order() {
        let store = sample_store();
        let range = jan_range();

        let alone = load_shape_chart(&store, &range);
        let _ = daily_error_chart(&store, &range, &[]);
        let _ = hourly_error_chart(&store, &range);
        let after_siblings = load_shape_chart(&store, &range);
        assert_eq!(alone, after_siblings);
    }

    #[test]
    fn payload_serializes_with_plotly_key_casing() {
        let payload = daily_error_chart(&sample_store(), &jan_range(), &[]);
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""tickformat":",.0%""#));
        assert!(json.contains(r#""type":"scatter""#));
        assert!(!json.contains("tick_format"));
    }
}
