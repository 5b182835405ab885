//! Artifact export — payload JSONs and series CSVs for one report run.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use loadtrack_core::aggregate;
use loadtrack_core::data::TimeSeriesStore;
use loadtrack_core::domain::DateRange;
use loadtrack_core::view::{DashboardUpdate, IndicatorPanel};

/// Paths of everything one report run wrote.
#[derive(Debug)]
pub struct ArtifactPaths {
    pub daily_error: PathBuf,
    pub load_shape: PathBuf,
    pub hourly_error: PathBuf,
    pub indicators: PathBuf,
    pub daily_csv: PathBuf,
    pub hourly_csv: PathBuf,
}

/// Indicator artifact with provenance alongside the three scalars.
#[derive(Debug, Serialize)]
struct IndicatorArtifact<'a> {
    range: DateRange,
    dataset_fingerprint: &'a str,
    indicators: IndicatorPanel,
}

/// Write the four payloads plus the two aggregate series into `output_dir`.
pub fn save_artifacts(
    update: &DashboardUpdate,
    store: &TimeSeriesStore,
    output_dir: &Path,
) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let paths = ArtifactPaths {
        daily_error: output_dir.join("daily_error.json"),
        load_shape: output_dir.join("load_shape.json"),
        hourly_error: output_dir.join("hourly_error.json"),
        indicators: output_dir.join("indicators.json"),
        daily_csv: output_dir.join("daily_series.csv"),
        hourly_csv: output_dir.join("hourly_series.csv"),
    };

    write_json(&paths.daily_error, &update.daily_error)?;
    write_json(&paths.load_shape, &update.load_shape)?;
    write_json(&paths.hourly_error, &update.hourly_error)?;
    write_json(
        &paths.indicators,
        &IndicatorArtifact {
            range: update.range,
            dataset_fingerprint: store.fingerprint(),
            indicators: update.indicators,
        },
    )?;

    write_daily_csv(&paths.daily_csv, store, &update.range)?;
    write_hourly_csv(&paths.hourly_csv, store, &update.range)?;

    Ok(paths)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn write_daily_csv(path: &Path, store: &TimeSeriesStore, range: &DateRange) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["date", "error"])?;
    for point in aggregate::daily_mean_error(store, range) {
        wtr.write_record([point.date.to_string(), format!("{:.6}", point.error)])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_hourly_csv(path: &Path, store: &TimeSeriesStore, range: &DateRange) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["hour", "load", "predicted_load", "error"])?;
    for point in aggregate::hourly_mean(store, range) {
        wtr.write_record([
            point.hour.to_string(),
            fmt_cell(point.load),
            fmt_cell(point.predicted_load),
            fmt_cell(point.error),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// An absent field mean is an empty cell, never a zero.
fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}
