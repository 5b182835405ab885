//! LoadTrack CLI — fetch the dataset and render dashboard artifacts.
//!
//! Commands:
//! - `fetch` — download the dataset CSV and save it locally
//! - `report` — recompute the dashboard payloads for a date range and export them

mod report;
mod synthetic;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use loadtrack_core::config::TrackerConfig;
use loadtrack_core::data::{fetch_csv, TimeSeriesStore};
use loadtrack_core::range::SelectionEvent;
use loadtrack_core::view::{self, DashboardUpdate};

#[derive(Parser)]
#[command(
    name = "loadtrack",
    about = "LoadTrack CLI — load-impact dashboard engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the dataset CSV and save it locally.
    Fetch {
        /// Source URL. Defaults to the configured dataset URL.
        #[arg(long)]
        url: Option<String>,

        /// Destination file.
        #[arg(long, default_value = "data/load.csv")]
        out: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Recompute the dashboard payloads for a date range and export artifacts.
    Report {
        /// Dataset path, CSV or Parquet (required unless --synthetic).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Range start, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS.ffffff`.
        /// Defaults to the configured range.
        #[arg(long)]
        start: Option<String>,

        /// Range end, same encodings as --start.
        #[arg(long)]
        end: Option<String>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Use a generated dataset instead of reading a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic dataset.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { url, out, config } => run_fetch(url, out, config),
        Commands::Report {
            data,
            config,
            start,
            end,
            output_dir,
            synthetic,
            seed,
        } => run_report(data, config, start, end, output_dir, synthetic, seed),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<TrackerConfig> {
    match path {
        Some(path) => TrackerConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(TrackerConfig::default()),
    }
}

fn run_fetch(url: Option<String>, out: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let url = match url.or(config.dataset.url) {
        Some(url) => url,
        None => bail!("no --url given and no dataset URL configured"),
    };

    let body = fetch_csv(&url)?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&out, &body).with_context(|| format!("failed to write {}", out.display()))?;

    println!("Fetched {} bytes to {}", body.len(), out.display());
    Ok(())
}

fn run_report(
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    output_dir: PathBuf,
    synthetic: bool,
    seed: u64,
) -> Result<()> {
    let config = load_config(config)?;

    let store = if synthetic {
        if data.is_some() {
            bail!("--data and --synthetic are mutually exclusive");
        }
        let range = config.default_range;
        let days = (range.end() - range.start()).num_days() as u32 + 1;
        TimeSeriesStore::new(synthetic::generate(range.start(), days, seed))?
    } else {
        let Some(path) = data else {
            bail!("one of --data or --synthetic is required");
        };
        TimeSeriesStore::from_path(&path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?
    };

    // A partial override degrades to the configured range, same as a partial
    // selection event from a chart interaction.
    let event = match (start, end) {
        (Some(start), Some(end)) => Some(SelectionEvent::range(start, end)),
        (None, None) => None,
        _ => bail!("--start and --end must be given together"),
    };

    let update = view::assemble(&store, event.as_ref(), &config);
    report::save_artifacts(&update, &store, &output_dir)?;

    print_summary(&update, &store);
    println!("Artifacts saved to: {}", output_dir.display());

    Ok(())
}

fn print_summary(update: &DashboardUpdate, store: &TimeSeriesStore) {
    let in_range = store.records_in_range(&update.range).len();
    let (first, last) = store.date_bounds();

    println!();
    println!("=== Load Impact Report ===");
    println!("Range:            {}", update.range);
    println!("Dataset:          {} records, {} to {}", store.len(), first, last);
    println!("In range:         {in_range} records");
    println!("Fingerprint:      {}", &store.fingerprint()[..16]);
    println!();
    println!("--- Indicators ---");
    println!("Actual Load:      {}", fmt_indicator(update.indicators.load, "aMW"));
    println!(
        "Predicted Load:   {}",
        fmt_indicator(update.indicators.predicted_load, "aMW")
    );
    println!("Prediction Error: {}", fmt_indicator(update.indicators.error, "%"));
    println!();
}

fn fmt_indicator(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => "unavailable (no samples in range)".into(),
    }
}
