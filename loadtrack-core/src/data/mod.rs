//! Data layer: schema validation, ingestion, the immutable store, download.

pub mod download;
pub mod ingest;
pub mod schema;
pub mod store;

pub use download::{fetch_csv, DownloadError};
pub use ingest::{load_records, records_from_frame, DataIngestor, DataLoadError};
pub use schema::{LoadSchema, SchemaError};
pub use store::TimeSeriesStore;
