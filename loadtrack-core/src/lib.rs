//! LoadTrack Core — range-driven re-aggregation engine for a load-impact dashboard.
//!
//! Given a full-resolution load time series and a user-selected date range,
//! this crate recomputes every derived view the dashboard shows:
//! - Daily error trend with milestone annotations
//! - Hourly load-shape comparison (predicted vs actual)
//! - Hourly error distribution
//! - Three scalar summary indicators
//!
//! The engine is stateless apart from the immutable [`data::TimeSeriesStore`]:
//! each selection event triggers one synchronous recomputation, and every
//! public function is a pure function of `(store, inputs)`.

pub mod aggregate;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicator;
pub mod range;
pub mod view;
