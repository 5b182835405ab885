//! Domain types for the load-impact engine.

pub mod marker;
pub mod range;
pub mod record;

pub use marker::KeyEventMarker;
pub use range::{DateRange, InvertedRange};
pub use record::LoadRecord;
