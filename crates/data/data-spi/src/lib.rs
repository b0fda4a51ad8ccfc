//! Case Data Service Provider Interface
//!
//! Defines the types and traits for loading historical cholera surveillance
//! records and turning them into daily suspected-case series.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::CaseSource;
pub use error::{DataError, Result};
pub use model::{
    coerce_count, coerce_number, left_pad, suspected_counts, CaseRecord, DailyTotal, SeriesFilter,
};
