//! Case Data Core
//!
//! Implementations for loading the historical surveillance dataset and
//! deriving daily suspected-case series from it.

pub mod csv_source;
pub mod dataset;
pub mod dates;

pub use csv_source::{read_records, CsvCaseSource};
pub use dataset::CaseDataset;
pub use dates::parse_reporting_date;

// Re-export SPI types for implementations
pub use data_spi::{
    coerce_count, coerce_number, left_pad, suspected_counts, CaseRecord, CaseSource, DailyTotal,
    DataError, Result, SeriesFilter,
};
