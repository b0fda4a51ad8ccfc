//! Forecast Facade
//!
//! High-level entry point for the cholera forecast stack. Re-exports the
//! dataset access layer, the forecast core and the service configuration.

// Re-export everything from API (which includes SPI and core)
pub use forecast_api::*;

// Explicit re-exports for documentation
pub use forecast_api::prelude;

// Core building blocks
pub use forecast_core::{
    apply_cap, CapOutcome, CapRule, DecisionTree, ForecastStart, ForecastSteps, Forecaster,
    JsonForestLoader, RandomForest, TreeNode,
};

// Dataset access
pub use data_core::{parse_reporting_date, read_records, CaseDataset, CsvCaseSource};
pub use data_spi::{CaseRecord, CaseSource, DataError, SeriesFilter};
