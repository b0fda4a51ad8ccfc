//! Forecast Service Provider Interface
//!
//! Defines the regression-oracle contract, the fixed 28-field feature
//! vector, forecast output types and the forecast error taxonomy.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Regressor, RegressorLoader};
pub use error::{ForecastError, Result};
pub use model::{
    FeatureVector, Forecast, ForecastConfig, ForecastPoint, FEATURE_COUNT, FEATURE_NAMES,
};
