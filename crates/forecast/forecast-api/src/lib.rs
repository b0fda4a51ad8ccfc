//! Forecast Consumer API
//!
//! Service configuration plus re-exports of the SPI and core types a
//! consumer needs to wire the forecast service into an application.

pub mod config;

pub use config::{ServiceConfig, ServiceConfigBuilder};

// Re-export from core
pub use forecast_core::{
    build_features, ForecastInput, ForecastRun, ForecastService, PredictionInput, Predictor,
    ResourceCache, ResourceStatus, SinglePrediction, HISTORY_WINDOW,
};

// Re-export from SPI
pub use forecast_spi::{
    FeatureVector, Forecast, ForecastConfig, ForecastError, ForecastPoint, Regressor,
    RegressorLoader, Result, FEATURE_COUNT, FEATURE_NAMES,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ServiceConfig, ServiceConfigBuilder};
    pub use forecast_core::{
        ForecastInput, ForecastService, PredictionInput, ResourceCache, ResourceStatus,
    };
    pub use forecast_spi::{Forecast, ForecastConfig, ForecastError, ForecastPoint, Result};
}
