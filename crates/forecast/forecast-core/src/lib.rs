//! Forecast Core
//!
//! Core implementations for the cholera forecast service: the 28-field
//! feature builder, the capped single-step predictor, the iterative
//! forecast loop, a random-forest oracle backend and the lazily loaded
//! resource cache that ties the dataset and the oracle together.

pub mod cache;
pub mod capping;
pub mod features;
pub mod forecast;
pub mod forest;
pub mod predictor;
pub mod service;
pub mod stats;

// Re-export SPI traits for implementations
pub use forecast_spi::{
    FeatureVector, Forecast, ForecastConfig, ForecastError, ForecastPoint, Regressor,
    RegressorLoader, Result, FEATURE_COUNT, FEATURE_NAMES,
};

// Re-export main types
pub use cache::{ResourceCache, ResourceStatus};
pub use capping::{apply_cap, CapOutcome, CapRule};
pub use features::{build_features, HISTORY_WINDOW};
pub use forecast::{ForecastStart, ForecastSteps, Forecaster};
pub use forest::{DecisionTree, JsonForestLoader, RandomForest, TreeNode};
pub use predictor::Predictor;
pub use service::{ForecastInput, ForecastRun, ForecastService, PredictionInput, SinglePrediction};
