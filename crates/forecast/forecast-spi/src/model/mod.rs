//! Model module containing data structures

mod config;
mod feature_vector;
mod forecast;

pub use config::ForecastConfig;
pub use feature_vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use forecast::{Forecast, ForecastPoint};
