//! Trait for loading a regression oracle from its stored artifact

use crate::contract::Regressor;
use crate::error::Result;

/// Performs the "load model" capability.
pub trait RegressorLoader: Send + Sync {
    /// Where the artifact comes from, for log output.
    fn location(&self) -> String;

    /// Load and validate the oracle.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::ModelUnavailable`](crate::ForecastError::ModelUnavailable)
    /// when the artifact is missing and
    /// [`ForecastError::InvalidModel`](crate::ForecastError::InvalidModel) when it cannot be decoded.
    fn load(&self) -> Result<Box<dyn Regressor>>;
}
