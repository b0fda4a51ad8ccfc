//! Forecast error types

use data_spi::DataError;
use thiserror::Error;

/// Errors that can occur while predicting or forecasting
#[derive(Error, Debug, Clone)]
pub enum ForecastError {
    /// The regression oracle is not loaded
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    /// The historical dataset is not loaded
    #[error("Dataset not available: {0}")]
    DatasetUnavailable(String),

    /// Feature vector arity disagrees with what the oracle expects
    #[error("Feature mismatch: model expects {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// The oracle itself failed to produce a value
    #[error("Oracle prediction failed: {0}")]
    Oracle(String),

    /// The model artifact could not be decoded or is inconsistent
    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    /// Invalid caller-supplied parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A forecast produced no points at all
    #[error("Forecast generation failed: {0}")]
    ForecastFailed(String),

    /// Underlying dataset error
    #[error(transparent)]
    Data(#[from] DataError),
}

impl ForecastError {
    /// Whether this error means a resource or the oracle is unavailable,
    /// as opposed to bad caller input.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, ForecastError::InvalidParameter { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_model_unavailable_message() {
        let error = ForecastError::ModelUnavailable("random_forest_model.json".to_string());
        assert_eq!(
            error.to_string(),
            "Model not available: random_forest_model.json"
        );
    }

    #[test]
    fn test_dataset_unavailable_message() {
        let error = ForecastError::DatasetUnavailable("not loaded".to_string());
        assert_eq!(error.to_string(), "Dataset not available: not loaded");
    }

    #[test]
    fn test_feature_mismatch_message() {
        let error = ForecastError::FeatureCountMismatch {
            expected: 30,
            actual: 28,
        };
        assert_eq!(
            error.to_string(),
            "Feature mismatch: model expects 30 features, got 28"
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let error = ForecastError::InvalidParameter {
            name: "date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'date': expected YYYY-MM-DD"
        );
    }

    #[test]
    fn test_data_error_is_transparent() {
        let error: ForecastError = DataError::NoValidRecords.into();
        assert_eq!(error.to_string(), "No valid records in dataset");
        assert!(matches!(error, ForecastError::Data(DataError::NoValidRecords)));
    }

    #[test]
    fn test_is_unavailable() {
        assert!(ForecastError::ModelUnavailable(String::new()).is_unavailable());
        assert!(ForecastError::Oracle("boom".into()).is_unavailable());
        assert!(ForecastError::FeatureCountMismatch { expected: 1, actual: 2 }.is_unavailable());
        assert!(ForecastError::ForecastFailed(String::new()).is_unavailable());
        assert!(!ForecastError::InvalidParameter {
            name: "steps".into(),
            reason: "negative".into()
        }
        .is_unavailable());
    }

    #[test]
    fn test_error_can_be_boxed() {
        let boxed: Box<dyn Error + Send + Sync> =
            Box::new(ForecastError::ForecastFailed("no points".into()));
        assert_eq!(boxed.to_string(), "Forecast generation failed: no points");
    }

    #[test]
    fn test_all_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForecastError>();
    }
}
