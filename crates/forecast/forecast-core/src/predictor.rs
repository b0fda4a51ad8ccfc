//! Single-step predictor
//!
//! Wraps the regression oracle with an arity check, output sanitisation
//! and the capping policy.

use data_spi::coerce_count;
use forecast_spi::{FeatureVector, ForecastError, Regressor, Result};

use crate::capping::{apply_cap, CapRule};

/// Capped single-step predictor over an optional oracle.
#[derive(Clone, Copy)]
pub struct Predictor<'a> {
    oracle: Option<&'a dyn Regressor>,
}

impl<'a> Predictor<'a> {
    /// Predictor backed by a loaded oracle.
    pub fn new(oracle: &'a dyn Regressor) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// Predictor with no oracle; every call reports the model unavailable.
    pub fn unavailable() -> Self {
        Self { oracle: None }
    }

    /// Build from an optional oracle.
    pub fn from_option(oracle: Option<&'a dyn Regressor>) -> Self {
        Self { oracle }
    }

    /// Whether an oracle is present.
    pub fn is_available(&self) -> bool {
        self.oracle.is_some()
    }

    /// Model family reported by the oracle.
    pub fn model_type(&self) -> Option<&str> {
        self.oracle.map(|o| o.model_type())
    }

    /// Predict one value.
    ///
    /// The raw oracle output is forced finite and non-negative, then capped
    /// against `recent_history` (see [`apply_cap`]).
    ///
    /// # Errors
    ///
    /// - [`ForecastError::ModelUnavailable`] when no oracle is loaded
    /// - [`ForecastError::FeatureCountMismatch`] when the oracle expects a
    ///   different arity; the oracle is not called
    /// - whatever the oracle itself returns
    pub fn predict(&self, features: &FeatureVector, recent_history: &[f64]) -> Result<f64> {
        let oracle = self
            .oracle
            .ok_or_else(|| ForecastError::ModelUnavailable("model not loaded".to_string()))?;

        if let Some(expected) = oracle.expected_feature_count() {
            if expected != features.len() {
                tracing::error!(
                    "Feature mismatch! Model expects {} features, got {}",
                    expected,
                    features.len()
                );
                return Err(ForecastError::FeatureCountMismatch {
                    expected,
                    actual: features.len(),
                });
            }
        }

        let raw = oracle.predict(features.as_slice())?;
        let outcome = apply_cap(coerce_count(raw), recent_history);

        if let (Some(rule), Some(baseline)) = (outcome.rule, outcome.baseline) {
            let label = match rule {
                CapRule::AboveDoubleBaseline => "unrealistic",
                CapRule::AboveHalfAgainBaseline => "high",
                CapRule::AboveDoubleAverage => "above recent average",
            };
            tracing::info!(
                "Capped {} prediction. Original: {:.2}, Capped to: {:.2} (baseline: {:.2})",
                label,
                outcome.original,
                outcome.value,
                baseline
            );
        }

        Ok(outcome.value)
    }
}

impl std::fmt::Debug for Predictor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model_type", &self.model_type())
            .finish()
    }
}
