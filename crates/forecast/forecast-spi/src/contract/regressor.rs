//! Regression oracle trait

use crate::error::Result;

/// A trained tabular regression model treated as a black box.
///
/// Given one feature vector the oracle returns a single scalar. Any concrete
/// backend (tree ensemble, linear model, remote service) implements this.
///
/// # Example
///
/// ```rust,ignore
/// use forecast_spi::Regressor;
///
/// fn score(model: &dyn Regressor, features: &[f64]) -> forecast_spi::Result<f64> {
///     if let Some(expected) = model.expected_feature_count() {
///         assert_eq!(expected, features.len());
///     }
///     model.predict(features)
/// }
/// ```
pub trait Regressor: Send + Sync {
    /// Predict a single value for one feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Oracle`](crate::ForecastError::Oracle) when the
    /// backend cannot evaluate the input.
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Number of input features the model was trained on, if known.
    fn expected_feature_count(&self) -> Option<usize> {
        None
    }

    /// Human-readable model family, e.g. `"Random Forest"`.
    fn model_type(&self) -> &str;
}
