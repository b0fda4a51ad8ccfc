//! Forecast output types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One future-dated prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Date being predicted
    pub date: NaiveDate,
    /// Predicted suspected cases (finite, non-negative)
    pub predicted: f64,
    /// 1-based step index
    pub step: usize,
}

/// Result of a multi-step forecast run.
///
/// A run that stops before `requested_steps` is still a success; `halted`
/// records why it stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Points in step order
    pub points: Vec<ForecastPoint>,
    /// Steps the caller asked for
    pub requested_steps: usize,
    /// Reason the loop stopped early, if it did
    pub halted: Option<String>,
}

impl Forecast {
    /// Whether fewer points than requested were produced.
    pub fn is_partial(&self) -> bool {
        self.points.len() < self.requested_steps
    }

    /// Predicted values in step order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted).collect()
    }
}
