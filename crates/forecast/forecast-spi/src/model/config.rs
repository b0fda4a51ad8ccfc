//! Forecast tuning knobs shared by the core and its consumers

use serde::{Deserialize, Serialize};

/// Window sizes and defaults used by prediction and forecasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Steps produced when the caller does not ask for a count
    pub default_steps: usize,
    /// Largest step count a single forecast may ask for
    pub max_steps: usize,
    /// History length seeded from the dataset and kept while rolling forward
    pub seed_window: usize,
    /// Region assumed when the caller omits one
    pub default_region: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_steps: 14,
            max_steps: 365,
            seed_window: 60,
            default_region: "Central".to_string(),
        }
    }
}
