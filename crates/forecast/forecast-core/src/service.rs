//! Forecast service
//!
//! Binds the optional dataset and oracle to the prediction and forecast
//! operations, resolving defaults and seeding history from the dataset when
//! the caller supplies none.

use chrono::{Local, NaiveDate};
use data_core::CaseDataset;
use forecast_spi::{FeatureVector, Forecast, ForecastConfig, ForecastError, Result};

use crate::features::{build_features, HISTORY_WINDOW};
use crate::forecast::{ForecastStart, Forecaster};
use crate::predictor::Predictor;

/// Caller input for a single prediction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionInput {
    pub region: Option<String>,
    pub district: Option<String>,
    /// Target date; today when absent
    pub date: Option<NaiveDate>,
    /// Trailing suspected counts, oldest first; seeded from the dataset when empty
    pub history: Vec<f64>,
}

/// Caller input for a multi-step forecast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastInput {
    pub region: Option<String>,
    pub district: Option<String>,
    pub history: Vec<f64>,
    /// Steps to produce; the configured default when absent
    pub steps: Option<usize>,
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePrediction {
    pub predicted: f64,
    pub features: FeatureVector,
    pub history_points: usize,
    pub date: NaiveDate,
    pub region: String,
}

/// Outcome of a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub forecast: Forecast,
    pub history_points: usize,
}

/// Prediction and forecast over borrowed resources.
#[derive(Debug, Clone, Copy)]
pub struct ForecastService<'a> {
    dataset: Option<&'a CaseDataset>,
    predictor: Predictor<'a>,
    config: &'a ForecastConfig,
}

impl<'a> ForecastService<'a> {
    pub fn new(
        dataset: Option<&'a CaseDataset>,
        predictor: Predictor<'a>,
        config: &'a ForecastConfig,
    ) -> Self {
        Self {
            dataset,
            predictor,
            config,
        }
    }

    /// Model family of the loaded oracle.
    pub fn model_type(&self) -> Option<&str> {
        self.predictor.model_type()
    }

    /// Predict suspected cases for one date.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::ModelUnavailable`] when no oracle is loaded
    /// - [`ForecastError::DatasetUnavailable`] when history must be seeded
    ///   but no dataset is loaded
    /// - any predictor error
    pub fn predict(&self, input: PredictionInput) -> Result<SinglePrediction> {
        self.require_model()?;

        let region = self.resolve_region(input.region);
        let district = input.district;

        let history = if input.history.is_empty() {
            let dataset = self.require_dataset()?;
            let (seed, _) = dataset.historical_sequence(
                Some(region.as_str()),
                district.as_deref(),
                dataset.last_date(),
                self.config.seed_window,
            );
            seed
        } else {
            input.history
        };

        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let features = build_features(date, Some(region.as_str()), district.as_deref(), &history);
        let predicted = self.predictor.predict(&features, &history)?;

        tracing::info!(
            "Prediction for {} on {}: {:.2} ({} history points)",
            region,
            date,
            predicted,
            history.len()
        );

        Ok(SinglePrediction {
            predicted,
            features,
            history_points: history.len(),
            date,
            region,
        })
    }

    /// Forecast suspected cases day by day after the dataset's last date.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::InvalidParameter`] when more than `max_steps` are asked for
    /// - [`ForecastError::ModelUnavailable`] when no oracle is loaded
    /// - [`ForecastError::DatasetUnavailable`] when no dataset is loaded
    /// - [`ForecastError::ForecastFailed`] when no point could be produced
    pub fn forecast(&self, input: ForecastInput) -> Result<ForecastRun> {
        let steps = input.steps.unwrap_or(self.config.default_steps);
        if steps > self.config.max_steps {
            return Err(ForecastError::InvalidParameter {
                name: "steps".to_string(),
                reason: format!("must be at most {}, got {}", self.config.max_steps, steps),
            });
        }

        self.require_model()?;
        let dataset = self.require_dataset()?;
        let last_date = dataset
            .last_date()
            .ok_or_else(|| ForecastError::DatasetUnavailable("dataset is empty".to_string()))?;
        let first_date = last_date
            .succ_opt()
            .ok_or_else(|| ForecastError::ForecastFailed("date out of range".to_string()))?;

        let region = self.resolve_region(input.region);
        let district = input.district;

        let mut history = if input.history.is_empty() {
            dataset
                .historical_sequence(
                    Some(region.as_str()),
                    district.as_deref(),
                    Some(last_date),
                    self.config.seed_window,
                )
                .0
        } else {
            input.history
        };
        if history.is_empty() {
            history = vec![0.0; HISTORY_WINDOW];
        }
        let history_points = history.len();

        tracing::info!(
            "Forecasting {} steps for {} from {} ({} history points)",
            steps,
            region,
            first_date,
            history_points
        );

        let start = ForecastStart {
            first_date,
            region: Some(region),
            district,
            history,
        };
        let forecast = Forecaster::new(self.predictor, self.config.seed_window).run(start, steps)?;

        if let Some(reason) = &forecast.halted {
            tracing::warn!(
                "Forecast returned {} of {} steps: {}",
                forecast.points.len(),
                steps,
                reason
            );
        }

        Ok(ForecastRun {
            forecast,
            history_points,
        })
    }

    fn resolve_region(&self, region: Option<String>) -> String {
        region.unwrap_or_else(|| self.config.default_region.clone())
    }

    fn require_model(&self) -> Result<()> {
        if self.predictor.is_available() {
            Ok(())
        } else {
            Err(ForecastError::ModelUnavailable("model not loaded".to_string()))
        }
    }

    fn require_dataset(&self) -> Result<&'a CaseDataset> {
        self.dataset
            .ok_or_else(|| ForecastError::DatasetUnavailable("dataset not loaded".to_string()))
    }
}
