//! Iterative multi-step forecast
//!
//! Each step builds features from the rolling history, predicts one value,
//! appends it to the history and advances the date by one day. The loop
//! stops early, keeping what it already produced, when a prediction fails.

use chrono::NaiveDate;
use forecast_spi::{Forecast, ForecastError, ForecastPoint, Result};

use crate::features::build_features;
use crate::predictor::Predictor;

/// Starting state of a forecast run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastStart {
    /// Date of the first predicted point
    pub first_date: NaiveDate,
    /// Region the series belongs to
    pub region: Option<String>,
    /// District the series belongs to
    pub district: Option<String>,
    /// Seed history, oldest first
    pub history: Vec<f64>,
}

/// Single-use iterator over forecast points.
///
/// Yields at most `steps` points. After it returns `None`,
/// [`ForecastSteps::halted`] tells whether the run ended early.
pub struct ForecastSteps<'a> {
    predictor: Predictor<'a>,
    region: Option<String>,
    district: Option<String>,
    history: Vec<f64>,
    max_history: usize,
    date: Option<NaiveDate>,
    step: usize,
    steps: usize,
    halted: Option<ForecastError>,
}

impl<'a> ForecastSteps<'a> {
    /// Why the run stopped before producing every requested step.
    pub fn halted(&self) -> Option<&ForecastError> {
        self.halted.as_ref()
    }

    /// Current rolling history, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    fn halt(&mut self, error: ForecastError) -> Option<ForecastPoint> {
        tracing::warn!("Forecast halted at step {}: {}", self.step + 1, error);
        self.halted = Some(error);
        None
    }
}

impl Iterator for ForecastSteps<'_> {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<ForecastPoint> {
        if self.halted.is_some() || self.step >= self.steps {
            return None;
        }

        let Some(date) = self.date else {
            return self.halt(ForecastError::ForecastFailed(
                "date out of range".to_string(),
            ));
        };

        let features = build_features(
            date,
            self.region.as_deref(),
            self.district.as_deref(),
            &self.history,
        );

        let predicted = match self.predictor.predict(&features, &self.history) {
            Ok(value) => value,
            Err(e) => return self.halt(e),
        };

        self.history.push(predicted);
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }

        self.step += 1;
        self.date = date.succ_opt();
        tracing::debug!("Step {}: {} -> {:.2}", self.step, date, predicted);

        Some(ForecastPoint {
            date,
            predicted,
            step: self.step,
        })
    }
}

/// Drives [`ForecastSteps`] for a predictor.
#[derive(Debug, Clone, Copy)]
pub struct Forecaster<'a> {
    predictor: Predictor<'a>,
    max_history: usize,
}

impl<'a> Forecaster<'a> {
    /// Create a forecaster that keeps at most `max_history` values.
    pub fn new(predictor: Predictor<'a>, max_history: usize) -> Self {
        Self {
            predictor,
            max_history: max_history.max(1),
        }
    }

    /// Lazily produce up to `steps` points from `start`.
    pub fn steps(&self, start: ForecastStart, steps: usize) -> ForecastSteps<'a> {
        let mut history = start.history;
        if history.len() > self.max_history {
            history.drain(..history.len() - self.max_history);
        }

        ForecastSteps {
            predictor: self.predictor,
            region: start.region,
            district: start.district,
            history,
            max_history: self.max_history,
            date: Some(start.first_date),
            step: 0,
            steps,
            halted: None,
        }
    }

    /// Run the loop to completion.
    ///
    /// # Errors
    ///
    /// [`ForecastError::ForecastFailed`] when not a single point was
    /// produced, including `steps == 0`.
    pub fn run(&self, start: ForecastStart, steps: usize) -> Result<Forecast> {
        let mut iter = self.steps(start, steps);
        let points: Vec<ForecastPoint> = iter.by_ref().collect();

        if points.is_empty() {
            let reason = match iter.halted() {
                Some(e) => e.to_string(),
                None => "no steps requested".to_string(),
            };
            return Err(ForecastError::ForecastFailed(reason));
        }

        Ok(Forecast {
            points,
            requested_steps: steps,
            halted: iter.halted().map(|e| e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_spi::Regressor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns `lag_1 + 1` so every step is a predictable function of the last.
    struct Increment;

    impl Regressor for Increment {
        fn predict(&self, features: &[f64]) -> Result<f64> {
            Ok(features[9] + 1.0)
        }

        fn model_type(&self) -> &str {
            "Increment"
        }
    }

    /// Succeeds `limit` times, then fails.
    struct FailAfter {
        calls: AtomicUsize,
        limit: usize,
    }

    impl FailAfter {
        fn new(limit: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                limit,
            }
        }
    }

    impl Regressor for FailAfter {
        fn predict(&self, _features: &[f64]) -> Result<f64> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= self.limit {
                return Err(ForecastError::Oracle("backend gone".to_string()));
            }
            Ok(2.0)
        }

        fn model_type(&self) -> &str {
            "FailAfter"
        }
    }

    fn start(history: Vec<f64>) -> ForecastStart {
        ForecastStart {
            first_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            region: Some("Central".to_string()),
            district: None,
            history,
        }
    }

    #[test]
    fn test_dates_and_steps_advance() {
        let oracle = Increment;
        let forecast = Forecaster::new(Predictor::new(&oracle), 60)
            .run(start(vec![]), 5)
            .unwrap();

        let dates: Vec<String> = forecast.points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-11", "2024-01-12", "2024-01-13", "2024-01-14", "2024-01-15"]
        );
        let steps: Vec<usize> = forecast.points.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5]);
        assert!(!forecast.is_partial());
        assert_eq!(forecast.halted, None);
    }

    #[test]
    fn test_predictions_feed_back_into_history() {
        let oracle = Increment;
        let forecast = Forecaster::new(Predictor::new(&oracle), 60)
            .run(start(vec![3.0]), 4)
            .unwrap();
        assert_eq!(forecast.values(), vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_history_is_bounded() {
        let oracle = Increment;
        let forecaster = Forecaster::new(Predictor::new(&oracle), 60);
        let mut iter = forecaster.steps(start(vec![1.0; 80]), 10);
        assert_eq!(iter.history().len(), 60);
        for _ in iter.by_ref() {}
        assert_eq!(iter.history().len(), 60);
        assert!(iter.halted().is_none());
    }

    #[test]
    fn test_partial_forecast_on_oracle_failure() {
        let oracle = FailAfter::new(3);
        let forecast = Forecaster::new(Predictor::new(&oracle), 60)
            .run(start(vec![]), 10)
            .unwrap();
        assert_eq!(forecast.points.len(), 3);
        assert_eq!(forecast.requested_steps, 10);
        assert!(forecast.is_partial());
        assert!(forecast.halted.unwrap().contains("backend gone"));
    }

    #[test]
    fn test_iterator_records_halt_reason() {
        let oracle = FailAfter::new(1);
        let forecaster = Forecaster::new(Predictor::new(&oracle), 60);
        let mut iter = forecaster.steps(start(vec![]), 3);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(matches!(iter.halted(), Some(ForecastError::Oracle(_))));
        // Stays exhausted.
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_zero_points_is_failure() {
        let oracle = FailAfter::new(0);
        let result = Forecaster::new(Predictor::new(&oracle), 60).run(start(vec![]), 5);
        assert!(matches!(result, Err(ForecastError::ForecastFailed(_))));

        let result = Forecaster::new(Predictor::unavailable(), 60).run(start(vec![]), 5);
        assert!(matches!(result, Err(ForecastError::ForecastFailed(_))));
    }

    #[test]
    fn test_zero_steps_is_failure() {
        let oracle = Increment;
        let result = Forecaster::new(Predictor::new(&oracle), 60).run(start(vec![1.0]), 0);
        assert!(matches!(result, Err(ForecastError::ForecastFailed(_))));
    }

    #[test]
    fn test_predictions_are_non_negative() {
        struct Negative;
        impl Regressor for Negative {
            fn predict(&self, _features: &[f64]) -> Result<f64> {
                Ok(-4.0)
            }
            fn model_type(&self) -> &str {
                "Negative"
            }
        }

        let forecast = Forecaster::new(Predictor::new(&Negative), 60)
            .run(start(vec![]), 3)
            .unwrap();
        assert!(forecast.values().iter().all(|v| *v == 0.0));
    }
}
