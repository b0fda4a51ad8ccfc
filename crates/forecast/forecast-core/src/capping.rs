//! Output capping policy
//!
//! The oracle occasionally emits outlier magnitudes. When at least a week
//! of history is available the raw prediction is clamped relative to a
//! baseline derived from the last seven values.

use crate::stats::{max, mean, median, tail};

/// Minimum history length before capping applies.
pub const CAP_WINDOW: usize = 7;

/// Which clamp fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapRule {
    /// Prediction above 2x baseline, reduced to 1.2x baseline
    AboveDoubleBaseline,
    /// Prediction above 1.5x baseline, reduced to 1.1x baseline
    AboveHalfAgainBaseline,
    /// Baseline was zero; prediction above 2x the 7-day mean, reduced to 1.2x mean
    AboveDoubleAverage,
}

/// Result of applying the policy to one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapOutcome {
    /// Value after capping
    pub value: f64,
    /// Value before capping
    pub original: f64,
    /// Baseline used, when enough history was available
    pub baseline: Option<f64>,
    /// Clamp that fired, if any
    pub rule: Option<CapRule>,
}

impl CapOutcome {
    fn unchanged(value: f64, baseline: Option<f64>) -> Self {
        Self {
            value,
            original: value,
            baseline,
            rule: None,
        }
    }

    /// Whether the prediction was reduced.
    pub fn was_capped(&self) -> bool {
        self.rule.is_some()
    }
}

/// Apply the capping policy to an already-sanitised prediction.
pub fn apply_cap(prediction: f64, history: &[f64]) -> CapOutcome {
    if history.len() < CAP_WINDOW {
        return CapOutcome::unchanged(prediction, None);
    }

    let recent = tail(history, CAP_WINDOW);
    let avg7 = mean(recent);
    let max7 = max(recent);
    let median7 = median(recent);

    let baseline = if max7 > 0.0 {
        median7.max(max7 * 0.8)
    } else {
        avg7
    };

    let capped = |value: f64, rule: CapRule| CapOutcome {
        value,
        original: prediction,
        baseline: Some(baseline),
        rule: Some(rule),
    };

    if baseline > 0.0 {
        if prediction > baseline * 2.0 {
            return capped(baseline * 1.2, CapRule::AboveDoubleBaseline);
        }
        if prediction > baseline * 1.5 {
            return capped(baseline * 1.1, CapRule::AboveHalfAgainBaseline);
        }
    } else if avg7 > 0.0 && prediction > avg7 * 2.0 {
        return capped(avg7 * 1.2, CapRule::AboveDoubleAverage);
    }

    CapOutcome::unchanged(prediction, Some(baseline))
}
