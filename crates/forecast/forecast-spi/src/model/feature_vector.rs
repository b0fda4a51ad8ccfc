//! Fixed-order feature vector consumed by the regression oracle

use serde::{Deserialize, Serialize};

/// Number of features the oracle consumes.
pub const FEATURE_COUNT: usize = 28;

/// Feature names in the exact order the oracle expects.
///
/// `lag_k` and `lag_daily_k` always carry the same value.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "year",
    "month",
    "quarter",
    "day_of_year",
    "duration_days",
    "deaths",
    "case_fatality_rate",
    "confidence_weight",
    "outbreak_flag",
    "lag_1",
    "lag_daily_1",
    "lag_2",
    "lag_daily_2",
    "lag_3",
    "lag_daily_3",
    "lag_6",
    "lag_daily_6",
    "lag_12",
    "lag_daily_12",
    "rolling_mean_3",
    "rolling_std_3",
    "rolling_mean_6",
    "rolling_std_6",
    "rolling_mean_12",
    "rolling_std_12",
    "cases_momentum",
    "district_encoded",
    "region_encoded",
];

/// One row of model input.
///
/// Every field is finite: non-finite inputs are replaced with 0.0 on
/// construction. The vector is never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values, zeroing anything non-finite.
    pub fn new(mut values: [f64; FEATURE_COUNT]) -> Self {
        for v in values.iter_mut() {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        Self(values)
    }

    /// Values in oracle order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of fields (always [`FEATURE_COUNT`]).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.0[idx])
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        self.as_slice()
    }
}
