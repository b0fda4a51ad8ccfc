//! Feature builder
//!
//! Turns a target date, a location and a trailing case history into the
//! 28-field [`FeatureVector`] the oracle was trained on. The function is
//! pure: the same inputs always give bit-identical output.

use chrono::{Datelike, NaiveDate};
use data_spi::left_pad;
use forecast_spi::FeatureVector;

use crate::stats::{mean, std_dev, tail};

/// History length the builder normalises to.
pub const HISTORY_WINDOW: usize = 30;

// Constant placeholders: deaths and CFR are unknown at prediction time.
const DURATION_DAYS: f64 = 1.0;
const DEATHS: f64 = 0.0;
const CASE_FATALITY_RATE: f64 = 0.0;
const CONFIDENCE_WEIGHT: f64 = 1.0;
const OUTBREAK_FLAG: f64 = 0.0;

/// Build the feature vector for one prediction.
///
/// `history` is truncated to its last [`HISTORY_WINDOW`] values or
/// left-padded with zeros up to that length before lags and rolling
/// statistics are taken.
pub fn build_features(
    target_date: NaiveDate,
    region: Option<&str>,
    district: Option<&str>,
    history: &[f64],
) -> FeatureVector {
    let hist = left_pad(history, HISTORY_WINDOW);

    let month = target_date.month();
    let quarter = (month - 1) / 3 + 1;

    let lag = |k: usize| lag_value(&hist, k);
    let (mean_3, std_3) = rolling(&hist, 3);
    let (mean_6, std_6) = rolling(&hist, 6);
    let (mean_12, std_12) = rolling(&hist, 12);

    FeatureVector::new([
        f64::from(target_date.year()),
        f64::from(month),
        f64::from(quarter),
        f64::from(target_date.ordinal()),
        DURATION_DAYS,
        DEATHS,
        CASE_FATALITY_RATE,
        CONFIDENCE_WEIGHT,
        OUTBREAK_FLAG,
        lag(1),
        lag(1),
        lag(2),
        lag(2),
        lag(3),
        lag(3),
        lag(6),
        lag(6),
        lag(12),
        lag(12),
        mean_3,
        std_3,
        mean_6,
        std_6,
        mean_12,
        std_12,
        momentum(&hist),
        presence(district),
        presence(region),
    ])
}

/// `history[-k]`, or 0.0 when the history is shorter than `k`.
fn lag_value(history: &[f64], k: usize) -> f64 {
    if k > 0 && history.len() >= k {
        history[history.len() - k]
    } else {
        0.0
    }
}

/// Mean and population std over the trailing `window` values.
fn rolling(history: &[f64], window: usize) -> (f64, f64) {
    let recent = tail(history, window);
    (mean(recent), std_dev(recent))
}

/// Day-over-day increase; declines report 0.0.
fn momentum(history: &[f64]) -> f64 {
    match history {
        [.., prev, last] if last >= prev => last - prev,
        _ => 0.0,
    }
}

fn presence(name: Option<&str>) -> f64 {
    match name {
        Some(n) if !n.is_empty() => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_spi::FEATURE_COUNT;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    // ==========================================================================
    // Calendar fields
    // ==========================================================================

    #[test]
    fn test_calendar_fields() {
        let fv = build_features(date(2024, 11, 15), Some("Central"), None, &[]);
        assert_eq!(fv.get("year"), Some(2024.0));
        assert_eq!(fv.get("month"), Some(11.0));
        assert_eq!(fv.get("quarter"), Some(4.0));
        assert_eq!(fv.get("day_of_year"), Some(320.0));
    }

    #[test]
    fn test_quarter_boundaries() {
        for (month, quarter) in [(1, 1.0), (3, 1.0), (4, 2.0), (6, 2.0), (7, 3.0), (9, 3.0), (10, 4.0), (12, 4.0)] {
            let fv = build_features(date(2023, month, 1), None, None, &[]);
            assert_eq!(fv.get("quarter"), Some(quarter), "month {}", month);
        }
    }

    #[test]
    fn test_constant_placeholders() {
        let fv = build_features(date(2024, 1, 1), Some("Central"), Some("Lilongwe"), &ramp(40));
        assert_eq!(fv.get("duration_days"), Some(1.0));
        assert_eq!(fv.get("deaths"), Some(0.0));
        assert_eq!(fv.get("case_fatality_rate"), Some(0.0));
        assert_eq!(fv.get("confidence_weight"), Some(1.0));
        assert_eq!(fv.get("outbreak_flag"), Some(0.0));
    }

    // ==========================================================================
    // Lags
    // ==========================================================================

    #[test]
    fn test_lags_from_long_history() {
        // Only the last 30 values matter.
        let history = ramp(45);
        let fv = build_features(date(2024, 1, 1), None, None, &history);
        assert_eq!(fv.get("lag_1"), Some(45.0));
        assert_eq!(fv.get("lag_2"), Some(44.0));
        assert_eq!(fv.get("lag_3"), Some(43.0));
        assert_eq!(fv.get("lag_6"), Some(40.0));
        assert_eq!(fv.get("lag_12"), Some(34.0));
    }

    #[test]
    fn test_lag_pairs_are_identical() {
        for history in [vec![], ramp(2), ramp(7), ramp(30), ramp(61)] {
            let fv = build_features(date(2024, 6, 1), None, None, &history);
            for k in [1, 2, 3, 6, 12] {
                assert_eq!(
                    fv.get(&format!("lag_{}", k)),
                    fv.get(&format!("lag_daily_{}", k)),
                    "k = {}, history len = {}",
                    k,
                    history.len()
                );
            }
        }
    }

    #[test]
    fn test_short_history_is_left_padded() {
        // [5, 8] padded to 30 -> lag_1 = 8, lag_2 = 5, lag_3 and beyond hit padding.
        let fv = build_features(date(2024, 1, 1), None, None, &[5.0, 8.0]);
        assert_eq!(fv.get("lag_1"), Some(8.0));
        assert_eq!(fv.get("lag_2"), Some(5.0));
        assert_eq!(fv.get("lag_3"), Some(0.0));
        assert_eq!(fv.get("lag_12"), Some(0.0));
        // The rolling-3 window sees the padding zero.
        assert_eq!(fv.get("rolling_mean_3"), Some(13.0 / 3.0));
    }

    #[test]
    fn test_padding_matches_explicit_zeros() {
        let short = [3.0, 1.0, 4.0];
        let mut padded = vec![0.0; HISTORY_WINDOW - short.len()];
        padded.extend_from_slice(&short);

        assert_eq!(
            build_features(date(2024, 2, 2), Some("A"), None, &short),
            build_features(date(2024, 2, 2), Some("A"), None, &padded)
        );
    }

    // ==========================================================================
    // Rolling statistics
    // ==========================================================================

    #[test]
    fn test_rolling_statistics() {
        let fv = build_features(date(2024, 1, 1), None, None, &ramp(30));
        assert_eq!(fv.get("rolling_mean_3"), Some(29.0));
        assert!((fv.get("rolling_std_3").unwrap() - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(fv.get("rolling_mean_6"), Some(27.5));
        assert_eq!(fv.get("rolling_mean_12"), Some(24.5));
        // Population std of 12 consecutive integers: sqrt((12^2 - 1) / 12)
        let expected = ((144.0f64 - 1.0) / 12.0).sqrt();
        assert!((fv.get("rolling_std_12").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_flat_history_has_zero_std() {
        let fv = build_features(date(2024, 1, 1), None, None, &[10.0; 30]);
        assert_eq!(fv.get("rolling_std_3"), Some(0.0));
        assert_eq!(fv.get("rolling_std_6"), Some(0.0));
        assert_eq!(fv.get("rolling_std_12"), Some(0.0));
        assert_eq!(fv.get("rolling_mean_12"), Some(10.0));
    }

    // ==========================================================================
    // Momentum and location flags
    // ==========================================================================

    #[test]
    fn test_momentum_rising() {
        let fv = build_features(date(2024, 1, 1), None, None, &[4.0, 9.0]);
        assert_eq!(fv.get("cases_momentum"), Some(5.0));
    }

    #[test]
    fn test_momentum_never_negative() {
        for history in [vec![9.0, 4.0], vec![100.0, 0.0], vec![3.0, 3.0], vec![1.0], vec![]] {
            let fv = build_features(date(2024, 1, 1), None, None, &history);
            assert!(fv.get("cases_momentum").unwrap() >= 0.0);
        }
        let fv = build_features(date(2024, 1, 1), None, None, &[9.0, 4.0]);
        assert_eq!(fv.get("cases_momentum"), Some(0.0));
    }

    #[test]
    fn test_presence_flags() {
        let both = build_features(date(2024, 1, 1), Some("Southern"), Some("Nsanje"), &[]);
        assert_eq!(both.get("region_encoded"), Some(1.0));
        assert_eq!(both.get("district_encoded"), Some(1.0));

        let none = build_features(date(2024, 1, 1), Some(""), None, &[]);
        assert_eq!(none.get("region_encoded"), Some(0.0));
        assert_eq!(none.get("district_encoded"), Some(0.0));
    }

    // ==========================================================================
    // Shape and sanitisation
    // ==========================================================================

    #[test]
    fn test_vector_length_is_always_28() {
        for n in [0, 1, 12, 29, 30, 31, 60, 200] {
            let fv = build_features(date(2024, 1, 1), Some("Central"), None, &ramp(n));
            assert_eq!(fv.len(), FEATURE_COUNT);
        }
    }

    #[test]
    fn test_non_finite_history_is_zeroed() {
        let history = [1.0, f64::INFINITY, 2.0];
        let fv = build_features(date(2024, 1, 1), None, None, &history);
        assert!(fv.as_slice().iter().all(|v| v.is_finite()));
        assert_eq!(fv.get("lag_2"), Some(0.0));
    }

    #[test]
    fn test_deterministic() {
        let history = ramp(17);
        let a = build_features(date(2024, 3, 9), Some("Northern"), Some("Karonga"), &history);
        let b = build_features(date(2024, 3, 9), Some("Northern"), Some("Karonga"), &history);
        assert_eq!(a, b);
    }
}
