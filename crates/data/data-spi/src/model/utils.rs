//! Utility functions for case counts and history windows.

use super::DailyTotal;

/// Coerce a count to a finite, non-negative number (anything else becomes 0).
pub fn coerce_count(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerce a value to a finite number (non-finite becomes 0).
pub fn coerce_number(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Keep the last `length` values, left-padding with zeros when shorter.
///
/// The result always has exactly `length` elements.
pub fn left_pad(values: &[f64], length: usize) -> Vec<f64> {
    let tail = &values[values.len().saturating_sub(length)..];
    let mut padded = vec![0.0; length - tail.len()];
    padded.extend_from_slice(tail);
    padded
}

/// Extract suspected-case counts from daily totals.
pub fn suspected_counts(totals: &[DailyTotal]) -> Vec<f64> {
    totals.iter().map(|t| coerce_count(t.suspected)).collect()
}
