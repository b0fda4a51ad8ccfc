//! Per-date aggregated totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sum of all records sharing one reporting date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// Reporting date
    pub date: NaiveDate,
    /// Summed suspected cases
    pub suspected: f64,
    /// Summed confirmed cases
    pub confirmed: f64,
    /// Summed deaths
    pub deaths: f64,
}

impl DailyTotal {
    /// Create an empty total for a date.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            suspected: 0.0,
            confirmed: 0.0,
            deaths: 0.0,
        }
    }

    /// Add one record's counts.
    pub fn add(&mut self, record: &super::CaseRecord) {
        self.suspected += record.suspected_cases;
        self.confirmed += record.confirmed_cases;
        self.deaths += record.deaths;
    }
}
