//! Historical surveillance record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single reporting-date record from the surveillance dataset.
///
/// `region` and `district` are `None` when the source has no such column;
/// an empty cell is kept as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Reporting date
    pub date: NaiveDate,
    /// Region name
    pub region: Option<String>,
    /// District name
    pub district: Option<String>,
    /// Suspected cases (finite, non-negative)
    pub suspected_cases: f64,
    /// Confirmed cases
    pub confirmed_cases: f64,
    /// Deaths
    pub deaths: f64,
    /// Case fatality rate
    pub case_fatality_rate: f64,
}

impl CaseRecord {
    /// Create a record with a region and suspected-case count only.
    pub fn new(date: NaiveDate, region: &str, suspected_cases: f64) -> Self {
        Self {
            date,
            region: Some(region.to_string()),
            district: None,
            suspected_cases: super::coerce_count(suspected_cases),
            confirmed_cases: 0.0,
            deaths: 0.0,
            case_fatality_rate: 0.0,
        }
    }

    /// Set the district.
    pub fn with_district(mut self, district: &str) -> Self {
        self.district = Some(district.to_string());
        self
    }

    /// Set confirmed cases and deaths.
    pub fn with_outcomes(mut self, confirmed_cases: f64, deaths: f64) -> Self {
        self.confirmed_cases = super::coerce_number(confirmed_cases);
        self.deaths = super::coerce_number(deaths);
        self
    }

    /// Set the case fatality rate.
    pub fn with_cfr(mut self, case_fatality_rate: f64) -> Self {
        self.case_fatality_rate = super::coerce_number(case_fatality_rate);
        self
    }
}
