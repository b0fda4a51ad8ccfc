//! Record filter for building daily series.

use chrono::NaiveDate;

use super::CaseRecord;

/// Region / district / end-date filter.
///
/// Empty strings are treated the same as `None`. A record whose source
/// has no region (or district) column passes the matching filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesFilter<'a> {
    /// Region to keep
    pub region: Option<&'a str>,
    /// District to keep
    pub district: Option<&'a str>,
    /// Inclusive upper bound on the reporting date
    pub end_date: Option<NaiveDate>,
}

impl<'a> SeriesFilter<'a> {
    /// Filter that keeps everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a region.
    pub fn region(mut self, region: Option<&'a str>) -> Self {
        self.region = region.filter(|r| !r.is_empty());
        self
    }

    /// Restrict to a district.
    pub fn district(mut self, district: Option<&'a str>) -> Self {
        self.district = district.filter(|d| !d.is_empty());
        self
    }

    /// Keep records dated on or before `end_date`.
    pub fn until(mut self, end_date: Option<NaiveDate>) -> Self {
        self.end_date = end_date;
        self
    }

    /// Check a record against the filter.
    pub fn matches(&self, record: &CaseRecord) -> bool {
        let region_ok = match (self.region, record.region.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };
        let district_ok = match (self.district, record.district.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };
        let date_ok = self.end_date.map_or(true, |end| record.date <= end);

        region_ok && district_ok && date_ok
    }
}
