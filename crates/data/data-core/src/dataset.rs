//! In-memory surveillance dataset.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use data_spi::{
    left_pad, suspected_counts, CaseRecord, CaseSource, DailyTotal, DataError, Result,
    SeriesFilter,
};

/// Historical records sorted ascending by reporting date.
#[derive(Debug, Clone, Default)]
pub struct CaseDataset {
    records: Vec<CaseRecord>,
}

impl CaseDataset {
    /// Build a dataset from records in any order.
    pub fn from_records(mut records: Vec<CaseRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Load every record from a source.
    ///
    /// # Errors
    ///
    /// Propagates the source error, or [`DataError::NoValidRecords`] when the
    /// source returns nothing.
    pub fn load(source: &dyn CaseSource) -> Result<Self> {
        let records = source.load()?;
        if records.is_empty() {
            return Err(DataError::NoValidRecords);
        }

        let dataset = Self::from_records(records);
        if let (Some(first), Some(last)) = (dataset.first_date(), dataset.last_date()) {
            tracing::info!(
                "Dataset loaded from {}: {} records from {} to {}",
                source.name(),
                dataset.len(),
                first,
                last
            );
        }
        Ok(dataset)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Earliest reporting date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    /// Latest reporting date across the whole dataset.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Distinct region names, sorted.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.region.clone())
            .filter(|r| !r.is_empty())
            .collect();
        regions.sort();
        regions.dedup();
        regions
    }

    /// Distinct district names within a region (all regions when `None`), sorted.
    pub fn districts(&self, region: Option<&str>) -> Vec<String> {
        let filter = SeriesFilter::all().region(region);
        let mut districts: Vec<String> = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .filter_map(|r| r.district.clone())
            .filter(|d| !d.is_empty())
            .collect();
        districts.sort();
        districts.dedup();
        districts
    }

    /// Per-date totals of the records passing `filter`, oldest first.
    ///
    /// Only dates that have at least one record appear; gaps are not filled.
    pub fn daily_totals(&self, filter: &SeriesFilter<'_>) -> Vec<DailyTotal> {
        let mut by_date: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
        for record in self.records.iter().filter(|r| filter.matches(r)) {
            by_date
                .entry(record.date)
                .or_insert_with(|| DailyTotal::empty(record.date))
                .add(record);
        }
        by_date.into_values().collect()
    }

    /// Trailing suspected-case window for a region / district up to `end_date`.
    ///
    /// Returns exactly `length` values (left-padded with zeros when fewer
    /// dates are available) and the latest date of the filtered records.
    pub fn historical_sequence(
        &self,
        region: Option<&str>,
        district: Option<&str>,
        end_date: Option<NaiveDate>,
        length: usize,
    ) -> (Vec<f64>, Option<NaiveDate>) {
        let filter = SeriesFilter::all()
            .region(region)
            .district(district)
            .until(end_date);
        let totals = self.daily_totals(&filter);
        let last_date = totals.last().map(|t| t.date);

        let recent = &totals[totals.len().saturating_sub(length)..];
        (left_pad(&suspected_counts(recent), length), last_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> CaseDataset {
        CaseDataset::from_records(vec![
            CaseRecord::new(date(2024, 1, 3), "Central", 5.0).with_district("Lilongwe"),
            CaseRecord::new(date(2024, 1, 1), "Central", 2.0).with_district("Lilongwe"),
            CaseRecord::new(date(2024, 1, 1), "Central", 1.0).with_district("Dedza"),
            CaseRecord::new(date(2024, 1, 2), "Southern", 7.0).with_district("Nsanje"),
            CaseRecord::new(date(2024, 1, 4), "Southern", 4.0).with_district("Nsanje"),
        ])
    }

    #[test]
    fn test_records_are_sorted() {
        let dataset = sample();
        let dates: Vec<_> = dataset.records().iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dataset.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(dataset.last_date(), Some(date(2024, 1, 4)));
    }

    #[test]
    fn test_daily_totals_sum_same_date() {
        let totals = sample().daily_totals(&SeriesFilter::all().region(Some("Central")));
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, date(2024, 1, 1));
        assert_eq!(totals[0].suspected, 3.0);
        assert_eq!(totals[1].suspected, 5.0);
    }

    #[test]
    fn test_historical_sequence_pads() {
        let (seq, last) = sample().historical_sequence(Some("Central"), None, None, 5);
        assert_eq!(seq, vec![0.0, 0.0, 0.0, 3.0, 5.0]);
        assert_eq!(last, Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_historical_sequence_truncates() {
        let (seq, last) = sample().historical_sequence(None, None, None, 2);
        assert_eq!(seq, vec![5.0, 4.0]);
        assert_eq!(last, Some(date(2024, 1, 4)));
    }

    #[test]
    fn test_historical_sequence_end_date() {
        let (seq, last) = sample().historical_sequence(None, None, Some(date(2024, 1, 2)), 3);
        assert_eq!(seq, vec![0.0, 3.0, 7.0]);
        assert_eq!(last, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_historical_sequence_district() {
        let (seq, _) = sample().historical_sequence(Some("Central"), Some("Dedza"), None, 2);
        assert_eq!(seq, vec![0.0, 1.0]);
    }

    #[test]
    fn test_historical_sequence_no_match() {
        let (seq, last) = sample().historical_sequence(Some("Northern"), None, None, 4);
        assert_eq!(seq, vec![0.0; 4]);
        assert_eq!(last, None);
    }

    #[test]
    fn test_regions_and_districts() {
        let dataset = sample();
        assert_eq!(dataset.regions(), vec!["Central", "Southern"]);
        assert_eq!(dataset.districts(Some("Central")), vec!["Dedza", "Lilongwe"]);
        assert_eq!(dataset.districts(None).len(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = CaseDataset::default();
        assert!(dataset.is_empty());
        assert_eq!(dataset.last_date(), None);
        let (seq, last) = dataset.historical_sequence(None, None, None, 3);
        assert_eq!(seq, vec![0.0; 3]);
        assert_eq!(last, None);
    }
}
