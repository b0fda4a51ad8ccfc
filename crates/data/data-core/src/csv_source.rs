//! CSV-backed case source.
//!
//! Expected columns: `reporting_date`, `Region`, `District`, `sCh`
//! (suspected), `cCh` (confirmed), `deaths`, `CFR`. Only `reporting_date`
//! is required; missing numeric columns read as zero.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use data_spi::{coerce_count, coerce_number, CaseRecord, CaseSource, DataError, Result};

use crate::dates::parse_reporting_date;

const DATE_COLUMN: &str = "reporting_date";
const REGION_COLUMN: &str = "Region";
const DISTRICT_COLUMN: &str = "District";
const SUSPECTED_COLUMN: &str = "sCh";
const CONFIRMED_COLUMN: &str = "cCh";
const DEATHS_COLUMN: &str = "deaths";
const CFR_COLUMN: &str = "CFR";

/// Case source reading a surveillance CSV export from disk.
#[derive(Debug, Clone)]
pub struct CsvCaseSource {
    path: PathBuf,
}

impl CsvCaseSource {
    /// Create a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaseSource for CsvCaseSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Vec<CaseRecord>> {
        if !self.path.exists() {
            return Err(DataError::NotFound(self.path.display().to_string()));
        }

        tracing::info!("Loading dataset from: {}", self.path.display());
        let file = File::open(&self.path).map_err(|e| DataError::ReadFailed(e.to_string()))?;
        read_records(BufReader::new(file))
    }
}

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    region: Option<usize>,
    district: Option<usize>,
    suspected: Option<usize>,
    confirmed: Option<usize>,
    deaths: Option<usize>,
    cfr: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        Ok(Self {
            date: find(DATE_COLUMN).ok_or_else(|| DataError::MissingColumn(DATE_COLUMN.into()))?,
            region: find(REGION_COLUMN),
            district: find(DISTRICT_COLUMN),
            suspected: find(SUSPECTED_COLUMN),
            confirmed: find(CONFIRMED_COLUMN),
            deaths: find(DEATHS_COLUMN),
            cfr: find(CFR_COLUMN),
        })
    }
}

/// Read case records from any CSV reader.
///
/// Rows with an unparsable reporting date are dropped. Numeric cells that
/// do not parse are read as zero.
///
/// # Errors
///
/// Returns [`DataError::MissingColumn`] when there is no `reporting_date`
/// header and [`DataError::NoValidRecords`] when every row is dropped.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<CaseRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ReadFailed(e.to_string()))?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping unreadable CSV row: {}", e);
                dropped += 1;
                continue;
            }
        };

        let Some(date) = row.get(columns.date).and_then(parse_reporting_date) else {
            dropped += 1;
            continue;
        };

        let text = |idx: Option<usize>| idx.map(|i| row.get(i).unwrap_or_default().to_string());
        let number = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map_or(0.0, parse_number);

        records.push(CaseRecord {
            date,
            region: text(columns.region),
            district: text(columns.district),
            suspected_cases: coerce_count(number(columns.suspected)),
            confirmed_cases: coerce_number(number(columns.confirmed)),
            deaths: coerce_number(number(columns.deaths)),
            case_fatality_rate: coerce_number(number(columns.cfr)),
        });
    }

    if records.is_empty() {
        return Err(DataError::NoValidRecords);
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} rows without a valid reporting date", dropped);
    }

    Ok(records)
}

/// Lenient numeric parse; anything unreadable is zero.
fn parse_number(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(0.0)
}
