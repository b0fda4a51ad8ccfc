//! Case source trait definition.

use crate::error::Result;
use crate::model::CaseRecord;

/// Trait for sources of historical case records.
///
/// A source performs the "load dataset" capability: it reads whatever
/// storage backs it and returns every valid record, already normalised
/// (parsed dates, coerced numeric fields) but in storage order.
pub trait CaseSource: Send + Sync {
    /// Data source name, used in log output.
    fn name(&self) -> &str;

    /// Load all valid records.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`](crate::DataError::NotFound) when the
    /// backing store is missing and [`DataError::NoValidRecords`](crate::DataError::NoValidRecords)
    /// when nothing survives parsing.
    fn load(&self) -> Result<Vec<CaseRecord>>;
}
