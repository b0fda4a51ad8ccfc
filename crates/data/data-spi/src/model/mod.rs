//! Data models for historical case data.

mod daily;
mod filter;
mod record;
mod utils;

pub use daily::DailyTotal;
pub use filter::SeriesFilter;
pub use record::CaseRecord;
pub use utils::{coerce_count, coerce_number, left_pad, suspected_counts};
