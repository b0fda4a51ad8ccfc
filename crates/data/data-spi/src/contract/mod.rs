//! Contract module containing trait definitions for case data sources

mod case_source;

pub use case_source::CaseSource;
