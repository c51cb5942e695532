//! Inputs for the benchmark suites: the CSV backing store the cache suite reads
//! through, random collection elements, and key distributions.

pub mod csv_repo;
pub mod test_object;
pub mod workload;

pub use csv_repo::CsvRepo;
pub use test_object::TestObject;
pub use workload::{KeyDistribution, KeyGenerator};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("element not found: {0}")]
    KeyNotFound(u32),

    #[error("invalid key '{value}' on line {line}")]
    InvalidKey { line: u64, value: String },

    #[error("row {line} has no value column")]
    MalformedRow { line: u64 },

    #[error("data set size must be at least 1")]
    EmptyDataSet,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
