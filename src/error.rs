// Dataset loading errors
//
// Aggregation itself never fails: malformed records degrade to non-membership.
// Only getting bytes off disk and into serde can go wrong.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unsupported dataset format: {0} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
