//! Error types
//!
//! Run-level errors abort (or skip) a whole file; entry-level errors only
//! drop the one food entry they were raised for.

use std::path::PathBuf;

use thiserror::Error;

/// Run-level error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported FDC schema in {}: {reason}", .path.display())]
    UnsupportedSchema { path: PathBuf, reason: String },

    #[error("No supported FDC data set among {0} input file(s)")]
    NoSupportedInput(usize),

    #[error("Malformed alt-names file {}: {reason}", .path.display())]
    AltNameFormat { path: PathBuf, reason: String },

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Per-entry error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("entry has no integer fdcId")]
    MissingFdcId,

    #[error("food {fdc_id} has no description")]
    MissingDescription { fdc_id: i64 },
}

impl EntryError {
    /// The FDC id of the failing entry, when it could be read
    pub fn fdc_id(&self) -> Option<i64> {
        match self {
            EntryError::MissingDescription { fdc_id } => Some(*fdc_id),
            EntryError::NotAnObject | EntryError::MissingFdcId => None,
        }
    }
}
