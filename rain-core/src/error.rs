/// Error types for the rainfall library
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rainfall operations
#[derive(Error, Debug)]
pub enum RainfallError {
    /// A daily row of the input could not be turned into a record
    #[error("Failed to parse row {row}: {reason}")]
    Parse { row: u64, reason: String },

    /// No saved dataset exists under the key
    #[error("No saved rainfall data for key {key:?}")]
    NotFound { key: String },

    /// A saved dataset exists but cannot be read back
    #[error("Saved rainfall data for key {key:?} is corrupt: {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Underlying file read/write failed
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Statistics that break the monthly summary invariants
    #[error("Invalid monthly summary: {0}")]
    Summary(#[from] SummaryError),

    /// Storage backend failure that is not a plain file error
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Violations of the MonthlySummary / RainfallDataset invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummaryError {
    #[error("month {0} is outside 1..=12")]
    Month(u32),

    #[error("{name} is not a finite number")]
    NotFinite { name: &'static str },

    #[error("minimum {0} is negative")]
    NegativeMinimum(f64),

    #[error("minimum {min} is greater than maximum {max}")]
    MinAboveMax { min: f64, max: f64 },

    #[error("maximum {max} is greater than total {total}")]
    MaxAboveTotal { max: f64, total: f64 },

    #[error("a monthly summary needs at least one day")]
    NoDays,

    #[error("month {month}/{year} appears more than once")]
    DuplicateMonth { year: i32, month: u32 },
}

impl RainfallError {
    pub fn parse(row: u64, reason: impl Into<String>) -> Self {
        RainfallError::Parse {
            row,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RainfallError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using RainfallError
pub type Result<T> = std::result::Result<T, RainfallError>;
