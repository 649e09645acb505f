//! Core types for rainfall analysis: daily records, monthly summaries,
//! the dataset of one source file, and the monthly aggregator.

pub mod aggregator;
pub mod dataset;
pub mod error;
pub mod input_format;
pub mod record;
pub mod summary;

pub use aggregator::Aggregator;
pub use dataset::{RainfallDataset, NO_DATA_LABEL};
pub use error::{RainfallError, Result, SummaryError};
pub use input_format::{ColumnLayout, InputFormat};
pub use record::DailyRecord;
pub use summary::{MonthlySummary, SummaryRow};
