use crate::error::SummaryError;
use crate::summary::MonthlySummary;
use serde::Serialize;

/// Date-range label of a dataset with no monthly summaries.
pub const NO_DATA_LABEL: &str = "No data loaded";

/// The monthly summaries of one rainfall file.
///
/// Summaries are strictly ascending by `(year, month)`. A dataset is never
/// edited after construction; loading another file builds a new one.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RainfallDataset {
    source_name: Option<String>,
    summaries: Vec<MonthlySummary>,
}

impl RainfallDataset {
    /// Sorts the summaries and rejects a month that occurs twice.
    pub fn new(
        source_name: Option<String>,
        mut summaries: Vec<MonthlySummary>,
    ) -> Result<Self, SummaryError> {
        summaries.sort_by_key(|summary| summary.key());
        if let Some(pair) = summaries.windows(2).find(|w| w[0].key() == w[1].key()) {
            return Err(SummaryError::DuplicateMonth {
                year: pair[0].year(),
                month: pair[0].month(),
            });
        }
        Ok(Self {
            source_name,
            summaries,
        })
    }

    /// Dataset of a session where nothing has been loaded yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn summaries(&self) -> &[MonthlySummary] {
        &self.summaries
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Number of months with data.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// "M/YYYY - M/YYYY" from the first to the last month, or [`NO_DATA_LABEL`].
    pub fn date_range_label(&self) -> String {
        match (self.summaries.first(), self.summaries.last()) {
            (Some(first), Some(last)) => format!("{} - {}", first.label(), last.label()),
            _ => NO_DATA_LABEL.to_string(),
        }
    }

    /// Sum of every monthly total.
    pub fn total_rainfall(&self) -> f64 {
        self.summaries.iter().map(|s| s.total()).sum()
    }

    /// Number of daily records behind all summaries.
    pub fn record_count(&self) -> u64 {
        self.summaries.iter().map(|s| u64::from(s.days())).sum()
    }
}
