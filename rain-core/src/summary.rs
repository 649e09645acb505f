use crate::error::SummaryError;
use rain_utils::dates::month_year_label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum, maximum and total rainfall of every daily record in one month.
///
/// Fields are private so a constructed summary always satisfies
/// `0 <= min <= max <= total` and `days >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SummaryRow", into = "SummaryRow")]
pub struct MonthlySummary {
    year: i32,
    month: u32,
    min: f64,
    max: f64,
    total: f64,
    days: u32,
}

/// Unvalidated, flat form of a summary as it is written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub min: f64,
    pub max: f64,
    pub days: u32,
}

impl MonthlySummary {
    pub fn new(
        year: i32,
        month: u32,
        min: f64,
        max: f64,
        total: f64,
        days: u32,
    ) -> Result<Self, SummaryError> {
        if !(1..=12).contains(&month) {
            return Err(SummaryError::Month(month));
        }
        for (name, value) in [("min", min), ("max", max), ("total", total)] {
            if !value.is_finite() {
                return Err(SummaryError::NotFinite { name });
            }
        }
        if min < 0.0 {
            return Err(SummaryError::NegativeMinimum(min));
        }
        if min > max {
            return Err(SummaryError::MinAboveMax { min, max });
        }
        if max > total {
            return Err(SummaryError::MaxAboveTotal { max, total });
        }
        if days == 0 {
            return Err(SummaryError::NoDays);
        }
        Ok(Self {
            year,
            month,
            min,
            max,
            total,
            days,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of daily records reduced into this summary.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Ordering key: `(year, month)`.
    pub fn key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Chart category label, e.g. "1/2024".
    pub fn label(&self) -> String {
        month_year_label(self.year, self.month)
    }
}

impl fmt::Display for MonthlySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} had {} millimeters of rain",
            self.label(),
            self.total
        )
    }
}

impl TryFrom<SummaryRow> for MonthlySummary {
    type Error = SummaryError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        MonthlySummary::new(row.year, row.month, row.min, row.max, row.total, row.days)
    }
}

impl From<MonthlySummary> for SummaryRow {
    fn from(summary: MonthlySummary) -> Self {
        SummaryRow {
            year: summary.year,
            month: summary.month,
            total: summary.total,
            min: summary.min,
            max: summary.max,
            days: summary.days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_day_month() {
        let summary = MonthlySummary::new(2024, 2, 5.0, 5.0, 5.0, 1).unwrap();
        assert_eq!(summary.key(), (2024, 2));
        assert_eq!(summary.label(), "2/2024");
        assert_eq!(summary.to_string(), "2/2024 had 5 millimeters of rain");
    }

    #[test]
    fn rejects_broken_invariants() {
        assert_eq!(
            MonthlySummary::new(2024, 13, 0.0, 0.0, 0.0, 1),
            Err(SummaryError::Month(13))
        );
        assert_eq!(
            MonthlySummary::new(2024, 1, -1.0, 0.0, 0.0, 1),
            Err(SummaryError::NegativeMinimum(-1.0))
        );
        assert_eq!(
            MonthlySummary::new(2024, 1, 3.0, 2.0, 5.0, 2),
            Err(SummaryError::MinAboveMax { min: 3.0, max: 2.0 })
        );
        assert_eq!(
            MonthlySummary::new(2024, 1, 1.0, 9.0, 5.0, 2),
            Err(SummaryError::MaxAboveTotal {
                max: 9.0,
                total: 5.0
            })
        );
        assert_eq!(
            MonthlySummary::new(2024, 1, 0.0, 0.0, 0.0, 0),
            Err(SummaryError::NoDays)
        );
        assert_eq!(
            MonthlySummary::new(2024, 1, 0.0, f64::NAN, 0.0, 1),
            Err(SummaryError::NotFinite { name: "max" })
        );
    }

    #[test]
    fn deserializing_validates() {
        let ok = r#"{"year":2024,"month":1,"total":40.0,"min":10.0,"max":30.0,"days":2}"#;
        let summary: MonthlySummary = serde_json::from_str(ok).unwrap();
        assert_eq!(summary.total(), 40.0);
        assert_eq!(summary.days(), 2);

        let bad = r#"{"year":2024,"month":1,"total":20.0,"min":10.0,"max":30.0,"days":2}"#;
        assert!(serde_json::from_str::<MonthlySummary>(bad).is_err());
    }
}
