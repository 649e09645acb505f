//! Shared utility functions for rainfall crates.

/// Date utility functions
pub mod dates {
    use anyhow::{anyhow, Context};
    use chrono::{Datelike, NaiveDate};

    /// Default date format of daily rainfall CSV rows: "YYYY-MM-DD"
    pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

    /// Parse a date string with the given chrono format
    pub fn parse_date(s: &str, format: &str) -> anyhow::Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), format)
            .with_context(|| format!("invalid date {:?} (expected {})", s.trim(), format))
    }

    /// Build a date from separate year, month and day fields
    pub fn date_from_parts(year: &str, month: &str, day: &str) -> anyhow::Result<NaiveDate> {
        let y: i32 = year
            .trim()
            .parse()
            .with_context(|| format!("invalid year {:?}", year.trim()))?;
        let m: u32 = month
            .trim()
            .parse()
            .with_context(|| format!("invalid month {:?}", month.trim()))?;
        let d: u32 = day
            .trim()
            .parse()
            .with_context(|| format!("invalid day {:?}", day.trim()))?;
        NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("no such date {y}-{m}-{d}"))
    }

    /// The (year, month) grouping key of a date
    pub fn year_month(date: &NaiveDate) -> (i32, u32) {
        (date.year(), date.month())
    }

    /// Format a month as "M/YYYY", e.g. "1/2024"
    pub fn month_year_label(year: i32, month: u32) -> String {
        format!("{month}/{year}")
    }

}

/// Source file name helpers
pub mod names {
    /// The last component of a path, treating both `/` and `\` as separators.
    ///
    /// Saved datasets are keyed by this name, so it must not depend on the
    /// platform the path came from.
    pub fn file_name(path: &str) -> &str {
        path.trim()
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
    }

}
