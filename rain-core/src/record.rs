use crate::error::{RainfallError, Result};
use crate::input_format::{ColumnLayout, InputFormat};
use chrono::NaiveDate;
use csv::StringRecord;
use rain_utils::dates;

/// One dated rainfall measurement in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub amount: f64,
}

impl DailyRecord {
    /// Build a record, rejecting negative and non-finite amounts.
    pub fn new(date: NaiveDate, amount: f64) -> std::result::Result<Self, String> {
        if !amount.is_finite() {
            return Err(format!("rainfall amount {amount} is not a finite number"));
        }
        if amount < 0.0 {
            return Err(format!("rainfall amount {amount} is negative"));
        }
        Ok(Self { date, amount })
    }

    /// The (year, month) this record is grouped under.
    pub fn year_month(&self) -> (i32, u32) {
        dates::year_month(&self.date)
    }

    /// Convert one CSV row into a record. `row` is the 1-based line number
    /// reported in errors.
    pub fn from_string_record(
        record: &StringRecord,
        format: &InputFormat,
        row: u64,
    ) -> Result<Self> {
        let required = format.layout.required_columns();
        if record.len() < required {
            return Err(RainfallError::parse(
                row,
                format!("expected at least {required} columns, found {}", record.len()),
            ));
        }
        // Length checked above, every index below is in range.
        let field = |i: usize| record.get(i).unwrap_or("");

        let (date, amount) = match format.layout {
            ColumnLayout::Date { date, amount } => (
                dates::parse_date(field(date), &format.date_format),
                field(amount),
            ),
            ColumnLayout::SplitDate {
                year,
                month,
                day,
                amount,
            } => (
                dates::date_from_parts(field(year), field(month), field(day)),
                field(amount),
            ),
        };
        let date = date.map_err(|e| RainfallError::parse(row, format!("{e:#}")))?;

        let amount = amount.trim();
        let value: f64 = amount.parse().map_err(|_| {
            RainfallError::parse(row, format!("rainfall amount {amount:?} is not a number"))
        })?;
        DailyRecord::new(date, value).map_err(|reason| RainfallError::parse(row, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parses_date_layout() {
        let format = InputFormat::default();
        let record =
            DailyRecord::from_string_record(&row(&["2024-01-05", " 10.5 ", "extra"]), &format, 2)
                .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(record.amount, 10.5);
        assert_eq!(record.year_month(), (2024, 1));
    }

    #[test]
    fn parses_bom_layout() {
        let format = InputFormat::bom();
        let fields = ["IDCJAC0009", "031205", "2019", "02", "17", "0.6", "1", "N"];
        let record = DailyRecord::from_string_record(&row(&fields), &format, 7).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2019, 2, 17).unwrap());
        assert_eq!(record.amount, 0.6);
    }

    #[test]
    fn rejects_malformed_rows() {
        let format = InputFormat::default();
        let cases: &[&[&str]] = &[
            &["2024-01-05"],
            &["2024-01-05", "-5"],
            &["2024-01-05", "abc"],
            &["2024-01-05", ""],
            &["2024-01-05", "NaN"],
            &["2024-01-05", "inf"],
            &["not a date", "1.0"],
            &["2024-02-30", "1.0"],
        ];
        for fields in cases {
            let err = DailyRecord::from_string_record(&row(fields), &format, 4).unwrap_err();
            match err {
                RainfallError::Parse { row, .. } => assert_eq!(row, 4, "{fields:?}"),
                other => panic!("unexpected error {other:?} for {fields:?}"),
            }
        }
    }

    #[test]
    fn zero_rainfall_is_valid() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(DailyRecord::new(date, 0.0).is_ok());
        assert!(DailyRecord::new(date, -0.1).is_err());
    }
}
