//! Reduce daily rainfall rows into per-month minimum, maximum and total.
//!
//! A malformed row fails the whole import; no partial dataset is returned.

use crate::dataset::RainfallDataset;
use crate::error::{RainfallError, Result};
use crate::input_format::InputFormat;
use crate::record::DailyRecord;
use crate::summary::MonthlySummary;
use csv::ReaderBuilder;
use log::{debug, info};
use rain_utils::names;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Running statistics of one (year, month) group.
#[derive(Debug, Clone, Copy)]
struct MonthAccumulator {
    min: f64,
    max: f64,
    total: f64,
    days: u32,
}

impl MonthAccumulator {
    fn new(amount: f64) -> Self {
        Self {
            min: amount,
            max: amount,
            total: amount,
            days: 1,
        }
    }

    fn push(&mut self, amount: f64) {
        self.min = self.min.min(amount);
        self.max = self.max.max(amount);
        self.total += amount;
        self.days += 1;
    }
}

/// Parses daily rainfall files of one [`InputFormat`] into datasets.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    format: InputFormat,
}

impl Aggregator {
    pub fn new(format: InputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &InputFormat {
        &self.format
    }

    /// Group records by (year, month) and reduce every group.
    ///
    /// Output is ascending by (year, month) whatever the input order. Errors
    /// name the 1-based position of the offending record.
    pub fn aggregate_records<I>(&self, source_name: Option<String>, records: I) -> Result<RainfallDataset>
    where
        I: IntoIterator<Item = DailyRecord>,
    {
        let numbered = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| (index as u64 + 1, record));
        self.reduce(source_name, numbered)
    }

    fn reduce<I>(&self, source_name: Option<String>, records: I) -> Result<RainfallDataset>
    where
        I: IntoIterator<Item = (u64, DailyRecord)>,
    {
        let mut months: BTreeMap<(i32, u32), MonthAccumulator> = BTreeMap::new();
        let mut count = 0u64;
        for (row, record) in records {
            let acc = months
                .entry(record.year_month())
                .and_modify(|acc| acc.push(record.amount))
                .or_insert_with(|| MonthAccumulator::new(record.amount));
            if !acc.total.is_finite() {
                let (year, month) = record.year_month();
                return Err(RainfallError::parse(
                    row,
                    format!("total rainfall of {month}/{year} overflows"),
                ));
            }
            count += 1;
        }

        let summaries = months
            .into_iter()
            .map(|((year, month), acc)| {
                debug!(
                    "aggregate: {month}/{year} days={} min={} max={} total={}",
                    acc.days, acc.min, acc.max, acc.total
                );
                MonthlySummary::new(year, month, acc.min, acc.max, acc.total, acc.days)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(
            "aggregate: reduced {} records into {} months from {}",
            count,
            summaries.len(),
            source_name.as_deref().unwrap_or("<unnamed>")
        );
        Ok(RainfallDataset::new(source_name, summaries)?)
    }

    /// Parse every row of `reader`, failing on the first malformed one.
    pub fn aggregate_reader<R: Read>(&self, source_name: &str, reader: R) -> Result<RainfallDataset> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.format.delimiter)
            .has_headers(self.format.has_headers)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let string_record = result.map_err(|e| csv_error(e, source_name))?;
            let row = string_record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);
            let record = DailyRecord::from_string_record(&string_record, &self.format, row)?;
            records.push((row, record));
        }
        self.reduce(Some(source_name.to_string()), records)
    }

    pub fn aggregate_str(&self, source_name: &str, text: &str) -> Result<RainfallDataset> {
        self.aggregate_reader(source_name, text.as_bytes())
    }

    /// Read and aggregate a file; the dataset is named after the file name
    /// without its directories.
    pub fn aggregate_file(&self, path: impl AsRef<Path>) -> Result<RainfallDataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RainfallError::io(path, e))?;
        let display = path.to_string_lossy();
        let source_name = names::file_name(&display);
        info!("aggregate: reading {}", path.display());
        self.aggregate_reader(source_name, file).map_err(|e| match e {
            RainfallError::Io { source, .. } => RainfallError::io(path, source),
            other => other,
        })
    }
}

fn csv_error(error: csv::Error, source_name: &str) -> RainfallError {
    let row = error.position().map(|p| p.line()).unwrap_or(0);
    let reason = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(io) => RainfallError::io(source_name, io),
        _ => RainfallError::parse(row, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    const SAMPLE: &str = "date,rainfall\n2024-01-05,10.0\n2024-01-17,30.0\n2024-02-02,5.0\n";

    #[test]
    fn aggregates_sample_months() {
        let dataset = Aggregator::default().aggregate_str("sample.csv", SAMPLE).unwrap();
        assert_eq!(dataset.source_name(), Some("sample.csv"));
        assert_eq!(dataset.len(), 2);

        let january = dataset.summaries()[0];
        assert_eq!(january.key(), (2024, 1));
        assert_eq!((january.min(), january.max(), january.total()), (10.0, 30.0, 40.0));
        assert_eq!(january.days(), 2);

        let february = dataset.summaries()[1];
        assert_eq!(february.key(), (2024, 2));
        assert_eq!((february.min(), february.max(), february.total()), (5.0, 5.0, 5.0));

        assert_eq!(dataset.date_range_label(), "1/2024 - 2/2024");
    }

    #[test]
    fn output_is_sorted_regardless_of_input_order() {
        let text = "date,rainfall\n2024-03-01,1\n2023-12-31,2\n2024-01-10,3\n2023-12-01,4\n";
        let dataset = Aggregator::default().aggregate_str("x.csv", text).unwrap();
        let keys: Vec<_> = dataset.summaries().iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec![(2023, 12), (2024, 1), (2024, 3)]);
        assert_eq!(dataset.summaries()[0].total(), 6.0);
    }

    #[test]
    fn negative_amount_fails_whole_import() {
        let text = "date,rainfall\n2024-01-05,10.0\n2024-01-06,-5\n2024-02-02,5.0\n";
        let err = Aggregator::default().aggregate_str("bad.csv", text).unwrap_err();
        match err {
            RainfallError::Parse { row, reason } => {
                assert_eq!(row, 3);
                assert!(reason.contains("negative"), "{reason}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_amount_and_short_rows_fail() {
        let text = "date,rainfall\n2024-01-05,ten\n";
        assert!(matches!(
            Aggregator::default().aggregate_str("bad.csv", text),
            Err(RainfallError::Parse { row: 2, .. })
        ));
        let text = "date,rainfall\n2024-01-05,1\n2024-01-06\n";
        assert!(matches!(
            Aggregator::default().aggregate_str("bad.csv", text),
            Err(RainfallError::Parse { row: 3, .. })
        ));
    }

    #[test]
    fn overflowing_total_names_the_row() {
        let text = "date,rainfall\n2024-01-01,1e308\n2024-01-02,1e308\n";
        match Aggregator::default().aggregate_str("huge.csv", text) {
            Err(RainfallError::Parse { row, reason }) => {
                assert_eq!(row, 3);
                assert!(reason.contains("1/2024"), "{reason}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            DailyRecord { date, amount: 1.0 },
            DailyRecord { date, amount: f64::MAX },
            DailyRecord { date, amount: f64::MAX },
        ];
        assert!(matches!(
            Aggregator::default().aggregate_records(None, records),
            Err(RainfallError::Parse { row: 3, .. })
        ));
    }

    #[test]
    fn header_only_file_is_an_empty_named_dataset() {
        let dataset = Aggregator::default()
            .aggregate_str("empty.csv", "date,rainfall\n")
            .unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.source_name(), Some("empty.csv"));
        assert_eq!(dataset.date_range_label(), crate::dataset::NO_DATA_LABEL);
    }

    #[test]
    fn bom_export_without_headers() {
        let format = InputFormat {
            has_headers: false,
            ..InputFormat::bom()
        };
        let text = "IDCJAC0009,031205,2000,01,01,0.0,,N\n\
                    IDCJAC0009,031205,2000,01,02,12.4,1,Y\n\
                    IDCJAC0009,031205,2000,02,01,3.0,1,Y\n";
        let dataset = Aggregator::new(format).aggregate_str("bom.csv", text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.summaries()[0].min(), 0.0);
        assert_eq!(dataset.summaries()[0].max(), 12.4);
        assert_eq!(dataset.record_count(), 3);
    }

    #[test]
    fn custom_delimiter_and_date_format() {
        let format = InputFormat {
            delimiter: b';',
            date_format: "%d/%m/%Y".to_string(),
            ..InputFormat::default()
        };
        let text = "day;mm\n05/01/2024;2.5\n";
        let dataset = Aggregator::new(format).aggregate_str("semi.csv", text).unwrap();
        assert_eq!(dataset.summaries()[0].key(), (2024, 1));
    }

    #[test]
    fn file_source_name_drops_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("station.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let dataset = Aggregator::default().aggregate_file(&path).unwrap();
        assert_eq!(dataset.source_name(), Some("station.csv"));
    }

    #[test]
    fn missing_file_is_io_failure_with_path() {
        let err = Aggregator::default()
            .aggregate_file("/definitely/not/here/rain.csv")
            .unwrap_err();
        match err {
            RainfallError::Io { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here/rain.csv"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    fn daily_records() -> impl Strategy<Value = Vec<DailyRecord>> {
        prop::collection::vec((2000i32..2004, 1u32..=12, 1u32..=28, 0.0f64..500.0), 1..200)
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|(y, m, d, amount)| DailyRecord {
                        date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                        amount,
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_statistics_are_ordered(records in daily_records()) {
            let dataset = Aggregator::default()
                .aggregate_records(Some("p.csv".to_string()), records)
                .unwrap();
            for s in dataset.summaries() {
                prop_assert!(0.0 <= s.min());
                prop_assert!(s.min() <= s.max());
                prop_assert!(s.max() <= s.total());
                prop_assert!(s.min() <= s.total());
            }
        }

        #[test]
        fn prop_grouping_is_exact(records in daily_records()) {
            let distinct: std::collections::BTreeSet<_> =
                records.iter().map(|r| r.year_month()).collect();
            let dataset = Aggregator::default()
                .aggregate_records(None, records.clone())
                .unwrap();
            prop_assert_eq!(dataset.len(), distinct.len());
            prop_assert_eq!(dataset.record_count(), records.len() as u64);
            prop_assert!(dataset.summaries().windows(2).all(|w| w[0].key() < w[1].key()));
        }
    }
}
