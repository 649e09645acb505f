//! CSV form of a saved dataset.
//!
//! ```text
//! year,month,total,min,max,days
//! 2024,1,40.0,10.0,30.0,2
//! 2024,2,5.0,5.0,5.0,1
//! ```
//!
//! Floats are written in their shortest round-trip form, so decoding gives
//! back bit-identical statistics.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rain_core::{MonthlySummary, SummaryRow};

pub const HEADER: [&str; 6] = ["year", "month", "total", "min", "max", "days"];

pub fn encode(summaries: &[MonthlySummary]) -> Result<String, String> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(HEADER).map_err(|e| e.to_string())?;
    for summary in summaries {
        wtr.serialize(SummaryRow::from(*summary))
            .map_err(|e| e.to_string())?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Any failure is reported as the reason an entry is corrupt.
pub fn decode(blob: &str) -> Result<Vec<MonthlySummary>, String> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(blob.as_bytes());
    let headers = rdr.headers().map_err(|e| e.to_string())?.clone();
    if headers != StringRecord::from(HEADER.to_vec()) {
        return Err(format!(
            "unexpected header {:?}",
            headers.iter().collect::<Vec<_>>()
        ));
    }
    rdr.deserialize::<MonthlySummary>()
        .map(|result| result.map_err(|e| e.to_string()))
        .collect()
}
