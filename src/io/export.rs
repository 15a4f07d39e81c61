//! Export a generated market sample to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::PropertyRecord;
use crate::error::AppError;

pub const RECORDS_CSV_HEADER: &str = "area,bedrooms,bathrooms,city,price";

/// Write sample records to a CSV file.
pub fn write_records_csv(path: &Path, records: &[PropertyRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{RECORDS_CSV_HEADER}")
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;

    for r in records {
        writeln!(
            out,
            "{},{},{},{},{}",
            r.area,
            r.bedrooms,
            r.bathrooms.value(),
            csv_field(&r.city),
            r.price,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV '{}': {e}", path.display())))?;
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
