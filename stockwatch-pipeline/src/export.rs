//! CSV export of a record set in canonical header order.

use std::io::Write;

use crate::error::ExportError;
use crate::types::RecordSet;

/// Write `set` as CSV: one header line from `set.headers`, then one line per
/// record. Missing cells are written empty.
pub fn export_csv<W: Write>(set: &RecordSet, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(&set.headers)?;
    for record in &set.records {
        let row: Vec<String> = set
            .headers
            .iter()
            .map(|h| record.get(h).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write `set` to the file at `path`.
pub fn export_csv_file(set: &RecordSet, path: &str) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    export_csv(set, file)
}
