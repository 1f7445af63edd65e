//! Plain-text CSV export

use std::io::Write;

use super::ExportError;
use crate::model::Row;

/// Write rows as two-column CSV of plain text
pub fn write_csv<W: Write>(writer: W, rows: &[Row]) -> Result<W, ExportError> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for row in rows {
        out.write_record([row.key_text(), row.value_text()])?;
    }
    out.flush()?;
    out.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
