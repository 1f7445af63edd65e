//! Document export
//!
//! Writes the current table out as a Word document or as plain CSV.

mod csv;
mod docx;

pub use self::csv::write_csv;
pub use self::docx::{document_xml, write_docx};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use crate::model::Row;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write document archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV write error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Unsupported export type: {0}")]
    UnsupportedFormat(String),
}

/// Export rows to `path`, choosing the format by extension
pub fn export_path(path: &Path, rows: &[Row]) -> Result<(), ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "docx" => {
            let file = File::create(path)?;
            write_docx(file, rows)?;
        }
        "csv" => {
            let mut writer = write_csv(BufWriter::new(File::create(path)?), rows)?;
            std::io::Write::flush(&mut writer)?;
        }
        _ => return Err(ExportError::UnsupportedFormat(path.display().to_string())),
    }

    tracing::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
