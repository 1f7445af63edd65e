//! Document import
//!
//! Turns an external document into `(key, value)` markup pairs. Only the
//! first two cells of each table row are used; rows with fewer than two cells
//! are dropped here, so the store never sees them.

mod csv;
mod docx;

pub use self::csv::{detect_delimiter, parse_csv_rows, Delimiter};
pub use self::docx::{parse_document_xml, read_docx};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

/// One imported table row, as markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedRow {
    pub key: String,
    pub value: String,
}

impl ImportedRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a valid document archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Invalid table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Document is missing {0}")]
    MissingPart(&'static str),
}

/// Supported import formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Docx,
    Delimited(Delimiter),
    Json,
}

impl ImportFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "docx" => Ok(ImportFormat::Docx),
            "csv" | "tsv" | "psv" => Ok(ImportFormat::Delimited(Delimiter::from_extension(&ext))),
            "json" => Ok(ImportFormat::Json),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Import a document from disk, choosing the parser by extension
pub fn import_path(path: &Path) -> Result<Vec<ImportedRow>, ImportError> {
    let format = ImportFormat::from_path(path)?;

    let rows = match format {
        ImportFormat::Docx => read_docx(BufReader::new(File::open(path)?))?,
        ImportFormat::Delimited(delimiter) => {
            let content = std::fs::read_to_string(path)?;
            // .csv files are often semicolon- or tab-separated in practice
            let delimiter = if delimiter == Delimiter::Comma {
                detect_delimiter(&content)
            } else {
                delimiter
            };
            parse_csv_rows(&content, delimiter)?
        }
        ImportFormat::Json => {
            let content = std::fs::read_to_string(path)?;
            crate::persistence::parse_cells(&content)?
                .into_iter()
                .map(|(key, value)| ImportedRow { key, value })
                .collect()
        }
    };

    tracing::info!(
        "Imported {} rows from {} ({:?})",
        rows.len(),
        path.display(),
        format
    );
    Ok(rows)
}
