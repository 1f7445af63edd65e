//! Delimited text import using the csv crate
//!
//! Each record's first two fields become a row's key and value. Fields are
//! plain text, so they are escaped into markup on the way in.

use std::io::Cursor;

use super::{ImportError, ImportedRow};
use crate::richtext;

/// Supported delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Semicolon => b';',
        }
    }

    /// Delimiter implied by a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "tsv" => Delimiter::Tab,
            "psv" => Delimiter::Pipe,
            _ => Delimiter::Comma,
        }
    }
}

/// Detect delimiter by counting candidates in the first few lines
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let pipe_count = first_lines.matches('|').count();
    let semi_count = first_lines.matches(';').count();

    let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

    if max == 0 || comma_count == max {
        Delimiter::Comma
    } else if tab_count == max {
        Delimiter::Tab
    } else if pipe_count == max {
        Delimiter::Pipe
    } else {
        Delimiter::Semicolon
    }
}

/// Parse delimited text into rows; records with fewer than two fields are dropped
pub fn parse_csv_rows(content: &str, delimiter: Delimiter) -> Result<Vec<ImportedRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(content.as_bytes()));

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let record = result?;
        match (record.get(0), record.get(1)) {
            (Some(key), Some(value)) => rows.push(ImportedRow {
                key: richtext::from_plain_text(key),
                value: richtext::from_plain_text(value),
            }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "records with fewer than two fields skipped");
    }
    Ok(rows)
}
