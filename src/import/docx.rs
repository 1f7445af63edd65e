//! DOCX table import
//!
//! Reads `word/document.xml` from the package and walks it as an event
//! stream. Every row of a top-level table becomes one imported row; the
//! first two cells are converted to markup:
//!
//! - one `<p>` per non-empty paragraph
//! - runs wrapped in `<strong>`, `<em>`, `<u>` per `w:b`, `w:i`, `w:u`
//! - `w:br`/`w:cr` as `<br>`, `w:tab` as a tab character
//!
//! Nested tables are not split into rows; their text flows into the cell
//! that contains them.

use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::{ImportError, ImportedRow};
use crate::richtext;

const DOCUMENT_PART: &str = "word/document.xml";

/// Read table rows from a DOCX package
pub fn read_docx<R: Read + Seek>(reader: R) -> Result<Vec<ImportedRow>, ImportError> {
    let mut archive = ZipArchive::new(reader)?;

    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ImportError::MissingPart(DOCUMENT_PART));
        }
        Err(e) => return Err(e.into()),
    }

    parse_document_xml(&xml)
}

/// Extract table rows from WordprocessingML document XML
pub fn parse_document_xml(xml: &str) -> Result<Vec<ImportedRow>, ImportError> {
    let mut reader = Reader::from_str(xml);
    // whitespace inside w:t is significant
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut parser = TableParser::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => parser.start(e),
            Event::Empty(ref e) => parser.inline(e),
            Event::End(ref e) => parser.end(e.name().as_ref()),
            Event::Text(ref e) => parser.text(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(ref e) => parser.text(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(ref e) => {
                let entity = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                parser.text(&richtext::decode_entities(&entity));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.rows)
}

#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    underline: bool,
}

/// Markup for one table cell, built up paragraph by paragraph
#[derive(Debug, Default)]
struct CellBuilder {
    markup: String,
    paragraph: String,
    run: String,
    style: RunStyle,
}

impl CellBuilder {
    fn start_run(&mut self) {
        self.finish_run();
        self.style = RunStyle::default();
    }

    fn push_text(&mut self, text: &str) {
        self.run.push_str(&richtext::escape(text));
    }

    fn push_break(&mut self) {
        self.run.push_str("<br>");
    }

    fn finish_run(&mut self) {
        if self.run.is_empty() {
            return;
        }
        let run = std::mem::take(&mut self.run);
        let style = self.style;

        if style.bold {
            self.paragraph.push_str("<strong>");
        }
        if style.italic {
            self.paragraph.push_str("<em>");
        }
        if style.underline {
            self.paragraph.push_str("<u>");
        }
        self.paragraph.push_str(&run);
        if style.underline {
            self.paragraph.push_str("</u>");
        }
        if style.italic {
            self.paragraph.push_str("</em>");
        }
        if style.bold {
            self.paragraph.push_str("</strong>");
        }
    }

    fn finish_paragraph(&mut self) {
        self.finish_run();
        let paragraph = std::mem::take(&mut self.paragraph);
        if richtext::plain_text(&paragraph).is_empty() {
            return;
        }
        self.markup.push_str("<p>");
        self.markup.push_str(&paragraph);
        self.markup.push_str("</p>");
    }

    fn finish(mut self) -> String {
        self.finish_paragraph();
        self.markup.trim().to_string()
    }
}

/// Event-driven table extraction state
#[derive(Debug, Default)]
struct TableParser {
    rows: Vec<ImportedRow>,
    table_depth: usize,
    /// Cells of the current top-level row
    row: Option<Vec<String>>,
    /// The current top-level cell
    cell: Option<CellBuilder>,
    in_text: bool,
    in_run_props: bool,
    in_paragraph_props: bool,
}

impl TableParser {
    fn start(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:tbl" => self.table_depth += 1,
            b"w:tr" if self.table_depth == 1 => self.row = Some(Vec::new()),
            b"w:tc" if self.table_depth == 1 && self.row.is_some() => {
                self.cell = Some(CellBuilder::default())
            }
            b"w:p" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.finish_paragraph();
                }
            }
            b"w:pPr" => self.in_paragraph_props = true,
            b"w:r" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.start_run();
                }
            }
            b"w:rPr" if !self.in_paragraph_props => self.in_run_props = true,
            b"w:t" => self.in_text = self.cell.is_some(),
            _ => self.inline(e),
        }
    }

    /// Elements that carry meaning without content: run properties and breaks
    fn inline(&mut self, e: &BytesStart<'_>) {
        let Some(cell) = self.cell.as_mut() else {
            return;
        };

        match e.name().as_ref() {
            b"w:b" if self.in_run_props => cell.style.bold = toggle_value(e),
            b"w:i" if self.in_run_props => cell.style.italic = toggle_value(e),
            b"w:u" if self.in_run_props => cell.style.underline = toggle_value(e),
            b"w:br" | b"w:cr" if !self.in_run_props => cell.push_break(),
            b"w:tab" if !self.in_paragraph_props => cell.push_text("\t"),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"w:t" => self.in_text = false,
            b"w:rPr" => self.in_run_props = false,
            b"w:pPr" => self.in_paragraph_props = false,
            b"w:r" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.finish_run();
                }
            }
            b"w:p" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.finish_paragraph();
                }
            }
            b"w:tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.push(cell.finish());
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let Some(cells) = self.row.take() {
                    let mut cells = cells.into_iter();
                    if let (Some(key), Some(value)) = (cells.next(), cells.next()) {
                        self.rows.push(ImportedRow { key, value });
                    }
                }
            }
            b"w:tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_text {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            cell.push_text(text);
        }
    }
}

/// On/off run property: present means on unless `w:val` says otherwise
fn toggle_value(e: &BytesStart<'_>) -> bool {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"w:val" {
            let value = String::from_utf8_lossy(&attr.value).to_ascii_lowercase();
            return !matches!(value.as_str(), "0" | "false" | "off" | "none");
        }
    }
    true
}
