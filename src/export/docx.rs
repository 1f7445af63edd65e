//! DOCX table export
//!
//! Writes a minimal WordprocessingML package: one full-width table with the
//! key column at 30% and the value column at 70%. Each markup paragraph
//! becomes a `w:p`, each styled run a `w:r` carrying bold/italic/underline.

use std::io::{Seek, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;
use crate::model::Row;
use crate::richtext::{self, TextRun};

/// Table width in fiftieths of a percent (100%)
const TABLE_WIDTH_PCT: u32 = 5000;
const KEY_WIDTH_PCT: u32 = 1500;
const VALUE_WIDTH_PCT: u32 = 3500;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Write rows as a DOCX package, returning the finished writer
pub fn write_docx<W: Write + Seek>(writer: W, rows: &[Row]) -> Result<W, ExportError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(RELS_XML.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(rows).as_bytes())?;

    Ok(zip.finish()?)
}

/// Build `word/document.xml` for a set of rows
pub fn document_xml(rows: &[Row]) -> String {
    let mut xml = String::with_capacity(256 + rows.len() * 512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );

    xml.push_str("<w:tbl><w:tblPr>");
    xml.push_str(&format!(r#"<w:tblW w:w="{}" w:type="pct"/>"#, TABLE_WIDTH_PCT));
    xml.push_str("</w:tblPr><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>");

    for row in rows {
        xml.push_str("<w:tr>");
        push_cell(&mut xml, row.key_content(), KEY_WIDTH_PCT);
        push_cell(&mut xml, row.value_content(), VALUE_WIDTH_PCT);
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
    // a body may not end with a table
    xml.push_str("<w:p/>");
    xml.push_str("</w:body></w:document>");
    xml
}

fn push_cell(xml: &mut String, markup: &str, width_pct: u32) {
    xml.push_str("<w:tc><w:tcPr>");
    xml.push_str(&format!(r#"<w:tcW w:w="{}" w:type="pct"/>"#, width_pct));
    xml.push_str("</w:tcPr>");

    for paragraph in richtext::paragraphs(markup) {
        xml.push_str("<w:p>");
        for run in &paragraph {
            push_run(xml, run);
        }
        xml.push_str("</w:p>");
    }

    xml.push_str("</w:tc>");
}

fn push_run(xml: &mut String, run: &TextRun) {
    xml.push_str("<w:r>");
    if run.bold || run.italic || run.underline {
        xml.push_str("<w:rPr>");
        if run.bold {
            xml.push_str("<w:b/>");
        }
        if run.italic {
            xml.push_str("<w:i/>");
        }
        if run.underline {
            xml.push_str(r#"<w:u w:val="single"/>"#);
        }
        xml.push_str("</w:rPr>");
    }

    for (i, piece) in run.text.split('\t').enumerate() {
        if i > 0 {
            xml.push_str("<w:tab/>");
        }
        for (j, line) in piece.split('\n').enumerate() {
            if j > 0 {
                xml.push_str("<w:br/>");
            }
            if !line.is_empty() {
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&escape(line));
                xml.push_str("</w:t>");
            }
        }
    }

    xml.push_str("</w:r>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_document_xml;
    use crate::model::StableIndex;

    fn row(key: &str, value: &str) -> Row {
        Row::new(StableIndex(0), key.to_string(), value.to_string())
    }

    #[test]
    fn test_runs_carry_styles() {
        let xml = document_xml(&[row("<strong>bold</strong> text", "v")]);
        assert!(xml.contains(
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">bold</w:t></w:r>"#
        ));
        assert!(xml.contains(r#"<w:t xml:space="preserve"> text</w:t>"#));
        assert!(xml.contains(r#"<w:tcW w:w="1500" w:type="pct"/>"#));
        assert!(xml.contains(r#"<w:tcW w:w="3500" w:type="pct"/>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = document_xml(&[row("a &amp; b &lt;c&gt;", "")]);
        assert!(xml.contains("a &amp; b &lt;c&gt;"));
    }

    #[test]
    fn test_document_xml_reimports() {
        let rows = vec![
            row("<p><strong>apple</strong> pie</p>", "<p>dessert</p><p>sweet</p>"),
            row("banana", "<em>apple</em> fritter"),
        ];
        let imported = parse_document_xml(&document_xml(&rows)).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].key, "<p><strong>apple</strong> pie</p>");
        assert_eq!(imported[0].value, "<p>dessert</p><p>sweet</p>");
        assert_eq!(imported[1].value, "<p><em>apple</em> fritter</p>");
    }

    #[test]
    fn test_empty_cell_still_has_paragraph() {
        let xml = document_xml(&[row("", "")]);
        assert!(xml.contains("<w:tcPr><w:tcW w:w=\"1500\" w:type=\"pct\"/></w:tcPr><w:p></w:p></w:tc>"));
    }
}
