//! Word-compatible (.docx) rendering
//!
//! A .docx file is an OPC zip package. This writer builds the minimal part
//! set Word accepts ([Content_Types].xml, _rels/.rels, word/document.xml)
//! with a fixed zip timestamp so output bytes are reproducible.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::document::{MomDocument, RenderError, ACTION_ITEMS, MOM_AGENDA, MOM_HEADING};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Render the MOM template as a .docx byte stream.
pub fn render_docx(doc: &MomDocument) -> Result<Vec<u8>, RenderError> {
    let document_xml = build_document_xml(doc);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    // Fixed timestamp keeps identical inputs byte-identical.
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

/// Build the WordprocessingML main part following the MOM template.
fn build_document_xml(doc: &MomDocument) -> String {
    let mut body = String::new();

    heading(&mut body, MOM_HEADING, 32);
    heading(&mut body, "Agenda:", 26);
    paragraph(&mut body, MOM_AGENDA);
    heading(&mut body, "Date:", 26);
    paragraph(&mut body, &doc.date.format("%Y-%m-%d").to_string());

    paragraph(&mut body, "---");
    heading(&mut body, "Transcription:", 26);
    paragraph(&mut body, &doc.transcript);

    paragraph(&mut body, "---");
    heading(&mut body, "Summary:", 26);
    paragraph(&mut body, &doc.summary);

    paragraph(&mut body, "---");
    heading(&mut body, "Action Items:", 26);
    for item in ACTION_ITEMS {
        paragraph(&mut body, item);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

/// Bold run at the given half-point size.
fn heading(out: &mut String, text: &str, half_points: u32) {
    out.push_str(&format!(
        "<w:p><w:r><w:rPr><w:b/><w:sz w:val=\"{half_points}\"/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    ));
}

fn paragraph(out: &mut String, text: &str) {
    out.push_str(&format!(
        "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    ));
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
