//! PDF rendering
//!
//! Single-page PDF written object by object with a hand-maintained xref
//! table. Every line sits at the template's fixed absolute coordinates;
//! long text is not wrapped or paginated, matching the legacy layout.

use crate::document::{MomDocument, ACTION_ITEMS, MOM_AGENDA, MOM_HEADING};

// US Letter, points
const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;

const LEFT_MARGIN: u32 = 100;
const FONT_SIZE: u32 = 12;

/// Render the MOM template as a PDF byte stream.
pub fn render_pdf(doc: &MomDocument) -> Vec<u8> {
    let date_line = format!("Date: {}", doc.date.format("%Y-%m-%d"));
    let agenda_line = format!("Agenda: {MOM_AGENDA}");

    // Fixed template coordinates, top to bottom in 20-point steps.
    let lines: [(u32, &str); 14] = [
        (750, MOM_HEADING),
        (730, &agenda_line),
        (710, &date_line),
        (690, "---"),
        (670, "Transcription:"),
        (650, &doc.transcript),
        (630, "---"),
        (610, "Summary:"),
        (590, &doc.summary),
        (570, "---"),
        (550, "Action Items:"),
        (530, ACTION_ITEMS[0]),
        (510, ACTION_ITEMS[1]),
        (490, ACTION_ITEMS[2]),
    ];

    let mut content = String::new();
    for (y, text) in lines {
        content.push_str(&format!(
            "BT /F1 {FONT_SIZE} Tf {LEFT_MARGIN} {y} Td ({}) Tj ET\n",
            escape_pdf_text(text)
        ));
    }

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    // Byte offsets for the xref table, one per object.
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }

    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    out
}

/// Escape a line for a PDF literal string. The string delimiters are
/// backslash-escaped and non-ASCII text is transcoded to WinAnsi octal
/// escapes to match the font's /WinAnsiEncoding; characters WinAnsi
/// cannot represent become '?'.
fn escape_pdf_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\n' | '\r' => escaped.push(' '),
            ' '..='~' => escaped.push(c),
            _ => match winansi_byte(c) {
                Some(b) => escaped.push_str(&format!("\\{b:03o}")),
                None => escaped.push('?'),
            },
        }
    }
    escaped
}

/// WinAnsi (CP1252) code for a non-ASCII character, if it has one.
fn winansi_byte(c: char) -> Option<u8> {
    if let 0x00A0..=0x00FF = c as u32 {
        return Some(c as u32 as u8);
    }
    let b = match c {
        '\u{20AC}' => 0x80, // euro sign
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // ellipsis
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91, // curly quotes
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96, // en and em dash
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(b)
}
