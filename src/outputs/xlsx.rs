//! Minimal `.xlsx` workbook writer.
//!
//! One worksheet named `Sheet1`. Every cell, empty ones included, is an
//! inline string, so values read back exactly as extracted. The first row is
//! the header row.

use super::ooxml::{self, OFFICE_DOCUMENT_REL, Part, XML_DECLARATION, xml_text};
use crate::error::ExportError;
use crate::models::ExtractedTable;
use std::path::Path;
use tracing::warn;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

/// Longest text a single cell may hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Encode `table` as a workbook. `path` is only used for error context.
pub fn encode(table: &ExtractedTable, path: &Path) -> Result<Vec<u8>, ExportError> {
    let parts = [
        Part {
            name: "[Content_Types].xml",
            xml: ooxml::content_types(&[
                ("/xl/workbook.xml", WORKBOOK_CONTENT_TYPE),
                ("/xl/worksheets/sheet1.xml", WORKSHEET_CONTENT_TYPE),
            ]),
        },
        Part {
            name: "_rels/.rels",
            xml: ooxml::single_relationship(OFFICE_DOCUMENT_REL, "xl/workbook.xml"),
        },
        Part {
            name: "xl/workbook.xml",
            xml: format!(
                r#"{XML_DECLARATION}<workbook xmlns="{SPREADSHEET_NS}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#
            ),
        },
        Part {
            name: "xl/_rels/workbook.xml.rels",
            xml: ooxml::single_relationship(WORKSHEET_REL, "worksheets/sheet1.xml"),
        },
        Part {
            name: "xl/worksheets/sheet1.xml",
            xml: sheet_xml(table),
        },
    ];

    ooxml::package(&parts).map_err(|source| ExportError::Archive {
        path: path.to_path_buf(),
        source,
    })
}

fn sheet_xml(table: &ExtractedTable) -> String {
    let mut xml = format!(r#"{XML_DECLARATION}<worksheet xmlns="{SPREADSHEET_NS}"><sheetData>"#);

    for (r, row) in table.normalized().iter().enumerate() {
        let row_number = r + 1;
        xml.push_str(&format!(r#"<row r="{row_number}">"#));
        for (c, value) in row.iter().enumerate() {
            let reference = format!("{}{}", column_name(c), row_number);
            let value = clamp_cell(value, &reference);
            xml.push_str(&format!(
                r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                xml_text(&value)
            ));
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn clamp_cell(value: &str, reference: &str) -> String {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        None => value.to_string(),
        Some((cut, _)) => {
            warn!(cell = %reference, chars = value.chars().count(), "Cell text truncated to spreadsheet limit");
            value[..cut].to_string()
        }
    }
}

/// Spreadsheet column letters for a zero-based index: 0 -> `A`, 26 -> `AA`.
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
