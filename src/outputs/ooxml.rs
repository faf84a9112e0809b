//! Shared packaging for the Office Open XML formats (`.xlsx`, `.docx`).
//!
//! Both formats are zip archives of XML parts. Parts are assembled in memory
//! and the finished archive is returned as bytes.

use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// One file inside the archive.
pub struct Part {
    pub name: &'static str,
    pub xml: String,
}

/// Zip `parts` into a single archive.
pub fn package(parts: &[Part]) -> Result<Vec<u8>, ZipError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for part in parts {
        zip.start_file(part.name, options)?;
        zip.write_all(part.xml.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// `[Content_Types].xml` declaring the package's main part.
pub fn content_types(overrides: &[(&str, &str)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part_name, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{part_name}" ContentType="{content_type}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// A relationships part with a single relationship `rId1`.
pub fn single_relationship(rel_type: &str, target: &str) -> String {
    format!(
        r#"{XML_DECLARATION}<Relationships xmlns="{RELATIONSHIPS_NS}"><Relationship Id="rId1" Type="{rel_type}" Target="{target}"/></Relationships>"#
    )
}

/// Escape `text` for XML content, dropping characters XML 1.0 cannot carry.
pub fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}')))
        .collect();
    escape(cleaned.as_str()).into_owned()
}
