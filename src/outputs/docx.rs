//! Minimal `.docx` document writer.
//!
//! Each paragraph becomes one `<w:p>`. Line breaks and tabs inside a
//! paragraph are written as `<w:br/>` and `<w:tab/>` so the text reads the
//! same in a word processor.

use super::ooxml::{self, OFFICE_DOCUMENT_REL, Part, XML_DECLARATION, xml_text};
use crate::error::ExportError;
use std::path::Path;

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Encode `paragraphs` as a document. `path` is only used for error context.
pub fn encode<S: AsRef<str>>(paragraphs: &[S], path: &Path) -> Result<Vec<u8>, ExportError> {
    let parts = [
        Part {
            name: "[Content_Types].xml",
            xml: ooxml::content_types(&[("/word/document.xml", DOCUMENT_CONTENT_TYPE)]),
        },
        Part {
            name: "_rels/.rels",
            xml: ooxml::single_relationship(OFFICE_DOCUMENT_REL, "word/document.xml"),
        },
        Part {
            name: "word/document.xml",
            xml: document_xml(paragraphs),
        },
    ];

    ooxml::package(&parts).map_err(|source| ExportError::Archive {
        path: path.to_path_buf(),
        source,
    })
}

fn document_xml<S: AsRef<str>>(paragraphs: &[S]) -> String {
    let mut xml = format!(r#"{XML_DECLARATION}<w:document xmlns:w="{WORDPROCESSING_NS}"><w:body>"#);
    for paragraph in paragraphs {
        xml.push_str(&paragraph_xml(paragraph.as_ref()));
    }
    xml.push_str("<w:sectPr/></w:body></w:document>");
    xml
}

fn paragraph_xml(text: &str) -> String {
    if text.is_empty() {
        return "<w:p/>".to_string();
    }

    let mut run = String::new();
    let mut segment = String::new();
    let flush = |run: &mut String, segment: &mut String| {
        if !segment.is_empty() {
            run.push_str(&format!(
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                xml_text(segment)
            ));
            segment.clear();
        }
    };

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                flush(&mut run, &mut segment);
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                run.push_str("<w:br/>");
            }
            '\n' => {
                flush(&mut run, &mut segment);
                run.push_str("<w:br/>");
            }
            '\t' => {
                flush(&mut run, &mut segment);
                run.push_str("<w:tab/>");
            }
            other => segment.push(other),
        }
    }
    flush(&mut run, &mut segment);

    format!("<w:p><w:r>{run}</w:r></w:p>")
}
