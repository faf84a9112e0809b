//! Data models shared by the fetch, extract, and export stages.
//!
//! - [`RunRequest`]: the immutable input to one run
//! - [`ExtractedTable`] / [`Narrative`] / [`Extraction`]: parsed page content
//! - [`Notification`] / [`RunEvent`]: what a run reports to its front end

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Output file format selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum OutputFormat {
    #[value(name = "Excel")]
    Excel,
    #[value(name = "CSV")]
    Csv,
    #[value(name = "Word")]
    Word,
}

impl OutputFormat {
    /// The tabular format to export tables in, if this format can hold them.
    pub fn table_format(self) -> Option<TableFormat> {
        match self {
            OutputFormat::Excel => Some(TableFormat::Excel),
            OutputFormat::Csv => Some(TableFormat::Csv),
            OutputFormat::Word => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Excel => "Excel",
            OutputFormat::Csv => "CSV",
            OutputFormat::Word => "Word",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An [`OutputFormat`] that writes one file per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Excel,
    Csv,
}

impl TableFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Excel => "xlsx",
            TableFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TableFormat::Excel => "Excel",
            TableFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Length bounds and chunking for the optional summary step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Upper bound handed to the summarization backend, per chunk.
    pub max_length: usize,
    /// Lower bound handed to the summarization backend, per chunk.
    pub min_length: usize,
    /// Chunk width in characters.
    pub chunk_width: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 50,
            chunk_width: 1024,
        }
    }
}

/// Everything one run needs. Built once before the run starts and never
/// modified while it executes.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub urls: Vec<String>,
    /// Destination root; the session directory is created beneath it.
    pub destination: PathBuf,
    pub format: OutputFormat,
}

/// One table found on a page, as rows of string cells. The first row is the
/// header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Rows padded with empty cells so every row has [`width`](Self::width) cells.
    pub fn normalized(&self) -> Vec<Vec<String>> {
        let width = self.width();
        self.rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect()
    }
}

/// Paragraph text of a page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub paragraphs: Vec<String>,
}

impl Narrative {
    /// All paragraphs joined with a single space.
    pub fn text(&self) -> String {
        self.paragraphs.join(" ")
    }
}

/// Result of classifying a page for a given output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Tables to write, one file each, in `format`.
    Tables {
        format: TableFormat,
        tables: Vec<ExtractedTable>,
    },
    Narrative(Narrative),
    /// Neither branch found anything to export.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// A short human-readable message for the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    /// The URL the message is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub message: String,
}

impl Notification {
    pub fn info(url: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            url: url.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn error(url: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            url: url.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Everything a run reports, in the order it happens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Started {
        total: usize,
        session_dir: PathBuf,
    },
    Notice(Notification),
    Progress {
        processed: usize,
        total: usize,
        percent: f64,
    },
    Completed {
        total: usize,
        failed: usize,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_table_capability() {
        assert_eq!(OutputFormat::Excel.table_format(), Some(TableFormat::Excel));
        assert_eq!(OutputFormat::Csv.table_format(), Some(TableFormat::Csv));
        assert_eq!(OutputFormat::Word.table_format(), None);
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
        assert_eq!(TableFormat::Excel.extension(), "xlsx");
        assert_eq!(TableFormat::Csv.to_string(), "CSV");
    }

    #[test]
    fn test_table_normalized_pads_short_rows() {
        let table = ExtractedTable {
            rows: vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["1".into()],
            ],
        };
        assert_eq!(table.width(), 3);
        assert_eq!(table.normalized()[1], vec!["1", "", ""]);
    }

    #[test]
    fn test_narrative_text_is_space_joined() {
        let narrative = Narrative {
            paragraphs: vec!["Hello".into(), "World".into()],
        };
        assert_eq!(narrative.text(), "Hello World");
    }

    #[test]
    fn test_run_event_serialization() {
        let event = RunEvent::Notice(Notification::error(
            Some("https://example.com"),
            "Failed to retrieve data from the URL: boom",
        ));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"notice""#));
        assert!(json.contains(r#""severity":"error""#));
        assert!(json.contains("https://example.com"));

        let progress = RunEvent::Progress {
            processed: 1,
            total: 2,
            percent: 50.0,
        };
        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.contains(r#""event":"progress""#));
        assert!(json.contains(r#""percent":50.0"#));
    }
}
