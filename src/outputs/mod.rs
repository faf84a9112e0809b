//! Output generation for extracted page content.
//!
//! # Submodules
//!
//! - [`xlsx`]: Excel workbooks, one per table
//! - [`delimited`]: CSV files, one per table
//! - [`docx`]: Word documents holding paragraph text and an optional summary
//! - [`ooxml`]: zip/XML packaging shared by `xlsx` and `docx`
//!
//! # Output Structure
//!
//! ```text
//! <root>/web scrapped files/
//! └── 20250506_143005/
//!     ├── table_data_1.xlsx            # Excel format, one per table
//!     ├── table_data_2.csv             # CSV format, one per table
//!     ├── text_data.docx               # paragraph text
//!     └── text_data_with_summary.docx  # paragraph text + summary
//! ```
//!
//! Names are fixed, so a later URL in the same session overwrites files
//! written for an earlier one.

pub mod delimited;
pub mod docx;
pub mod ooxml;
pub mod xlsx;

use crate::error::ExportError;
use crate::models::{ExtractedTable, Narrative, TableFormat};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

pub const TEXT_FILE: &str = "text_data.docx";
pub const TEXT_WITH_SUMMARY_FILE: &str = "text_data_with_summary.docx";
pub const SUMMARY_HEADING: &str = "Summary:";

/// `table_data_<index>.<ext>` with a 1-based index.
pub fn table_file_name(index: usize, format: TableFormat) -> String {
    format!("table_data_{index}.{}", format.extension())
}

type TableEncoder = fn(&ExtractedTable, &Path) -> Result<Vec<u8>, ExportError>;

/// Write one file per table into `dir`.
///
/// Stops at the first failure; files already written are left in place.
///
/// # Arguments
///
/// * `tables` - Tables in page order; the first is written as `table_data_1`.
/// * `format` - Excel workbook or CSV file per table.
/// * `dir` - The session directory. It must already exist.
///
/// # Returns
///
/// The paths written, in table order.
///
/// # Errors
///
/// [`ExportError`] when a table cannot be encoded or its file cannot be written.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %format, count = tables.len()))]
pub async fn write_tables(
    tables: &[ExtractedTable],
    format: TableFormat,
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let encode: TableEncoder = match format {
        TableFormat::Excel => xlsx::encode,
        TableFormat::Csv => delimited::encode,
    };

    let mut written = Vec::with_capacity(tables.len());
    for (i, table) in tables.iter().enumerate() {
        let path = dir.join(table_file_name(i + 1, format));
        let bytes = encode(table, &path)?;
        write_file(&path, &bytes).await?;
        info!(path = %path.display(), rows = table.rows.len(), "Wrote table");
        written.push(path);
    }
    Ok(written)
}

/// Write the narrative as a single Word document in `dir`.
///
/// With `summary`, a `Summary:` paragraph and the summary text are appended
/// and the file is named `text_data_with_summary.docx`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), paragraphs = narrative.paragraphs.len(), with_summary = summary.is_some()))]
pub async fn write_narrative(
    narrative: &Narrative,
    summary: Option<&str>,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let mut paragraphs: Vec<&str> = narrative.paragraphs.iter().map(String::as_str).collect();
    let file_name = match summary {
        Some(summary) => {
            paragraphs.push(SUMMARY_HEADING);
            paragraphs.push(summary);
            TEXT_WITH_SUMMARY_FILE
        }
        None => TEXT_FILE,
    };

    let path = dir.join(file_name);
    let bytes = docx::encode(&paragraphs, &path)?;
    write_file(&path, &bytes).await?;
    info!(path = %path.display(), "Wrote document");
    Ok(path)
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if fs::try_exists(path).await.unwrap_or(false) {
        warn!(path = %path.display(), "Overwriting file from an earlier URL in this session");
    }
    fs::write(path, bytes).await.map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
