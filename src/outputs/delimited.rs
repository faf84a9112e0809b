//! CSV encoding for extracted tables.

use crate::error::ExportError;
use crate::models::ExtractedTable;
use std::path::Path;

/// Encode `table` as CSV: header row first, rows padded to equal width, no
/// index column. `path` is only used for error context.
pub fn encode(table: &ExtractedTable, path: &Path) -> Result<Vec<u8>, ExportError> {
    let csv_error = |message: String| ExportError::Csv {
        path: path.to_path_buf(),
        message,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in table.normalized() {
        writer
            .write_record(&row)
            .map_err(|e| csv_error(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| csv_error(e.to_string()))
}
