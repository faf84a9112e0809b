//! Classify a fetched page as tabular data or narrative text.
//!
//! The decision rule is per page: when the requested format can hold tables
//! and the page has at least one non-empty `<table>`, the tables are
//! returned. Otherwise every `<p>` element is collected. A page with neither
//! yields [`Extraction::Empty`].

use crate::models::{ExtractedTable, Extraction, Narrative, OutputFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;
use tracing::{debug, instrument};

static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// HTML caps spans at these values; larger attributes are clamped.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// Parse `body` and pick the export branch for `format`.
#[instrument(level = "debug", skip(body), fields(bytes = body.len()))]
pub fn extract(body: &[u8], format: OutputFormat) -> Extraction {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    if let Some(table_format) = format.table_format() {
        let tables = extract_tables(&document);
        if !tables.is_empty() {
            debug!(count = tables.len(), "Classified page as tabular");
            return Extraction::Tables {
                format: table_format,
                tables,
            };
        }
    }

    let paragraphs = extract_paragraphs(&document);
    if paragraphs.is_empty() {
        debug!("Page has no tables or paragraphs");
        Extraction::Empty
    } else {
        debug!(count = paragraphs.len(), "Classified page as narrative");
        Extraction::Narrative(Narrative { paragraphs })
    }
}

/// Every `<table>` in document order, nested tables included. Tables without
/// any rows are dropped.
pub fn extract_tables(document: &Html) -> Vec<ExtractedTable> {
    document
        .select(&TABLE_SELECTOR)
        .map(table_rows)
        .filter(|rows| !rows.is_empty())
        .map(|rows| ExtractedTable { rows })
        .collect()
}

/// Text of every `<p>` in document order.
pub fn extract_paragraphs(document: &Html) -> Vec<String> {
    document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>())
        .collect()
}

struct Cell {
    text: String,
    colspan: usize,
    rowspan: usize,
}

/// Rows of `table` with `colspan`/`rowspan` expanded into repeated values.
///
/// Values carried down by `rowspan` are placed before the first cell that
/// starts at or after their column. Carried values whose column was already
/// taken by a wide cell are appended at the end of the row.
fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    // (column, text, rows still to fill), in queue order
    let mut pending: VecDeque<(usize, String, usize)> = VecDeque::new();

    for row in table
        .select(&ROW_SELECTOR)
        .filter(|row| owning_table(*row).is_some_and(|owner| owner.id() == table.id()))
    {
        let mut carried = std::mem::take(&mut pending);
        let mut out: Vec<String> = Vec::new();

        for cell in row_cells(row) {
            while carried.front().is_some_and(|(col, _, _)| *col <= out.len()) {
                if let Some((col, text, remaining)) = carried.pop_front() {
                    carry(&mut pending, col, &text, remaining);
                    out.push(text);
                }
            }
            for _ in 0..cell.colspan {
                carry(&mut pending, out.len(), &cell.text, cell.rowspan);
                out.push(cell.text.clone());
            }
        }

        // Spans reaching past the last cell of this row, or overlapped by it.
        for (col, text, remaining) in carried {
            carry(&mut pending, col, &text, remaining);
            out.push(text);
        }

        if !out.is_empty() {
            rows.push(out);
        }
    }

    rows
}

/// Queue `text` for the next row when it still spans more than this one.
fn carry(pending: &mut VecDeque<(usize, String, usize)>, col: usize, text: &str, rowspan: usize) {
    if rowspan > 1 {
        pending.push_back((col, text.to_string(), rowspan - 1));
    }
}

fn row_cells(row: ElementRef<'_>) -> Vec<Cell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|el| Cell {
            text: cell_text(el),
            colspan: span(el, "colspan", MAX_COLSPAN),
            rowspan: span(el, "rowspan", MAX_ROWSPAN),
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let raw = cell.text().collect::<String>();
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

fn span(cell: ElementRef<'_>, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map_or(1, |n| n.min(max))
}

/// The nearest `<table>` ancestor of `row`.
fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TableFormat;

    fn tables_of(html: &str) -> Vec<ExtractedTable> {
        match extract(html.as_bytes(), OutputFormat::Excel) {
            Extraction::Tables { tables, .. } => tables,
            other => panic!("expected tables, got {other:?}"),
        }
    }

    #[test]
    fn test_single_table_header_and_row() {
        let tables = tables_of(
            "<html><body><table><tr><th>a</th><th>b</th></tr><tr><td>1</td><td>2</td></tr></table></body></html>",
        );
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_tables_in_document_order_with_nested() {
        let tables = tables_of(
            r#"<table id="outer">
                 <tr><td>outer</td><td><table><tr><td>inner</td></tr></table></td></tr>
               </table>
               <table><tr><td>second</td></tr></table>"#,
        );
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].rows, vec![vec!["outer", "inner"]]);
        assert_eq!(tables[1].rows, vec![vec!["inner"]]);
        assert_eq!(tables[2].rows, vec![vec!["second"]]);
    }

    #[test]
    fn test_cell_whitespace_is_collapsed() {
        let tables = tables_of("<table><tr><td>\n  New\n   York  </td></tr></table>");
        assert_eq!(tables[0].rows, vec![vec!["New York"]]);
    }

    #[test]
    fn test_colspan_repeats_value() {
        let tables = tables_of(
            r#"<table><tr><th colspan="2">wide</th><th>c</th></tr><tr><td>1</td><td>2</td><td>3</td></tr></table>"#,
        );
        assert_eq!(tables[0].rows[0], vec!["wide", "wide", "c"]);
    }

    #[test]
    fn test_rowspan_fills_following_rows() {
        let tables = tables_of(
            r#"<table>
                 <tr><td rowspan="2">x</td><td>1</td></tr>
                 <tr><td>2</td></tr>
                 <tr><td>y</td><td>3</td></tr>
               </table>"#,
        );
        assert_eq!(
            tables[0].rows,
            vec![vec!["x", "1"], vec!["x", "2"], vec!["y", "3"]]
        );
    }

    #[test]
    fn test_rowspan_in_last_column() {
        let tables = tables_of(
            r#"<table>
                 <tr><td>a</td><td rowspan="2">z</td></tr>
                 <tr><td>b</td></tr>
               </table>"#,
        );
        assert_eq!(tables[0].rows, vec![vec!["a", "z"], vec!["b", "z"]]);
    }

    #[test]
    fn test_rowspan_overlapped_by_colspan_is_kept() {
        let tables = tables_of(
            r#"<table>
                 <tr><td>a</td><td rowspan="3">b</td></tr>
                 <tr><td colspan="2">c</td></tr>
                 <tr><td>d</td></tr>
               </table>"#,
        );
        assert_eq!(
            tables[0].rows,
            vec![vec!["a", "b"], vec!["c", "c", "b"], vec!["d", "b"]]
        );
    }

    #[test]
    fn test_rowspan_and_colspan_on_one_cell() {
        let tables = tables_of(
            r#"<table>
                 <tr><td rowspan="2" colspan="2">x</td><td>1</td></tr>
                 <tr><td>2</td></tr>
               </table>"#,
        );
        assert_eq!(tables[0].rows, vec![vec!["x", "x", "1"], vec!["x", "x", "2"]]);
    }

    #[test]
    fn test_invalid_span_counts_as_one() {
        let tables = tables_of(r#"<table><tr><td colspan="0">a</td><td colspan="x">b</td></tr></table>"#);
        assert_eq!(tables[0].rows, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_tables_carry_requested_format() {
        let html = "<table><tr><td>1</td></tr></table>";
        assert!(matches!(
            extract(html.as_bytes(), OutputFormat::Csv),
            Extraction::Tables {
                format: TableFormat::Csv,
                ..
            }
        ));
    }

    #[test]
    fn test_word_format_ignores_tables() {
        let html = "<table><tr><td>1</td></tr></table><p>Hello</p>";
        assert_eq!(
            extract(html.as_bytes(), OutputFormat::Word),
            Extraction::Narrative(Narrative {
                paragraphs: vec!["Hello".to_string()]
            })
        );
    }

    #[test]
    fn test_paragraphs_in_order() {
        let html = "<html><body><p>Hello</p><div><p>World</p></div></body></html>";
        assert_eq!(
            extract(html.as_bytes(), OutputFormat::Csv),
            Extraction::Narrative(Narrative {
                paragraphs: vec!["Hello".to_string(), "World".to_string()]
            })
        );
    }

    #[test]
    fn test_paragraph_text_concatenates_descendants() {
        let html = "<p>Hello <b>bold</b> world</p>";
        assert_eq!(
            extract(html.as_bytes(), OutputFormat::Word),
            Extraction::Narrative(Narrative {
                paragraphs: vec!["Hello bold world".to_string()]
            })
        );
    }

    #[test]
    fn test_empty_tables_fall_back_to_paragraphs() {
        let html = "<table></table><p>Only text</p>";
        assert!(matches!(
            extract(html.as_bytes(), OutputFormat::Excel),
            Extraction::Narrative(_)
        ));
    }

    #[test]
    fn test_nothing_found() {
        let html = "<html><body><div>just a div</div></body></html>";
        assert_eq!(extract(html.as_bytes(), OutputFormat::Excel), Extraction::Empty);
        assert_eq!(extract(html.as_bytes(), OutputFormat::Word), Extraction::Empty);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut body = b"<p>caf".to_vec();
        body.push(0xff);
        body.extend_from_slice(b"</p>");
        match extract(&body, OutputFormat::Word) {
            Extraction::Narrative(n) => assert!(n.paragraphs[0].starts_with("caf")),
            other => panic!("expected narrative, got {other:?}"),
        }
    }
}
