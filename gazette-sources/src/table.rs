//! Row and cell extraction for HTML tables rendered by client-side widgets.
//!
//! Structural drift on the live site (a renamed row class, a dropped column)
//! does not raise an error here. It is reported as [`ExtractionWarning`]s
//! next to whatever rows were found, so callers keep one output record per
//! matched row and can log the mismatch.

use gazette_common::{GazetteError, Result};
use scraper::{ElementRef, Html, Selector};

/// A structural mismatch noticed while reading a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionWarning {
    #[error("no rows matched `{selector}`")]
    NoRows { selector: String },
    #[error("row {row} has {found} cells, expected at least {expected}")]
    MissingCells {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Cell texts of every matched row, in document order.
#[derive(Debug, Default)]
pub struct TableRows {
    pub rows: Vec<Vec<String>>,
    pub warnings: Vec<ExtractionWarning>,
}

impl TableRows {
    /// Text of `column` in `row`, empty when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| GazetteError::Config(format!("invalid selector `{selector}`: {e}")))
}

/// Select `row_selector` in `html` and read the text of each row's `td`
/// descendants. Rows with fewer than `expected_cells` cells are kept and
/// flagged.
pub fn extract_rows(html: &str, row_selector: &str, expected_cells: usize) -> Result<TableRows> {
    let document = Html::parse_document(html);
    let rows = parse_selector(row_selector)?;
    let cells = parse_selector("td")?;

    let mut out = TableRows::default();
    for (index, row) in document.select(&rows).enumerate() {
        let texts: Vec<String> = row.select(&cells).map(cell_text).collect();
        if texts.len() < expected_cells {
            out.warnings.push(ExtractionWarning::MissingCells {
                row: index,
                found: texts.len(),
                expected: expected_cells,
            });
        }
        out.rows.push(texts);
    }

    if out.rows.is_empty() {
        out.warnings.push(ExtractionWarning::NoRows {
            selector: row_selector.to_string(),
        });
    }
    Ok(out)
}

/// All descendant text of a cell, untouched.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

/// Strip trailing whitespace only; leading whitespace is preserved.
///
/// Uses the ECMAScript `trimEnd` set (WhiteSpace and LineTerminator), which
/// counts U+FEFF but not U+0085.
pub fn trim_trailing(s: &str) -> &str {
    s.trim_end_matches(is_js_whitespace)
}

fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{b}' | '\u{c}' | '\n' | '\r' | '\u{2028}' | '\u{2029}' | '\u{feff}'
            // Zs
            | ' ' | '\u{a0}' | '\u{1680}' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cells_in_document_order() {
        let html = r#"
            <table><tbody>
              <tr class="row"><td>a1</td><td><span>a</span><b>2</b></td></tr>
              <tr class="other"><td>skip</td></tr>
              <tr class="row"><td>b1</td><td>b2</td></tr>
            </tbody></table>"#;

        let table = extract_rows(html, "tr.row", 2).unwrap();
        assert_eq!(table.rows, vec![vec!["a1", "a2"], vec!["b1", "b2"]]);
        assert!(table.warnings.is_empty());
        assert_eq!(table.cell(1, 0), "b1");
        assert_eq!(table.cell(1, 7), "");
        assert_eq!(table.cell(9, 0), "");
    }

    #[test]
    fn short_rows_are_kept_and_flagged() {
        let html = r#"<table><tr class="row"><td>only</td></tr></table>"#;
        let table = extract_rows(html, "tr.row", 4).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.warnings,
            vec![ExtractionWarning::MissingCells {
                row: 0,
                found: 1,
                expected: 4
            }]
        );
    }

    #[test]
    fn empty_match_is_a_warning() {
        let table = extract_rows("<p>loading…</p>", "tr.row", 4).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(
            table.warnings,
            vec![ExtractionWarning::NoRows {
                selector: "tr.row".into()
            }]
        );
    }

    #[test]
    fn bad_selector_is_a_config_error() {
        let err = extract_rows("<p></p>", "tr..row", 1).unwrap_err();
        assert!(matches!(err, GazetteError::Config(_)));
    }

    #[test]
    fn trims_only_the_end() {
        assert_eq!(trim_trailing("  Notice A \t\n"), "  Notice A");
        assert_eq!(trim_trailing("区域\u{3000}\u{feff}"), "区域");
        assert_eq!(trim_trailing(""), "");
        assert_eq!(trim_trailing(" \n "), "");
    }

    #[test]
    fn trim_set_matches_ecmascript() {
        assert_eq!(trim_trailing("Notice\u{85}"), "Notice\u{85}");
        assert_eq!(trim_trailing("Notice\u{180e}"), "Notice\u{180e}");
        assert_eq!(trim_trailing("Notice\u{200b}"), "Notice\u{200b}");
        assert_eq!(
            trim_trailing("Notice\u{b}\u{c}\u{a0}\u{2007}\u{202f}\u{2028}\u{2029}\r"),
            "Notice"
        );
    }
}
