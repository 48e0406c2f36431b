//! Markdown export functionality

use std::fmt::Write as _;
use std::path::Path;

use sheetopia_engine::engine::{CellPos, col_to_letters, display_value};

use crate::document::Document;

/// Write the grid to a markdown file
pub fn write_markdown(path: &Path, doc: &Document) -> std::io::Result<()> {
    std::fs::write(path, markdown_string(doc))?;
    tracing::info!(path = %path.display(), "exported markdown");
    Ok(())
}

/// Render the populated part of the grid as a markdown table.
pub fn markdown_string(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("# Sheet\n\n");

    let Some((min, max)) = find_grid_bounds(doc) else {
        out.push_str("*Empty spreadsheet*\n");
        return out;
    };

    // Header with column letters
    out.push_str("|   |");
    for col in min.col..=max.col {
        let _ = write!(out, " {} |", col_to_letters(col));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in min.col..=max.col {
        out.push_str("---|");
    }
    out.push('\n');

    for row in min.row..=max.row {
        let _ = write!(out, "| {} |", row + 1); // 1-based row numbers
        for col in min.col..=max.col {
            let display = display_value(&doc.value(CellPos::new(row, col)));
            let _ = write!(out, " {} |", escape_markdown(&display));
        }
        out.push('\n');
    }
    out
}

/// Top-left and bottom-right corners of the cells that display something.
fn find_grid_bounds(doc: &Document) -> Option<(CellPos, CellPos)> {
    let mut bounds: Option<(CellPos, CellPos)> = None;
    for (pos, cell) in doc.cells() {
        if cell.value.is_empty() {
            continue;
        }
        bounds = Some(match bounds {
            None => (pos, pos),
            Some((min, max)) => (
                CellPos::new(min.row.min(pos.row), min.col.min(pos.col)),
                CellPos::new(max.row.max(pos.row), max.col.max(pos.col)),
            ),
        });
    }
    bounds
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_sheet() {
        assert_eq!(markdown_string(&Document::new(3, 3)), "# Sheet\n\n*Empty spreadsheet*\n");
    }

    #[test]
    fn test_table_covers_populated_area() {
        let doc = Document::new(5, 5)
            .set_cell_from_input(CellPos::new(1, 1), "2")
            .unwrap()
            .set_cell_from_input(CellPos::new(2, 2), "a|b")
            .unwrap()
            .set_cell_from_input(CellPos::new(2, 1), "=B2*1.5")
            .unwrap();
        let expected = "# Sheet\n\n\
                        |   | B | C |\n\
                        |---|---|---|\n\
                        | 2 | 2 |  |\n\
                        | 3 | 3 | a\\|b |\n";
        assert_eq!(markdown_string(&doc), expected);
    }

    #[test]
    fn test_write_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let doc = Document::new(1, 1).set_cell_from_input(CellPos::new(0, 0), "x").unwrap();
        write_markdown(&path, &doc).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("| 1 | x |"));
    }
}
