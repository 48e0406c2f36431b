//! JSON snapshot of a document.
//!
//! ```json
//! {
//!   "cells": { "0,0": { "value": 2 }, "0,1": { "value": 5, "formula": "=A1+3" } },
//!   "columnWidths": { "0": 80 },
//!   "rowHeights": {},
//!   "numRows": 50,
//!   "numCols": 26
//! }
//! ```
//!
//! Cell keys are `"<row>,<col>"`, zero-based.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use sheetopia_engine::engine::{Cell, CellPos};

use crate::document::Document;
use crate::error::{Result, SheetError};

/// Serializable form of a [`Document`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub cells: BTreeMap<String, Cell>,
    #[serde(default)]
    pub column_widths: BTreeMap<usize, f64>,
    #[serde(default)]
    pub row_heights: BTreeMap<usize, f64>,
    pub num_rows: usize,
    pub num_cols: usize,
}

pub fn cell_key(pos: CellPos) -> String {
    format!("{},{}", pos.row, pos.col)
}

/// Parse a `"<row>,<col>"` key. Whitespace around either number is allowed.
pub fn parse_cell_key(key: &str) -> Result<CellPos> {
    let invalid = || SheetError::InvalidCellKey(key.to_string());
    let (row, col) = key.split_once(',').ok_or_else(invalid)?;
    let row = row.trim().parse::<usize>().map_err(|_| invalid())?;
    let col = col.trim().parse::<usize>().map_err(|_| invalid())?;
    Ok(CellPos::new(row, col))
}

impl Document {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self
                .cells()
                .map(|(pos, cell)| (cell_key(pos), cell.clone()))
                .collect(),
            column_widths: self.column_widths().clone(),
            row_heights: self.row_heights().clone(),
            num_rows: self.num_rows(),
            num_cols: self.num_cols(),
        }
    }

    /// Rebuild a document, rejecting zero dimensions and keys outside them.
    /// Stored values are taken as-is; call [`Document::recalculate`] to
    /// refresh formula results.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Document> {
        if snapshot.num_rows == 0 || snapshot.num_cols == 0 {
            return Err(SheetError::InvalidSnapshot(format!(
                "dimensions must be at least 1x1, got {}x{}",
                snapshot.num_rows, snapshot.num_cols
            )));
        }
        let mut doc = Document::new(snapshot.num_rows, snapshot.num_cols);
        for (key, cell) in snapshot.cells {
            let pos = parse_cell_key(&key)?;
            doc.check_bounds(pos)?;
            doc.put(pos, cell);
        }
        for (col, width) in snapshot.column_widths {
            doc = doc.set_column_width(col, width)?;
        }
        for (row, height) in snapshot.row_heights {
            doc = doc.set_row_height(row, height)?;
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Document> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Document::from_snapshot(snapshot)
    }
}

/// Load a document from a JSON snapshot file.
pub fn load_file(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)?;
    let doc = Document::from_json(&content)?;
    tracing::info!(path = %path.display(), cells = doc.len(), "loaded snapshot");
    Ok(doc)
}

/// Write a document to a JSON snapshot file.
pub fn save_file(path: &Path, doc: &Document) -> Result<()> {
    std::fs::write(path, doc.to_json()?)?;
    tracing::info!(path = %path.display(), cells = doc.len(), "saved snapshot");
    Ok(())
}
