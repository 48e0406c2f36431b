use std::collections::BTreeMap;
use std::fmt;

use sheetopia_engine::engine::{
    Cell, CellFormat, CellPos, RangeBounds, Value, find_and_replace, unique_rows,
};

use super::Document;
use crate::error::{Result, SheetError};

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    Row,
    Column,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Row => write!(f, "row"),
            Dimension::Column => write!(f, "column"),
        }
    }
}

impl Dimension {
    /// Get the coordinate value from a CellPos for this dimension
    fn get_coord(&self, pos: &CellPos) -> usize {
        match self {
            Dimension::Row => pos.row,
            Dimension::Column => pos.col,
        }
    }

    /// Create a new CellPos with modified coordinate in this dimension
    fn new_pos(&self, pos: &CellPos, new_coord: usize) -> CellPos {
        match self {
            Dimension::Row => CellPos::new(new_coord, pos.col),
            Dimension::Column => CellPos::new(pos.row, new_coord),
        }
    }

    fn len(&self, doc: &Document) -> usize {
        match self {
            Dimension::Row => doc.num_rows,
            Dimension::Column => doc.num_cols,
        }
    }

    fn sizes_mut<'a>(&self, doc: &'a mut Document) -> &'a mut BTreeMap<usize, f64> {
        match self {
            Dimension::Row => &mut doc.row_heights,
            Dimension::Column => &mut doc.column_widths,
        }
    }

    fn set_len(&self, doc: &mut Document, len: usize) {
        match self {
            Dimension::Row => doc.num_rows = len,
            Dimension::Column => doc.num_cols = len,
        }
    }
}

impl Document {
    /// Replace the value and formula at `pos`, keeping its format.
    pub fn set_cell(&self, pos: CellPos, value: Value, formula: Option<String>) -> Result<Document> {
        self.check_bounds(pos)?;
        let mut next = self.clone();
        let mut cell = next.get_cell(pos);
        cell.value = value;
        cell.formula = formula;
        next.put(pos, cell);
        Ok(next)
    }

    /// Set cell contents from editor input.
    ///
    /// Input beginning with `=` is stored as the formula and evaluated against
    /// the document; anything else is stored as a literal.
    pub fn set_cell_from_input(&self, pos: CellPos, input: &str) -> Result<Document> {
        let parsed = Cell::from_input(input);
        let next = self.set_cell(pos, parsed.value, parsed.formula)?;
        if next.get_cell(pos).is_formula() {
            return next.evaluate_cell(pos);
        }
        Ok(next)
    }

    /// Merge `format` over the existing format of the cell.
    pub fn set_cell_format(&self, pos: CellPos, format: &CellFormat) -> Result<Document> {
        self.check_bounds(pos)?;
        let mut next = self.clone();
        let mut cell = next.get_cell(pos);
        cell.format = Some(match &cell.format {
            Some(existing) => existing.merge(format),
            None => format.clone(),
        });
        next.put(pos, cell);
        Ok(next)
    }

    pub fn clear_cell(&self, pos: CellPos) -> Result<Document> {
        self.check_bounds(pos)?;
        let mut next = self.clone();
        next.cells.remove(&pos);
        Ok(next)
    }

    pub fn set_column_width(&self, col: usize, width: f64) -> Result<Document> {
        self.set_size(Dimension::Column, col, width)
    }

    pub fn set_row_height(&self, row: usize, height: f64) -> Result<Document> {
        self.set_size(Dimension::Row, row, height)
    }

    fn set_size(&self, dim: Dimension, index: usize, size: f64) -> Result<Document> {
        let limit = dim.len(self);
        if index >= limit {
            return Err(SheetError::IndexOutOfBounds { dim, index, limit });
        }
        let mut next = self.clone();
        dim.sizes_mut(&mut next).insert(index, size);
        Ok(next)
    }

    /// Insert a blank row before `at`. `at == num_rows` appends.
    pub fn add_row(&self, at: usize) -> Result<Document> {
        self.insert_dimension(Dimension::Row, at)
    }

    /// Insert a blank column before `at`. `at == num_cols` appends.
    pub fn add_column(&self, at: usize) -> Result<Document> {
        self.insert_dimension(Dimension::Column, at)
    }

    pub fn delete_row(&self, at: usize) -> Result<Document> {
        self.delete_dimension(Dimension::Row, at)
    }

    pub fn delete_column(&self, at: usize) -> Result<Document> {
        self.delete_dimension(Dimension::Column, at)
    }

    /// Generic insert operation for row or column.
    ///
    /// Formula text is left as written: references in moved or unmoved
    /// formulas are not rewritten.
    fn insert_dimension(&self, dim: Dimension, at: usize) -> Result<Document> {
        let limit = dim.len(self);
        if at > limit {
            return Err(SheetError::IndexOutOfBounds { dim, index: at, limit });
        }
        tracing::debug!(%dim, at, "insert");

        let mut next = self.clone();
        next.cells = self
            .cells
            .iter()
            .map(|(pos, cell)| {
                let coord = dim.get_coord(pos);
                let pos = if coord >= at { dim.new_pos(pos, coord + 1) } else { *pos };
                (pos, cell.clone())
            })
            .collect();

        let sizes = dim.sizes_mut(&mut next);
        *sizes = sizes
            .iter()
            .map(|(&i, &size)| (if i >= at { i + 1 } else { i }, size))
            .collect();

        dim.set_len(&mut next, limit + 1);
        Ok(next)
    }

    /// Generic delete operation for row or column
    fn delete_dimension(&self, dim: Dimension, at: usize) -> Result<Document> {
        let limit = dim.len(self);
        if at >= limit {
            return Err(SheetError::IndexOutOfBounds { dim, index: at, limit });
        }
        if limit == 1 {
            return Err(SheetError::CannotDeleteLast(dim));
        }
        tracing::debug!(%dim, at, "delete");

        let mut next = self.clone();
        next.cells = self
            .cells
            .iter()
            .filter(|(pos, _)| dim.get_coord(pos) != at)
            .map(|(pos, cell)| {
                let coord = dim.get_coord(pos);
                let pos = if coord > at { dim.new_pos(pos, coord - 1) } else { *pos };
                (pos, cell.clone())
            })
            .collect();

        let sizes = dim.sizes_mut(&mut next);
        *sizes = sizes
            .iter()
            .filter(|(i, _)| **i != at)
            .map(|(&i, &size)| (if i > at { i - 1 } else { i }, size))
            .collect();

        dim.set_len(&mut next, limit - 1);
        Ok(next)
    }

    /// Drop repeated rows inside `range` (e.g. `A1:C10`), keeping first
    /// occurrences in order.
    ///
    /// Rows compare by value and formula text. Surviving rows move up as
    /// whole cells, formula and format included; rows left over at the
    /// bottom of the range are cleared. Moved formula text is not rewritten.
    pub fn remove_duplicate_rows(&self, range: &str) -> Result<Document> {
        let bounds = self.range_bounds(range)?;
        let rows: Vec<Vec<Cell>> = (bounds.start.row..=bounds.end.row)
            .map(|row| {
                (bounds.start.col..=bounds.end.col)
                    .map(|col| self.get_cell(CellPos::new(row, col)))
                    .collect()
            })
            .collect();
        let keys: Vec<Vec<(&Value, Option<&str>)>> = rows
            .iter()
            .map(|row| row.iter().map(|c| (&c.value, c.formula.as_deref())).collect())
            .collect();
        let kept = unique_rows(&keys);
        tracing::debug!(range, kept = kept.len(), "remove duplicates");

        let mut next = self.clone();
        for (i, row) in (bounds.start.row..=bounds.end.row).enumerate() {
            let source = kept.get(i).map(|&k| &rows[k]);
            for (j, col) in (bounds.start.col..=bounds.end.col).enumerate() {
                let cell = source.map(|r| r[j].clone()).unwrap_or_default();
                next.put(CellPos::new(row, col), cell);
            }
        }
        Ok(next)
    }

    /// Regex replace-all over the text values inside `range`.
    pub fn find_and_replace(&self, range: &str, pattern: &str, replacement: &str) -> Result<Document> {
        let bounds = self.range_bounds(range)?;
        let replaced = find_and_replace(&bounds.block(self), pattern, replacement)?;

        let mut next = self.clone();
        for (row, values) in (bounds.start.row..=bounds.end.row).zip(replaced) {
            for (col, value) in (bounds.start.col..=bounds.end.col).zip(values) {
                next.write_value(CellPos::new(row, col), value);
            }
        }
        Ok(next)
    }

    fn range_bounds(&self, range: &str) -> Result<RangeBounds> {
        let token = range.trim().to_ascii_uppercase();
        Ok(RangeBounds::resolve(&token, CellPos::new(0, 0), self.num_rows, self.num_cols)?)
    }

    /// Overwrite a literal value in place; formula cells are skipped.
    fn write_value(&mut self, pos: CellPos, value: Value) {
        let mut cell = self.get_cell(pos);
        if cell.is_formula() {
            return;
        }
        cell.value = value;
        self.put(pos, cell);
    }
}
