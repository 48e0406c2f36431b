//! Read-only grid access for the evaluator.

use super::cell::Value;
use super::cell_ref::CellPos;

/// What the evaluator needs from a grid: its dimensions and the stored value
/// at a position. Absent entries are empty cells.
pub trait SheetView {
    fn num_rows(&self) -> usize;
    fn num_cols(&self) -> usize;
    fn value_at(&self, pos: CellPos) -> Option<&Value>;

    fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.num_rows() && pos.col < self.num_cols()
    }

    /// Stored value at `pos`, or `Empty` when absent or outside the grid.
    fn value(&self, pos: CellPos) -> Value {
        if !self.contains(pos) {
            return Value::Empty;
        }
        self.value_at(pos).cloned().unwrap_or_default()
    }
}

/// Dense row-major grid of values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueGrid {
    num_rows: usize,
    num_cols: usize,
    values: Vec<Value>,
}

impl ValueGrid {
    pub fn new(num_rows: usize, num_cols: usize) -> ValueGrid {
        ValueGrid {
            num_rows,
            num_cols,
            values: vec![Value::Empty; num_rows * num_cols],
        }
    }

    /// Build from ragged rows; short rows are padded with empty values.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> ValueGrid {
        let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = ValueGrid::new(rows.len(), num_cols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                grid.values[r * num_cols + c] = value;
            }
        }
        grid
    }

    /// Set a value; positions outside the grid are ignored.
    pub fn set(&mut self, pos: CellPos, value: Value) {
        if self.contains(pos) {
            self.values[pos.row * self.num_cols + pos.col] = value;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.values.chunks(self.num_cols.max(1)).take(self.num_rows)
    }
}

impl SheetView for ValueGrid {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn value_at(&self, pos: CellPos) -> Option<&Value> {
        if !self.contains(pos) {
            return None;
        }
        self.values.get(pos.row * self.num_cols + pos.col)
    }
}
