use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use sheetopia_engine::engine::{Cell, CellPos, SheetView, Value, ValueGrid};

use crate::config::{DEFAULT_COLS, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, DEFAULT_ROWS, SheetConfig};
use crate::error::{Result, SheetError};

/// Sparse spreadsheet document.
///
/// A value type: every edit returns a new `Document` and leaves the receiver
/// untouched. Only cells with content are stored; every stored key lies
/// inside `num_rows x num_cols`.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub(crate) cells: FxHashMap<CellPos, Cell>,
    pub(crate) column_widths: BTreeMap<usize, f64>,
    pub(crate) row_heights: BTreeMap<usize, f64>,
    pub(crate) num_rows: usize,
    pub(crate) num_cols: usize,
}

impl Default for Document {
    fn default() -> Self {
        Document::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Document {
    /// Create an empty document. Dimensions are raised to at least 1x1.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Document {
            cells: FxHashMap::default(),
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            num_rows: num_rows.max(1),
            num_cols: num_cols.max(1),
        }
    }

    pub fn from_config(config: &SheetConfig) -> Self {
        Document::new(config.rows, config.cols)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored (non-blank) cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stored cells in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// Stored cell at `pos`, if any.
    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// Cell at `pos`, or an empty cell when nothing is stored there.
    pub fn get_cell(&self, pos: CellPos) -> Cell {
        self.cells.get(&pos).cloned().unwrap_or_default()
    }

    pub fn value(&self, pos: CellPos) -> Value {
        self.cells.get(&pos).map(|c| c.value.clone()).unwrap_or_default()
    }

    pub fn column_width(&self, col: usize) -> f64 {
        self.column_widths.get(&col).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn row_height(&self, row: usize) -> f64 {
        self.row_heights.get(&row).copied().unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    pub fn column_widths(&self) -> &BTreeMap<usize, f64> {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &BTreeMap<usize, f64> {
        &self.row_heights
    }

    /// Dense `num_rows x num_cols` matrix of values.
    pub fn to_value_grid(&self) -> ValueGrid {
        let mut grid = ValueGrid::new(self.num_rows, self.num_cols);
        for (pos, cell) in &self.cells {
            grid.set(*pos, cell.value.clone());
        }
        grid
    }

    pub(crate) fn check_bounds(&self, pos: CellPos) -> Result<()> {
        if pos.row < self.num_rows && pos.col < self.num_cols {
            Ok(())
        } else {
            Err(SheetError::OutOfBounds {
                pos,
                rows: self.num_rows,
                cols: self.num_cols,
            })
        }
    }

    /// Store `cell` at `pos`, dropping the entry instead when the cell is blank.
    pub(crate) fn put(&mut self, pos: CellPos, cell: Cell) {
        if cell.is_blank() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, cell);
        }
    }
}

impl SheetView for Document {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn value_at(&self, pos: CellPos) -> Option<&Value> {
        self.cells.get(&pos).map(|c| &c.value)
    }
}
