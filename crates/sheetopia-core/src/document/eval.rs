//! Formula evaluation against a document.

use sheetopia_engine::engine::{CellPos, Value, evaluate_formula};

use super::Document;
use crate::error::Result;

impl Document {
    /// Evaluate `formula` as if it were typed at `anchor`. Never fails:
    /// problems come back as `Error: ...` text values.
    pub fn evaluate(&self, formula: &str, anchor: CellPos) -> Value {
        evaluate_formula(formula, self, anchor)
    }

    /// Re-evaluate the formula stored at `pos` and write the result back.
    /// Cells without a formula are returned unchanged.
    pub fn evaluate_cell(&self, pos: CellPos) -> Result<Document> {
        self.check_bounds(pos)?;
        let Some(formula) = self.cell(pos).and_then(|c| c.formula.clone()) else {
            return Ok(self.clone());
        };
        let value = self.evaluate(&formula, pos);
        tracing::debug!(%pos, %formula, ?value, "evaluated cell");
        let mut next = self.clone();
        let mut cell = next.get_cell(pos);
        cell.value = value;
        next.put(pos, cell);
        Ok(next)
    }

    /// Re-evaluate every formula cell once.
    ///
    /// Each formula sees the document as it was before the pass, so a formula
    /// reading another formula's cell gets that cell's previous value.
    pub fn recalculate(&self) -> Document {
        let mut next = self.clone();
        let mut count = 0usize;
        for (pos, cell) in self.cells() {
            let Some(formula) = &cell.formula else {
                continue;
            };
            let value = self.evaluate(formula, pos);
            if let Some(target) = next.cells.get_mut(&pos) {
                target.value = value;
            }
            count += 1;
        }
        tracing::debug!(formulas = count, "recalculated");
        next
    }
}
