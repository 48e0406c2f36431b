//! Range extraction.
//!
//! Turns a parameter token (`B2` or `A1:C3`) into the rectangular block of
//! values it denotes. Range endpoints are resolved against the evaluation
//! anchor, clamped into the grid independently per axis, and normalized so
//! that a range written backwards (`B3:A1`) yields the same block as its
//! forward spelling.

use super::cell::Value;
use super::cell_ref::{CellPos, CellRef};
use super::error::{EvalError, EvalResult};
use super::grid::SheetView;

/// Values of a range, row-major.
pub type RangeBlock = Vec<Vec<Value>>;

/// A normalized, in-grid rectangle (inclusive on both ends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeBounds {
    pub start: CellPos,
    pub end: CellPos,
}

fn clamp_coord(v: i64, len: usize) -> usize {
    let max = len.saturating_sub(1);
    usize::try_from(v.max(0)).map_or(max, |v| v.min(max))
}

impl RangeBounds {
    /// Resolve a `ref:ref` token against `anchor` and clamp it into a grid of
    /// `num_rows` x `num_cols`. The token is split once on `:`; both sides
    /// must be valid references.
    pub fn resolve(token: &str, anchor: CellPos, num_rows: usize, num_cols: usize) -> EvalResult<RangeBounds> {
        let (start_token, end_token) = token
            .split_once(':')
            .ok_or_else(|| EvalError::InvalidRange(token.to_string()))?;
        let (Some(start), Some(end)) = (
            CellRef::parse_at(start_token.trim(), anchor),
            CellRef::parse_at(end_token.trim(), anchor),
        ) else {
            return Err(EvalError::InvalidRange(token.to_string()));
        };

        let (start_row, start_col) = start.resolve(anchor);
        let (end_row, end_col) = end.resolve(anchor);

        let mut r0 = clamp_coord(start_row, num_rows);
        let mut r1 = clamp_coord(end_row, num_rows);
        let mut c0 = clamp_coord(start_col, num_cols);
        let mut c1 = clamp_coord(end_col, num_cols);
        if r0 > r1 {
            std::mem::swap(&mut r0, &mut r1);
        }
        if c0 > c1 {
            std::mem::swap(&mut c0, &mut c1);
        }

        Ok(RangeBounds {
            start: CellPos::new(r0, c0),
            end: CellPos::new(r1, c1),
        })
    }

    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        (self.start.row..=self.end.row).contains(&pos.row)
            && (self.start.col..=self.end.col).contains(&pos.col)
    }

    /// Positions of the rectangle, row-major.
    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| (self.start.col..=self.end.col).map(move |col| CellPos::new(row, col)))
    }

    pub fn block<V: SheetView + ?Sized>(&self, view: &V) -> RangeBlock {
        (self.start.row..=self.end.row)
            .map(|row| {
                (self.start.col..=self.end.col)
                    .map(|col| view.value(CellPos::new(row, col)))
                    .collect()
            })
            .collect()
    }
}

/// Extract the block a parameter denotes.
///
/// A token without `:` is a single reference and yields a 1x1 block (empty
/// when it points outside the grid). A token that is neither a reference nor
/// a well-formed range is an error.
pub fn extract_range<V: SheetView + ?Sized>(token: &str, view: &V, anchor: CellPos) -> EvalResult<RangeBlock> {
    if !token.contains(':') {
        let r = CellRef::parse_at(token, anchor)
            .ok_or_else(|| EvalError::InvalidReference(token.to_string()))?;
        let value = r.resolve_pos(anchor).map(|pos| view.value(pos)).unwrap_or_default();
        return Ok(vec![vec![value]]);
    }

    if view.num_rows() == 0 || view.num_cols() == 0 {
        return Ok(Vec::new());
    }
    let bounds = RangeBounds::resolve(token, anchor, view.num_rows(), view.num_cols())?;
    Ok(bounds.block(view))
}

/// Flatten parameters into one value list, in argument order.
///
/// Ranges contribute their block row-major. Single references inside the
/// grid contribute their value; anything else that is not a range is skipped.
pub fn extract_values<V: SheetView + ?Sized>(params: &[String], view: &V, anchor: CellPos) -> EvalResult<Vec<Value>> {
    let mut values = Vec::new();
    for param in params {
        if param.contains(':') {
            for row in extract_range(param, view, anchor)? {
                values.extend(row);
            }
            continue;
        }
        if let Some(pos) = CellRef::parse_at(param, anchor).and_then(|r| r.resolve_pos(anchor))
            && view.contains(pos)
        {
            values.push(view.value(pos));
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ValueGrid;
    use pretty_assertions::assert_eq;

    fn sample() -> ValueGrid {
        ValueGrid::from_rows(vec![
            vec![1.0.into(), 2.0.into(), 3.0.into()],
            vec![4.0.into(), 5.0.into(), 6.0.into()],
            vec![7.0.into(), 8.0.into(), 9.0.into()],
        ])
    }

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn test_backwards_range_is_normalized() {
        let grid = sample();
        let a = CellPos::new(0, 0);
        let forward = extract_range("A1:B3", &grid, a).unwrap();
        let backward = extract_range("B3:A1", &grid, a).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward, vec![vec![n(1.0), n(2.0)], vec![n(4.0), n(5.0)], vec![n(7.0), n(8.0)]]);
    }

    #[test]
    fn test_mixed_direction_range_is_normalized_per_axis() {
        let grid = sample();
        let block = extract_range("B1:A2", &grid, CellPos::new(0, 0)).unwrap();
        assert_eq!(block, vec![vec![n(1.0), n(2.0)], vec![n(4.0), n(5.0)]]);
    }

    #[test]
    fn test_range_is_clamped_to_grid() {
        let grid = sample();
        let block = extract_range("B2:Z100", &grid, CellPos::new(0, 0)).unwrap();
        assert_eq!(block, vec![vec![n(5.0), n(6.0)], vec![n(8.0), n(9.0)]]);
    }

    #[test]
    fn test_range_is_clamped_above_and_left_of_grid() {
        let grid = sample();
        // "A0" resolves to row -1, above the grid.
        let block = extract_range("A0:B2", &grid, CellPos::new(2, 2)).unwrap();
        assert_eq!(block, vec![vec![n(1.0), n(2.0)], vec![n(4.0), n(5.0)]]);

        let bounds = RangeBounds::resolve("$A$0:$B$0", CellPos::new(0, 0), 3, 3).unwrap();
        assert_eq!(bounds.start, CellPos::new(0, 0));
        assert_eq!(bounds.end, CellPos::new(0, 1));
    }

    #[test]
    fn test_relative_range_follows_anchor() {
        let grid = sample();
        // Written at C3 as "A1:A2"; evaluated from the same anchor it is column A.
        let anchor = CellPos::new(2, 2);
        let block = extract_range("A1:A2", &grid, anchor).unwrap();
        assert_eq!(block, vec![vec![n(1.0)], vec![n(4.0)]]);

        let absolute = extract_range("$C$1:$C$1", &grid, CellPos::new(1, 1)).unwrap();
        assert_eq!(absolute, vec![vec![n(3.0)]]);
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let mut grid = ValueGrid::new(2, 2);
        grid.set(CellPos::new(0, 0), n(1.0));
        let block = extract_range("A1:B2", &grid, CellPos::new(0, 0)).unwrap();
        assert_eq!(block, vec![vec![n(1.0), Value::Empty], vec![Value::Empty, Value::Empty]]);
    }

    #[test]
    fn test_single_reference_is_one_by_one() {
        let grid = sample();
        assert_eq!(extract_range("C2", &grid, CellPos::new(0, 0)).unwrap(), vec![vec![n(6.0)]]);
        assert_eq!(extract_range("Z99", &grid, CellPos::new(0, 0)).unwrap(), vec![vec![Value::Empty]]);
    }

    #[test]
    fn test_malformed_ranges_are_errors() {
        let grid = sample();
        let a = CellPos::new(0, 0);
        for token in ["A1:B2:C3", "A1:", ":B2", "A1:foo", "1:2"] {
            assert!(
                matches!(extract_range(token, &grid, a), Err(EvalError::InvalidRange(_))),
                "{token:?}"
            );
        }
        assert!(matches!(extract_range("foo", &grid, a), Err(EvalError::InvalidReference(_))));
    }

    #[test]
    fn test_extract_values_flattens_in_argument_order() {
        let grid = sample();
        let params = vec!["C3".to_string(), "A1:B2".to_string(), "junk".to_string(), "Z9".to_string()];
        let values = extract_values(&params, &grid, CellPos::new(0, 0)).unwrap();
        assert_eq!(values, vec![n(9.0), n(1.0), n(2.0), n(4.0), n(5.0)]);
    }

    #[test]
    fn test_bounds_positions_row_major() {
        let bounds = RangeBounds::resolve("B2:A1", CellPos::new(0, 0), 10, 10).unwrap();
        assert_eq!(bounds.row_count(), 2);
        assert_eq!(bounds.col_count(), 2);
        assert!(bounds.contains(CellPos::new(1, 0)));
        let positions: Vec<_> = bounds.positions().map(|p| p.to_string()).collect();
        assert_eq!(positions, vec!["A1", "B1", "A2", "B2"]);
    }
}
