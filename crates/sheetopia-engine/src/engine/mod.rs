//! Spreadsheet engine API.
//!
//! This module provides the formula evaluation engine:
//!
//! - [`Cell`], [`Value`], [`CellFormat`] - Data structures for cell contents
//! - [`CellPos`], [`CellRef`] - Grid positions and parsed reference tokens
//! - [`col_to_letters`], [`letters_to_col`] - Column letter codec
//! - [`SheetView`], [`ValueGrid`] - Read-only grid access for evaluation
//! - [`split_formula`], [`parse_parameters`] - Formula tokenizing
//! - [`extract_range`], [`extract_values`] - Range extraction
//! - [`evaluate_arithmetic`] - Reference substitution + bounded arithmetic
//! - [`evaluate_formula`] - The evaluation façade
//! - [`display_value`] - Format values for display

mod arith;
mod cell;
mod cell_ref;
mod error;
mod eval;
mod format;
mod grid;
mod range;
mod tokenize;
mod transform;

pub use arith::{eval_expression, evaluate_arithmetic, substitute_references};
pub use cell::{Cell, CellFormat, Value, parse_leading_float};
pub use cell_ref::{CellPos, CellRef, col_to_letters, letters_to_col};
pub use error::{EvalError, EvalResult};
pub use eval::{evaluate_formula, try_evaluate};
pub use format::{column_headers, display_value, format_number, row_headers};
pub use grid::{SheetView, ValueGrid};
pub use range::{RangeBlock, RangeBounds, extract_range, extract_values};
pub use tokenize::{FormulaBody, parse_parameters, split_formula};
pub use transform::{find_and_replace, remove_duplicates, unique_rows};
