//! Formula evaluation façade.
//!
//! [`evaluate_formula`] is the single entry point callers use: tokenize the
//! formula, dispatch a function call to its built-in (or hand an arithmetic
//! body to the arithmetic evaluator), and turn every recoverable failure into
//! an `Error: ...` text value. Nothing raised internally gets past this
//! module.

use super::arith::evaluate_arithmetic;
use super::cell::Value;
use super::cell_ref::{CellPos, CellRef};
use super::error::{EvalError, EvalResult};
use super::grid::SheetView;
use super::range::extract_values;
use super::tokenize::{FormulaBody, parse_parameters, split_formula};
use crate::builtins::{self, BuiltinKind};

/// Evaluate `formula` as if typed at `anchor` in `view`.
///
/// Text that does not start with `=` is returned unchanged (as text, or
/// empty when blank or whitespace-only). Aggregates that overflow yield `0`,
/// like arithmetic. Errors become text values such as
/// `Error: Unknown function FOO`.
pub fn evaluate_formula<V: SheetView + ?Sized>(formula: &str, view: &V, anchor: CellPos) -> Value {
    match try_evaluate(formula, view, anchor) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%anchor, formula, error = %err, "formula evaluation failed");
            Value::Text(format!("Error: {}", err))
        }
    }
}

/// Like [`evaluate_formula`], but surfaces the failure instead of rendering it.
pub fn try_evaluate<V: SheetView + ?Sized>(formula: &str, view: &V, anchor: CellPos) -> EvalResult<Value> {
    let Some(body) = split_formula(formula) else {
        return Ok(if formula.trim().is_empty() {
            Value::Empty
        } else {
            Value::Text(formula.to_string())
        });
    };

    match body {
        FormulaBody::Arithmetic(expression) => {
            Ok(Value::Number(evaluate_arithmetic(&expression, view, anchor)))
        }
        FormulaBody::Call { name, args } => {
            let params = parse_parameters(&args);
            call_builtin(&name, &params, view, anchor)
        }
    }
}

fn call_builtin<V: SheetView + ?Sized>(
    name: &str,
    params: &[String],
    view: &V,
    anchor: CellPos,
) -> EvalResult<Value> {
    let builtin = builtins::lookup(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
    tracing::debug!(%anchor, function = name, params = params.len(), "calling builtin");

    match builtin.kind {
        BuiltinKind::Aggregate(f) => {
            let values = extract_values(params, view, anchor)?;
            let result = f(&values);
            if !result.is_finite() {
                tracing::debug!(function = name, "aggregate overflowed, using 0");
                return Ok(Value::Number(0.0));
            }
            Ok(Value::Number(result))
        }
        BuiltinKind::Text(f) => {
            let [param] = params else {
                return Err(EvalError::RequiresCellReference(name.to_string()));
            };
            let r = CellRef::parse_at(param, anchor)
                .ok_or_else(|| EvalError::RequiresCellReference(name.to_string()))?;
            let value = r.resolve_pos(anchor).map(|pos| view.value(pos)).unwrap_or_default();
            Ok(match value {
                Value::Text(s) => Value::Text(f(&s)),
                other => other,
            })
        }
    }
}
