//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVERAGE`); formulas are
//!   upper-cased before dispatch, so lookups are case-insensitive for users.
//! - Aggregates take any number of references/ranges and see one flattened
//!   value list. Text functions take exactly one single-cell reference.
//! - If you add a built-in, add it to `BUILTINS`; dispatch reads the table.

use crate::engine::Value;

/// How a built-in consumes its parameters.
#[derive(Clone, Copy)]
pub enum BuiltinKind {
    /// Folds the flattened values of all parameters into a number.
    Aggregate(fn(&[Value]) -> f64),
    /// Transforms the text of a single referenced cell; other values pass through.
    Text(fn(&str) -> String),
}

pub struct Builtin {
    pub name: &'static str,
    pub kind: BuiltinKind,
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        kind: BuiltinKind::Aggregate(sum),
        description: "Sum of numeric values",
    },
    Builtin {
        name: "AVERAGE",
        kind: BuiltinKind::Aggregate(average),
        description: "Average of numeric values (0 when there are none)",
    },
    Builtin {
        name: "MAX",
        kind: BuiltinKind::Aggregate(max),
        description: "Largest numeric value (0 when there are none)",
    },
    Builtin {
        name: "MIN",
        kind: BuiltinKind::Aggregate(min),
        description: "Smallest numeric value (0 when there are none)",
    },
    Builtin {
        name: "COUNT",
        kind: BuiltinKind::Aggregate(count),
        description: "Number of numeric values",
    },
    Builtin {
        name: "TRIM",
        kind: BuiltinKind::Text(trim),
        description: "Strip leading and trailing whitespace from a cell's text",
    },
    Builtin {
        name: "UPPER",
        kind: BuiltinKind::Text(upper),
        description: "Upper-case a cell's text",
    },
    Builtin {
        name: "LOWER",
        kind: BuiltinKind::Text(lower),
        description: "Lower-case a cell's text",
    },
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

fn numbers(values: &[Value]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(Value::as_number)
}

pub fn sum(values: &[Value]) -> f64 {
    numbers(values).sum()
}

pub fn count(values: &[Value]) -> f64 {
    numbers(values).count() as f64
}

pub fn average(values: &[Value]) -> f64 {
    let n = numbers(values).count();
    if n == 0 {
        return 0.0;
    }
    sum(values) / n as f64
}

pub fn max(values: &[Value]) -> f64 {
    numbers(values).reduce(f64::max).unwrap_or(0.0)
}

pub fn min(values: &[Value]) -> f64 {
    numbers(values).reduce(f64::min).unwrap_or(0.0)
}

fn trim(text: &str) -> String {
    text.trim().to_string()
}

fn upper(text: &str) -> String {
    text.to_uppercase()
}

fn lower(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_row() -> Vec<Value> {
        vec![Value::from("3"), Value::from("x"), Value::Number(5.0), Value::Empty]
    }

    #[test]
    fn test_aggregates_on_mixed_content() {
        let row = mixed_row();
        assert_eq!(sum(&row), 8.0);
        assert_eq!(count(&row), 2.0);
        assert_eq!(average(&row), 4.0);
        assert_eq!(max(&row), 5.0);
        assert_eq!(min(&row), 3.0);
    }

    #[test]
    fn test_aggregates_without_numbers_are_zero() {
        let row = vec![Value::Empty, Value::from("abc")];
        assert_eq!(sum(&row), 0.0);
        assert_eq!(count(&row), 0.0);
        assert_eq!(average(&row), 0.0);
        assert_eq!(max(&row), 0.0);
        assert_eq!(min(&row), 0.0);
        assert_eq!(max(&[]), 0.0);
    }

    #[test]
    fn test_max_min_with_negatives() {
        let row = vec![Value::Number(-4.0), Value::from("-9"), Value::Number(-1.0)];
        assert_eq!(max(&row), -1.0);
        assert_eq!(min(&row), -9.0);
    }

    #[test]
    fn test_lookup() {
        assert!(lookup("SUM").is_some());
        assert!(lookup("sum").is_none());
        assert!(lookup("FOO").is_none());
        assert!(matches!(lookup("TRIM").map(|b| b.kind), Some(BuiltinKind::Text(_))));
        assert_eq!(BUILTINS.len(), 8);
    }

    #[test]
    fn test_text_functions() {
        assert_eq!(trim("  padded \t"), "padded");
        assert_eq!(upper("MiXed"), "MIXED");
        assert_eq!(lower("MiXed"), "mixed");
    }
}
