//! Cell data structures for the spreadsheet grid.
//!
//! - [`Value`] - what a cell displays: empty, a number, or text
//! - [`CellFormat`] - optional presentation attributes
//! - [`Cell`] - value + optional formula source + optional format

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A scalar cell value.
///
/// Serialized untagged: `null`, a JSON number, or a JSON string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

fn leading_float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("leading float regex must compile")
    })
}

/// Parse the longest floating-point literal at the start of `text`
/// (after leading whitespace). `"3abc"` -> 3, `"x"` -> None.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let m = leading_float_re().find(text)?;
    m.as_str().parse::<f64>().ok()
}

impl Value {
    /// Numeric coercion used by aggregates and arithmetic.
    /// Numbers pass through, text is parsed as a leading float, empty is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Empty => None,
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_leading_float(s),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Interpret literal user input.
    /// - Empty string or whitespace -> Empty
    /// - Valid number -> Number
    /// - Otherwise -> Text (kept verbatim)
    pub fn from_input(input: &str) -> Value {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(input.to_string()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Presentation attributes attached to a cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl CellFormat {
    /// Field-by-field overlay: attributes set in `other` win.
    pub fn merge(&self, other: &CellFormat) -> CellFormat {
        CellFormat {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            color: other.color.clone().or_else(|| self.color.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_size: other.font_size.or(self.font_size),
        }
    }
}

/// A cell in the spreadsheet grid.
///
/// `value` is the display cache: the literal input for plain cells, the last
/// evaluation result (or error text) for formula cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<CellFormat>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            value: Value::Text(text.to_string()),
            ..Cell::default()
        }
    }

    pub fn new_number(n: f64) -> Cell {
        Cell {
            value: Value::Number(n),
            ..Cell::default()
        }
    }

    /// Create a formula cell. Until it is evaluated the value holds the
    /// formula source, as the editor showed it.
    pub fn new_formula(formula: &str) -> Cell {
        Cell {
            value: Value::Text(formula.to_string()),
            formula: Some(formula.to_string()),
            format: None,
        }
    }

    /// Parse user input and create the appropriate cell.
    /// Input starting with '=' becomes a formula, everything else a literal.
    pub fn from_input(input: &str) -> Cell {
        if input.starts_with('=') {
            return Cell::new_formula(input);
        }
        Cell {
            value: Value::from_input(input),
            ..Cell::default()
        }
    }

    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }

    /// No value, no formula and no format: storing it would be redundant.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.formula.is_none() && self.format.is_none()
    }

    /// Get a string for the formula bar (formula source or literal value).
    pub fn to_input_string(&self) -> String {
        match &self.formula {
            Some(formula) => formula.clone(),
            None => super::format::display_value(&self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_leading_float_like_parse_float() {
        assert_eq!(parse_leading_float("3"), Some(3.0));
        assert_eq!(parse_leading_float("  -2.5kg"), Some(-2.5));
        assert_eq!(parse_leading_float("3abc"), Some(3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("x"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn test_as_number_coercion() {
        assert_eq!(Value::Empty.as_number(), None);
        assert_eq!(Value::Number(5.0).as_number(), Some(5.0));
        assert_eq!(Value::from("42").as_number(), Some(42.0));
        assert_eq!(Value::from("abc").as_number(), None);
    }

    #[test]
    fn test_from_input() {
        assert_eq!(Value::from_input("  "), Value::Empty);
        assert_eq!(Value::from_input("12.5"), Value::Number(12.5));
        assert_eq!(Value::from_input(" hello "), Value::Text(" hello ".into()));
        assert_eq!(Value::from_input("inf"), Value::Text("inf".into()));

        let cell = Cell::from_input("=SUM(A1:A3)");
        assert_eq!(cell.formula.as_deref(), Some("=SUM(A1:A3)"));
        assert!(cell.is_formula());
    }

    #[test]
    fn test_format_merge_overlays_set_fields() {
        let base = CellFormat {
            bold: Some(true),
            color: Some("#ff0000".into()),
            ..CellFormat::default()
        };
        let patch = CellFormat {
            italic: Some(true),
            color: Some("#00ff00".into()),
            ..CellFormat::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.italic, Some(true));
        assert_eq!(merged.color.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_blank_cell() {
        assert!(Cell::new_empty().is_blank());
        assert!(!Cell::new_number(0.0).is_blank());
        assert!(!Cell::new_formula("=A1").is_blank());
    }
}
