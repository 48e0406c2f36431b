use super::cell::Value;
use super::cell_ref::col_to_letters;

/// Format a value for display in a cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Empty => String::new(),
        Value::Number(n) => format_number(*n),
        Value::Text(s) => s.clone(),
    }
}

/// Format a number the way a browser's `String(n)` would for everyday
/// magnitudes: integers without a fraction, shortest round-trip otherwise.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // -0 displays as 0
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Column header labels: A, B, ..., Z, AA, ...
pub fn column_headers(num_cols: usize) -> Vec<String> {
    (0..num_cols).map(col_to_letters).collect()
}

/// Row header labels (1-based).
pub fn row_headers(num_rows: usize) -> Vec<usize> {
    (1..=num_rows).collect()
}
