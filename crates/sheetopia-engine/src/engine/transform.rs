//! Whole-range data cleanup: duplicate rows and find/replace.

use regex::Regex;

use super::cell::Value;
use super::error::EvalResult;
use super::range::RangeBlock;

/// Keep the first occurrence of every row, in order.
pub fn remove_duplicates(block: &[Vec<Value>]) -> RangeBlock {
    unique_rows(block).into_iter().map(|i| block[i].clone()).collect()
}

/// Indices of the first occurrence of every distinct row, ascending.
pub fn unique_rows<T: PartialEq>(block: &[Vec<T>]) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(block.len());
    for (i, row) in block.iter().enumerate() {
        if !kept.iter().any(|&k| block[k] == *row) {
            kept.push(i);
        }
    }
    kept
}

/// Regex replace-all over the text values of a block. Numbers and empty
/// cells are left alone. `replacement` may use `$1`-style group references.
pub fn find_and_replace(block: &[Vec<Value>], pattern: &str, replacement: &str) -> EvalResult<RangeBlock> {
    let re = Regex::new(pattern)?;
    Ok(block
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| match value {
                    Value::Text(s) => Value::Text(re.replace_all(s, replacement).into_owned()),
                    other => other.clone(),
                })
                .collect()
        })
        .collect())
}
