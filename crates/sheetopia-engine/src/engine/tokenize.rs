//! Formula tokenizing.
//!
//! A formula is either a single function call (`=SUM(A1:B3, C1)`) or an
//! arithmetic expression (`=A1*2+B1`). The call shape is recognised on the
//! upper-cased text after the leading `=`; the argument text is then split
//! into top-level parameters.

use regex::Regex;
use std::sync::OnceLock;

/// How a formula body is to be evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaBody {
    /// `NAME(args)`: upper-cased function name and raw argument text.
    Call { name: String, args: String },
    /// Anything else, upper-cased.
    Arithmetic(String),
}

fn function_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z_]+)\((.*)\)$").expect("function call regex must compile"))
}

/// Split a formula into its body. Returns `None` when the text does not start
/// with `=` (it is a literal, not a formula).
pub fn split_formula(formula: &str) -> Option<FormulaBody> {
    let expression = formula.strip_prefix('=')?.to_uppercase();
    let body = match function_call_re().captures(&expression) {
        Some(caps) => FormulaBody::Call {
            name: caps[1].to_string(),
            args: caps[2].to_string(),
        },
        None => FormulaBody::Arithmetic(expression),
    };
    Some(body)
}

/// Split an argument list on top-level commas.
///
/// Commas inside parentheses do not split. Each parameter is trimmed; a
/// trailing parameter is only kept when it is non-empty.
pub fn parse_parameters(args: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in args.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                params.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        params.push(last.to_string());
    }
    params
}
