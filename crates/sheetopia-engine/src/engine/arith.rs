//! Arithmetic formulas.
//!
//! A formula that is not a single function call is evaluated in two steps:
//!
//! 1. every reference token (`A1`, `$B$2`, ...) is replaced by the numeric
//!    value of the cell it resolves to (empty or non-numeric -> `0`);
//! 2. the resulting text is parsed and evaluated by a small recursive-descent
//!    evaluator that knows numbers, `+ - * /`, unary signs and parentheses.
//!
//! Anything that goes wrong yields `0`. Input length and nesting depth are
//! bounded so a hostile formula cannot make evaluation run away.
//!
//! ```bnf
//! Expr    ::= Term ( ( "+" | "-" ) Term )*
//! Term    ::= Unary ( ( "*" | "/" ) Unary )*
//! Unary   ::= ( "+" | "-" ) Unary | Primary
//! Primary ::= Number | "(" Expr ")"
//! Number  ::= [0-9]+ ( "." [0-9]* )? Exp? | "." [0-9]+ Exp?
//! Exp     ::= ( "e" | "E" ) ( "+" | "-" )? [0-9]+
//! ```

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::cell_ref::{CellPos, CellRef};
use super::grid::SheetView;

const MAX_EXPRESSION_LEN: usize = 8192;
const MAX_DEPTH: usize = 64;

fn embedded_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\$?[A-Z]+\$?[0-9]+)").expect("embedded reference regex must compile"))
}

/// Replace every reference in `expression` with its parenthesized numeric value.
pub fn substitute_references<V: SheetView + ?Sized>(expression: &str, view: &V, anchor: CellPos) -> String {
    embedded_ref_re()
        .replace_all(expression, |caps: &Captures| {
            let n = CellRef::parse_at(&caps[1], anchor)
                .and_then(|r| r.resolve_pos(anchor))
                .and_then(|pos| view.value(pos).as_number())
                .filter(|n| n.is_finite())
                .unwrap_or(0.0);
            format!("({})", n)
        })
        .into_owned()
}

/// Evaluate an upper-cased arithmetic formula body against `view`.
/// Returns `0` when the expression cannot be evaluated to a finite number.
pub fn evaluate_arithmetic<V: SheetView + ?Sized>(expression: &str, view: &V, anchor: CellPos) -> f64 {
    if expression.len() > MAX_EXPRESSION_LEN {
        tracing::debug!(len = expression.len(), "arithmetic expression too long");
        return 0.0;
    }
    let substituted = substitute_references(expression, view, anchor);
    match eval_expression(&substituted) {
        Some(n) => n,
        None => {
            tracing::debug!(expression = %substituted, "arithmetic evaluation failed, using 0");
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        let token = match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        while j < bytes.len() && bytes[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let n = text[start..i].parse::<f64>().ok()?;
                tokens.push(Token::Number(n));
                continue;
            }
            _ => return None,
        };
        tokens.push(token);
        i += 1;
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.peek()?;
        self.pos += 1;
        Some(t)
    }

    fn enter(&mut self) -> Option<()> {
        self.depth += 1;
        (self.depth <= MAX_DEPTH).then_some(())
    }

    fn parse_expr(&mut self) -> Option<f64> {
        let mut acc = self.parse_term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_term()?;
            acc = if op == Token::Plus { acc + rhs } else { acc - rhs };
        }
        Some(acc)
    }

    fn parse_term(&mut self) -> Option<f64> {
        let mut acc = self.parse_unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            acc = if op == Token::Star { acc * rhs } else { acc / rhs };
        }
        Some(acc)
    }

    fn parse_unary(&mut self) -> Option<f64> {
        match self.peek()? {
            Token::Plus | Token::Minus => {
                let op = self.advance()?;
                self.enter()?;
                let v = self.parse_unary()?;
                self.depth -= 1;
                Some(if op == Token::Minus { -v } else { v })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Option<f64> {
        match self.advance()? {
            Token::Number(n) => Some(n),
            Token::LParen => {
                self.enter()?;
                let v = self.parse_expr()?;
                self.depth -= 1;
                match self.advance()? {
                    Token::RParen => Some(v),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Evaluate a plain numeric expression. `None` for malformed input,
/// excessive nesting, or a non-finite result.
pub fn eval_expression(text: &str) -> Option<f64> {
    if text.len() > MAX_EXPRESSION_LEN {
        return None;
    }
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Value, ValueGrid};

    #[test]
    fn test_eval_expression_precedence() {
        assert_eq!(eval_expression("1 + 2 * 3"), Some(7.0));
        assert_eq!(eval_expression("(1 + 2) * 3"), Some(9.0));
        assert_eq!(eval_expression("10 / 4 - 1"), Some(1.5));
        assert_eq!(eval_expression("8 - 3 - 2"), Some(3.0));
        assert_eq!(eval_expression("2 * -3"), Some(-6.0));
        assert_eq!(eval_expression("--2"), Some(2.0));
        assert_eq!(eval_expression("1.5e2 + .5"), Some(150.5));
    }

    #[test]
    fn test_eval_expression_failures() {
        assert_eq!(eval_expression(""), None);
        assert_eq!(eval_expression("1 +"), None);
        assert_eq!(eval_expression("(1 + 2"), None);
        assert_eq!(eval_expression("1 + 2)"), None);
        assert_eq!(eval_expression("1 / 0"), None);
        assert_eq!(eval_expression("0 / 0"), None);
        assert_eq!(eval_expression("1..2"), None);
        assert_eq!(eval_expression("2 ^ 3"), None);
        assert_eq!(eval_expression("alert(1)"), None);
    }

    #[test]
    fn test_eval_expression_depth_is_bounded() {
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(eval_expression(&deep), None);
        let unary = format!("{}1", "-".repeat(5_000));
        assert_eq!(eval_expression(&unary), None);
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(eval_expression(&ok), Some(1.0));
    }

    #[test]
    fn test_substitute_references() {
        let grid = ValueGrid::from_rows(vec![vec![Value::Number(-2.0), Value::from("x"), Value::from("4")]]);
        let anchor = CellPos::new(0, 3);
        assert_eq!(substitute_references("A1*B1+C1", &grid, anchor), "(-2)*(0)+(4)");
        assert_eq!(substitute_references("Z99", &grid, anchor), "(0)");
    }

    #[test]
    fn test_evaluate_arithmetic_with_refs() {
        let grid = ValueGrid::from_rows(vec![vec![Value::Number(2.0), Value::Number(3.0)]]);
        let anchor = CellPos::new(0, 2);
        assert_eq!(evaluate_arithmetic("A1+B1", &grid, anchor), 5.0);
        assert_eq!(evaluate_arithmetic("A1-B1*2", &grid, anchor), -4.0);
        assert_eq!(evaluate_arithmetic("$A$1/(B1-3)", &grid, anchor), 0.0);
        assert_eq!(evaluate_arithmetic("A1 +", &grid, anchor), 0.0);
        assert_eq!(evaluate_arithmetic("HELLO", &grid, anchor), 0.0);
    }
}
