//! Recoverable evaluation errors.
//!
//! None of these escape [`evaluate_formula`](super::evaluate_formula): the
//! façade renders them as `Error: <message>` text values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Unknown function {0}")]
    UnknownFunction(String),

    #[error("{0} requires a cell reference")]
    RequiresCellReference(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;
