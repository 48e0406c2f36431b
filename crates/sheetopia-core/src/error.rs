//! Error types for Sheetopia core.

use thiserror::Error;

use sheetopia_engine::engine::{CellPos, EvalError};

use crate::document::Dimension;

/// Errors that can occur in the Sheetopia document layer
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid cell key: {0:?}")]
    InvalidCellKey(String),

    #[error("Cell {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds { pos: CellPos, rows: usize, cols: usize },

    #[error("{dim} index {index} is outside 0..{limit}")]
    IndexOutOfBounds { dim: Dimension, index: usize, limit: usize },

    #[error("Cannot delete the last {0}")]
    CannotDeleteLast(Dimension),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub type Result<T> = std::result::Result<T, SheetError>;
