//! sheetopia-core - UI-agnostic document model + storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::SheetConfig;
pub use document::{Dimension, Document, History};
pub use error::{Result, SheetError};

pub use sheetopia_engine::engine::{Cell, CellFormat, CellPos, Value};
