//! Sheet settings loaded from TOML.
//!
//! ```toml
//! rows = 100
//! cols = 26
//! undo_limit = 50
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, SheetError};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_ROWS: usize = 50;
pub const DEFAULT_COLS: usize = 26;
pub const DEFAULT_COLUMN_WIDTH: f64 = 64.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 24.0;
pub const DEFAULT_UNDO_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Rows in a new document.
    pub rows: usize,
    /// Columns in a new document.
    pub cols: usize,
    /// Snapshots kept by [`History`](crate::History).
    pub undo_limit: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

impl SheetConfig {
    pub fn from_toml(content: &str) -> Result<SheetConfig> {
        let config: SheetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a file, refusing files over 1 MiB.
    pub fn load(path: &Path) -> Result<SheetConfig> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(SheetError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: config file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SheetError::InvalidConfig(
                "config rows and cols must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SheetConfig::from_toml("").unwrap(), SheetConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = SheetConfig::from_toml("rows = 10").unwrap();
        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.undo_limit, DEFAULT_UNDO_LIMIT);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(SheetConfig::from_toml("colour = 1"), Err(SheetError::Config(_))));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(SheetConfig::from_toml("rows = 0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cols = 5\nundo_limit = 3\n").unwrap();
        let config = SheetConfig::load(&path).unwrap();
        assert_eq!(config.cols, 5);
        assert_eq!(config.undo_limit, 3);
    }
}
