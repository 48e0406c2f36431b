//! Locating and loading the user's settings file.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use sheetopia_core::SheetConfig;
use std::path::{Path, PathBuf};

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetopia")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load settings from `explicit` if given, otherwise from the user config
/// dir. A missing default file means defaults; a missing explicit file is an
/// error.
pub fn load_config(explicit: Option<&Path>) -> Result<SheetConfig> {
    if let Some(path) = explicit {
        return SheetConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match user_config_path() {
        Some(path) if path.is_file() => SheetConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        _ => Ok(SheetConfig::default()),
    }
}
