//! Platform-specific path utilities.
//!
//! This module provides functions to get platform-specific paths for:
//! - The default library root
//! - The preference store file
//! - The per-project import status file

use crate::config::{AppConfig, ImportStatusConfig, LibraryConfig, SettingsConfig};
use crate::error::{Result, StockpileError};
use std::path::{Path, PathBuf};

/// Get the root of the self-seeded default library.
///
/// # Platform Behavior
/// Uses the `dirs` crate which handles platform differences:
/// - **Linux**: `~/Documents/Stockpile/Library` (XDG documents dir)
/// - **Windows**: `C:\Users\{user}\Documents\Stockpile\Library`
/// - **macOS**: `~/Documents/Stockpile/Library`
///
/// Falls back to the home directory when no documents directory is known.
pub fn default_library_root() -> Result<PathBuf> {
    let base = dirs::document_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| StockpileError::Config {
            message: "Could not determine documents or home directory".to_string(),
        })?;
    Ok(base
        .join(AppConfig::APP_NAME)
        .join(LibraryConfig::DEFAULT_LIBRARY_DIR_NAME))
}

/// Get the Stockpile configuration directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.config/stockpile`
/// - **Windows**: `%APPDATA%\stockpile`
/// - **macOS**: `~/Library/Application Support/stockpile`
pub fn stockpile_config_dir() -> Result<PathBuf> {
    let config = dirs::config_dir().ok_or_else(|| StockpileError::Config {
        message: "Could not determine config directory".to_string(),
    })?;
    Ok(config.join(AppConfig::APP_DIR_NAME))
}

/// Get the path of the JSON preference store.
pub fn preferences_path() -> Result<PathBuf> {
    Ok(stockpile_config_dir()?.join(SettingsConfig::PREFERENCES_FILENAME))
}

/// Get the import status file for a project.
///
/// Structure: `{project_root}/ProjectSettings/RxAssetImportStatus.json`
pub fn import_status_path(project_root: &Path) -> PathBuf {
    project_root
        .join(ImportStatusConfig::SETTINGS_DIR_NAME)
        .join(ImportStatusConfig::FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_status_path_is_project_relative() {
        let path = import_status_path(Path::new("/projects/demo"));
        assert!(path.starts_with("/projects/demo"));
        assert!(path.ends_with("ProjectSettings/RxAssetImportStatus.json"));
    }

    #[test]
    fn test_default_library_root_layout() {
        // Headless CI may lack a home directory; only check shape when resolvable.
        if let Ok(root) = default_library_root() {
            assert!(root.ends_with("Stockpile/Library"));
        }
    }

    #[test]
    fn test_preferences_path_file_name() {
        if let Ok(path) = preferences_path() {
            assert_eq!(path.file_name().unwrap(), "preferences.json");
        }
    }
}
