//! Error types for the Stockpile asset library.
//!
//! Absent or unreadable library data (a missing root, a corrupt metadata file,
//! a sibling file that was already deleted) is not represented here: those
//! cases are absorbed by the read paths and logged. What remains are genuine
//! faults the host should report to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Stockpile library.
#[derive(Debug, Error)]
pub enum StockpileError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid asset name {name:?}: {reason}")]
    InvalidAssetName { name: String, reason: String },

    // Library registry errors
    #[error("Library index {index} out of range (registry has {len} entries)")]
    LibraryIndexOutOfRange { index: usize, len: usize },

    // Catalog errors
    #[error("Asset not found in library: {name}")]
    AssetNotFound { name: String },

    #[error("Version {version} of {name} not found in library")]
    VersionNotFound { name: String, version: String },

    // Collaborator errors
    #[error("Bundle export failed: {message}")]
    BundleExport { message: String },

    #[error("Bundle import failed: {message}")]
    BundleImport { message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Stockpile operations.
pub type Result<T> = std::result::Result<T, StockpileError>;

impl From<std::io::Error> for StockpileError {
    fn from(err: std::io::Error) -> Self {
        StockpileError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for StockpileError {
    fn from(err: serde_json::Error) -> Self {
        StockpileError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl StockpileError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        StockpileError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error stems from user input rather than the environment.
    ///
    /// Hosts typically show these inline next to the offending field instead
    /// of raising a fault dialog.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StockpileError::Validation { .. }
                | StockpileError::InvalidAssetName { .. }
                | StockpileError::LibraryIndexOutOfRange { .. }
                | StockpileError::AssetNotFound { .. }
                | StockpileError::VersionNotFound { .. }
        )
    }

    /// The file system path involved in the failure, if known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StockpileError::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}
