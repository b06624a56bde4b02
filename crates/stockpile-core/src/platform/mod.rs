//! Platform abstraction layer.
//!
//! Resolves the platform-standard locations Stockpile falls back to when the
//! host does not supply explicit paths.

mod paths;

pub use paths::{default_library_root, import_status_path, preferences_path, stockpile_config_dir};
