//! Metadata persistence.
//!
//! This module provides:
//! - Atomic JSON file operations
//! - The per-version metadata record
//! - The file-system store that lays records out under a library root

mod atomic;
mod record;
mod store;

pub use atomic::{atomic_read_json, atomic_write_json};
pub use record::{file_stem, AssetVersionRecord};
pub use store::{is_metadata_file, DeleteReport, MetadataStore, VersionPaths};
