//! Stockpile Core - Versioned asset libraries for game editors.
//!
//! A library is a plain folder. Every exported version of an asset lives in
//! `<library>/<name>/` as a bundle file, a JSON metadata record and an
//! optional thumbnail. This crate scans those folders into a browsable
//! catalog, keeps the user's list of libraries in the host's preference
//! store, and remembers which version each project last imported.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockpile_core::{AssetShelf, ExportRequest};
//!
//! fn main() -> stockpile_core::Result<()> {
//!     let mut shelf = AssetShelf::builder("/path/to/project").build(exporter, importer)?;
//!
//!     // Export the first version of a prop
//!     let request = ExportRequest::new("Chair", "Props", "1.0.0")
//!         .with_tags_csv("wood, indoor")
//!         .with_source_asset("Assets/Chair.prefab");
//!     shelf.export(&request)?;
//!
//!     // Browse the active library
//!     for group in shelf.browse("wood")? {
//!         println!("{}: {} assets", group.category, group.assets.len());
//!     }
//!
//!     // Pull a version into the project
//!     shelf.import("Chair", "1.0.0")?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod import_status;
pub mod metadata;
pub mod naming;
pub mod platform;
pub mod registry;
pub mod shelf;
pub mod version;

// Re-export commonly used types
pub use catalog::{AssetGroup, Catalog, CatalogBuilder, CatalogCache, CategoryGroup};
pub use error::{Result, StockpileError};
pub use import_status::{ImportEntry, ImportStatusCache};
pub use metadata::{AssetVersionRecord, DeleteReport, MetadataStore, VersionPaths};
pub use registry::{
    JsonPreferenceStore, LibraryEntry, LibraryRegistry, MemoryPreferenceStore, PreferenceStore,
};
pub use shelf::{
    AssetShelf, AssetShelfBuilder, BundleExporter, BundleImporter, ExportRequest,
    ExportedVersion, ThumbnailSource,
};
pub use version::VersionPolicy;
