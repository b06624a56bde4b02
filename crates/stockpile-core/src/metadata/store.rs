//! File-system store for per-version metadata records.
//!
//! Layout of a library root:
//!
//! ```text
//! <root>/<name>/<name>_v<version>.json            metadata record
//! <root>/<name>/<name>_v<version>.<bundle ext>    exported bundle
//! <root>/<name>/<name>_v<version>_thumbnail.png   optional preview
//! ```
//!
//! Nothing is cached: every call goes back to disk, since the host editor or a
//! file manager may change the library between calls.

use crate::config::LibraryConfig;
use crate::error::{Result, StockpileError};
use crate::metadata::atomic::{atomic_read_json, atomic_write_json};
use crate::metadata::record::{file_stem, AssetVersionRecord};
use crate::naming::{validate_asset_name, validate_version_label};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Paths of every file belonging to one `(name, version)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPaths {
    /// `<root>/<name>`
    pub asset_dir: PathBuf,
    pub metadata: PathBuf,
    pub bundle: PathBuf,
    pub thumbnail: PathBuf,
    /// Preview name used by older exports; only consulted on delete.
    pub legacy_preview: PathBuf,
}

impl VersionPaths {
    fn all(&self) -> [&Path; 4] {
        [
            self.metadata.as_path(),
            self.bundle.as_path(),
            self.thumbnail.as_path(),
            self.legacy_preview.as_path(),
        ]
    }
}

/// Outcome of deleting a version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Files that existed and were removed.
    pub removed: Vec<PathBuf>,
    /// Files that were already gone.
    pub missing: Vec<PathBuf>,
}

impl DeleteReport {
    /// Whether any file was actually removed.
    pub fn removed_any(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Reads and writes metadata records under library roots.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    bundle_extension: String,
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new(LibraryConfig::DEFAULT_BUNDLE_EXTENSION)
    }
}

impl MetadataStore {
    /// Create a store whose bundles use `bundle_extension` (without the dot).
    pub fn new(bundle_extension: impl Into<String>) -> Self {
        Self {
            bundle_extension: bundle_extension.into(),
        }
    }

    /// Extension of bundle files, without the leading dot.
    pub fn bundle_extension(&self) -> &str {
        &self.bundle_extension
    }

    /// Resolve the files of `(name, version)` under `root`.
    pub fn paths(&self, root: &Path, name: &str, version: &str) -> VersionPaths {
        let asset_dir = root.join(name);
        let stem = file_stem(name, version);
        VersionPaths {
            metadata: asset_dir.join(format!("{}.{}", stem, LibraryConfig::METADATA_EXTENSION)),
            bundle: asset_dir.join(format!("{}.{}", stem, self.bundle_extension)),
            thumbnail: asset_dir.join(format!("{}{}", stem, LibraryConfig::THUMBNAIL_SUFFIX)),
            legacy_preview: asset_dir
                .join(format!("{}{}", stem, LibraryConfig::LEGACY_PREVIEW_SUFFIX)),
            asset_dir,
        }
    }

    /// Write `record` to `<root>/<name>/<name>_v<version>.json`.
    ///
    /// Creates the asset folder if needed and replaces any record with the
    /// same name and version. Returns the metadata file path.
    pub fn write(&self, root: &Path, record: &AssetVersionRecord) -> Result<PathBuf> {
        validate_asset_name(&record.name)?;
        validate_version_label(&record.version)?;

        let paths = self.paths(root, &record.name, &record.version);
        fs::create_dir_all(&paths.asset_dir)
            .map_err(|e| StockpileError::io_with_path(e, &paths.asset_dir))?;
        atomic_write_json(&paths.metadata, record, false)?;

        debug!(
            "Wrote metadata for {} v{} to {}",
            record.name,
            record.version,
            paths.metadata.display()
        );
        Ok(paths.metadata)
    }

    /// Read the record of one version, if present and parsable.
    ///
    /// Names or versions that are not safe path components read as absent.
    pub fn read(&self, root: &Path, name: &str, version: &str) -> Option<AssetVersionRecord> {
        if validate_asset_name(name).is_err() || validate_version_label(version).is_err() {
            debug!("Refusing to read unsafe asset path {:?} v{:?}", name, version);
            return None;
        }
        let path = self.paths(root, name, version).metadata;
        read_record(&path)
    }

    /// Read one metadata file, returning `None` if it is unreadable, does not
    /// parse, or has no name.
    pub fn read_file(&self, path: &Path) -> Option<AssetVersionRecord> {
        read_record(path)
    }

    /// Read every metadata record anywhere under `root`.
    ///
    /// Unreadable or unparsable files, and records without a name, are
    /// skipped. A missing root yields an empty list.
    pub fn read_all(&self, root: &Path) -> Vec<AssetVersionRecord> {
        if !root.is_dir() {
            debug!("Library root {} does not exist yet", root.display());
            return Vec::new();
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for entry in WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_metadata_file(e.path()))
        {
            match read_record(entry.path()) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        info!(
            "Scanned {}: {} records, {} skipped",
            root.display(),
            records.len(),
            skipped
        );
        records
    }

    /// Remove the metadata, bundle and preview files of one version.
    ///
    /// Each file is removed independently; files that are already gone are
    /// reported as missing rather than failing the call. If removing an
    /// existing file fails, the remaining files are still attempted and the
    /// first error is returned.
    pub fn delete(&self, root: &Path, name: &str, version: &str) -> Result<DeleteReport> {
        validate_asset_name(name)?;
        validate_version_label(version)?;

        let paths = self.paths(root, name, version);
        let mut report = DeleteReport::default();
        let mut first_error = None;

        for path in paths.all() {
            match fs::remove_file(path) {
                Ok(()) => report.removed.push(path.to_path_buf()),
                Err(e) if e.kind() == ErrorKind::NotFound => report.missing.push(path.to_path_buf()),
                Err(e) => {
                    warn!("Failed to delete {}: {}", path.display(), e);
                    first_error.get_or_insert_with(|| StockpileError::io_with_path(e, path));
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        debug!(
            "Deleted {} v{}: {} removed, {} already missing",
            name,
            version,
            report.removed.len(),
            report.missing.len()
        );
        Ok(report)
    }
}

/// Whether `path` has the metadata extension.
pub fn is_metadata_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(LibraryConfig::METADATA_EXTENSION))
        .unwrap_or(false)
}

fn read_record(path: &Path) -> Option<AssetVersionRecord> {
    match atomic_read_json::<AssetVersionRecord>(path) {
        Ok(Some(record)) if !record.name.is_empty() => Some(record),
        Ok(Some(_)) => {
            debug!("Skipping {}: record has no name", path.display());
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Skipping unreadable metadata {}: {}", path.display(), e);
            None
        }
    }
}
