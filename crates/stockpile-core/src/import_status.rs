//! Per-project record of the last imported version of each asset.
//!
//! Persisted at `<project>/ProjectSettings/RxAssetImportStatus.json` as two
//! parallel arrays, the format earlier tooling wrote:
//!
//! ```json
//! { "keys": ["Chair"], "values": [ { "version": "1.1.0", "importedAt": "2024-05-01T12:00:00" } ] }
//! ```

use crate::error::{Result, StockpileError};
use crate::metadata::{atomic_read_json, atomic_write_json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Timestamp format of `importedAt`: ISO-8601 without offset, in UTC.
const IMPORTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Last-known import of one asset name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub version: String,
    pub imported_at: String,
}

/// On-disk parallel-array encoding.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ImportStatusFile {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    values: Vec<ImportEntry>,
}

impl ImportStatusFile {
    fn from_map(map: &BTreeMap<String, ImportEntry>) -> Self {
        let (keys, values) = map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .unzip();
        Self { keys, values }
    }

    fn into_map(self) -> BTreeMap<String, ImportEntry> {
        if self.keys.len() != self.values.len() {
            warn!(
                "Import status has {} keys but {} values, ignoring the excess",
                self.keys.len(),
                self.values.len()
            );
        }
        self.keys.into_iter().zip(self.values).collect()
    }
}

/// Lazily loaded, write-through cache of the import status file.
///
/// The file is read on first access and not re-read afterwards unless
/// [`ImportStatusCache::reload`] is called. Every update rewrites the whole
/// file before returning.
#[derive(Debug)]
pub struct ImportStatusCache {
    path: PathBuf,
    entries: Option<BTreeMap<String, ImportEntry>>,
}

impl ImportStatusCache {
    /// Cache backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: None,
        }
    }

    /// Cache backed by the standard file inside `project_root`.
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(crate::platform::import_status_path(project_root))
    }

    /// File backing the cache.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&mut self) -> Result<&mut BTreeMap<String, ImportEntry>> {
        if self.entries.is_none() {
            let entries = match atomic_read_json::<ImportStatusFile>(&self.path) {
                Ok(file) => file.map(ImportStatusFile::into_map).unwrap_or_default(),
                Err(StockpileError::Json { message, .. }) => {
                    warn!("Ignoring unreadable import status: {}", message);
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            debug!("Loaded {} import status entries", entries.len());
            self.entries = Some(entries);
        }
        Ok(self.entries.get_or_insert_with(BTreeMap::new))
    }

    /// Last import of `name`, if any.
    pub fn get(&mut self, name: &str) -> Result<Option<ImportEntry>> {
        Ok(self.loaded()?.get(name).cloned())
    }

    /// Version of `name` last imported into the project.
    pub fn imported_version(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name)?.map(|e| e.version))
    }

    /// Whether the project's copy of `name` is at `version`.
    pub fn is_imported(&mut self, name: &str, version: &str) -> Result<bool> {
        Ok(self.get(name)?.is_some_and(|e| e.version == version))
    }

    /// Record that `version` of `name` was just imported and persist.
    ///
    /// The in-memory map only changes once the file has been written.
    pub fn set(&mut self, name: &str, version: &str) -> Result<ImportEntry> {
        let entry = ImportEntry {
            version: version.to_string(),
            imported_at: Utc::now().format(IMPORTED_AT_FORMAT).to_string(),
        };

        let mut updated = self.loaded()?.clone();
        updated.insert(name.to_string(), entry.clone());
        atomic_write_json(&self.path, &ImportStatusFile::from_map(&updated), false)?;
        self.entries = Some(updated);

        debug!("Recorded import of {} v{}", name, version);
        Ok(entry)
    }

    /// All known entries, sorted by asset name.
    pub fn entries(&mut self) -> Result<Vec<(String, ImportEntry)>> {
        Ok(self
            .loaded()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Forget the cached map; the next access re-reads the file.
    pub fn reload(&mut self) {
        self.entries = None;
    }
}
