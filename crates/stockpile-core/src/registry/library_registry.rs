//! Preference-backed registry of library roots.

use crate::config::{LibraryConfig, SettingsConfig};
use crate::error::{Result, StockpileError};
use crate::registry::preferences::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A registered library root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// User-editable label; need not be unique.
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "path")]
    pub root_path: PathBuf,
}

impl LibraryEntry {
    pub fn new(display_name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            display_name: display_name.into(),
            root_path: root_path.into(),
        }
    }

    /// Entry for `folder`, labelled with the folder's base name.
    pub fn from_folder(folder: impl Into<PathBuf>) -> Self {
        let root_path = folder.into();
        let display_name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root_path.display().to_string());
        Self {
            display_name,
            root_path,
        }
    }
}

/// Persisted shape of the library list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LibraryList {
    #[serde(default)]
    entries: Vec<LibraryEntry>,
}

/// Ordered list of library roots with an active selection.
///
/// Entries are identified by position. The list is never empty: a default
/// entry is seeded on first use and again whenever the last entry is removed.
/// The active index is stored raw and clamped whenever it is read, so an index
/// left dangling by a removal heals itself.
#[derive(Debug)]
pub struct LibraryRegistry {
    prefs: Box<dyn PreferenceStore>,
    default_root: PathBuf,
    /// Cached list; `None` until first loaded.
    entries: Option<Vec<LibraryEntry>>,
}

impl LibraryRegistry {
    /// Create a registry over `prefs`, seeding `default_root` when empty.
    pub fn new(prefs: Box<dyn PreferenceStore>, default_root: impl Into<PathBuf>) -> Self {
        Self {
            prefs,
            default_root: default_root.into(),
            entries: None,
        }
    }

    /// Root used for the self-seeded default entry.
    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    fn default_entry(&self) -> LibraryEntry {
        LibraryEntry::new(LibraryConfig::DEFAULT_LIBRARY_NAME, &self.default_root)
    }

    // ========================================
    // Loading and saving
    // ========================================

    /// The library list, loading it from preferences on first call.
    pub fn load(&mut self) -> Result<&[LibraryEntry]> {
        if self.entries.is_none() {
            let persisted = self.read_persisted();
            if persisted.is_empty() {
                debug!("No libraries registered, seeding default");
                self.save(Vec::new())?;
            } else {
                self.entries = Some(persisted);
            }
        }
        Ok(self.entries.as_deref().unwrap_or(&[]))
    }

    fn read_persisted(&self) -> Vec<LibraryEntry> {
        let Some(json) = self.prefs.get_string(SettingsConfig::LIBRARIES_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<LibraryList>(&json) {
            Ok(list) => list.entries,
            Err(e) => {
                warn!("Ignoring unreadable library list: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist `entries` as the full library list in one write.
    ///
    /// An empty list is replaced by the default entry.
    pub fn save(&mut self, mut entries: Vec<LibraryEntry>) -> Result<()> {
        if entries.is_empty() {
            entries.push(self.default_entry());
        }

        let list = LibraryList { entries };
        let json = serde_json::to_string(&list)?;
        self.prefs.set_string(SettingsConfig::LIBRARIES_KEY, &json)?;

        debug!("Saved {} library entries", list.entries.len());
        self.entries = Some(list.entries);
        Ok(())
    }

    /// Drop the cached list so the next read goes back to preferences.
    pub fn reload(&mut self) {
        self.entries = None;
    }

    /// Number of registered libraries.
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Entry at `index`.
    pub fn get(&mut self, index: usize) -> Result<LibraryEntry> {
        let entries = self.load()?;
        entries
            .get(index)
            .cloned()
            .ok_or(StockpileError::LibraryIndexOutOfRange {
                index,
                len: entries.len(),
            })
    }

    // ========================================
    // Active selection
    // ========================================

    /// Active index, clamped into the current list.
    pub fn active_index(&mut self) -> Result<usize> {
        let len = self.load()?.len();
        let raw = self
            .prefs
            .get_int(SettingsConfig::ACTIVE_LIBRARY_KEY)
            .unwrap_or(0)
            .max(0);
        let raw = usize::try_from(raw).unwrap_or(usize::MAX);
        Ok(raw.min(len.saturating_sub(1)))
    }

    /// Store `index` as the active library without range checks.
    pub fn set_active(&mut self, index: usize) -> Result<()> {
        let value = i64::try_from(index).unwrap_or(i64::MAX);
        self.prefs.set_int(SettingsConfig::ACTIVE_LIBRARY_KEY, value)
    }

    fn raw_active(&self) -> Option<usize> {
        self.prefs
            .get_int(SettingsConfig::ACTIVE_LIBRARY_KEY)
            .and_then(|i| usize::try_from(i).ok())
    }

    /// The active library entry.
    pub fn active_entry(&mut self) -> Result<LibraryEntry> {
        let index = self.active_index()?;
        self.get(index)
    }

    /// Root of the active library.
    pub fn active_root(&mut self) -> Result<PathBuf> {
        Ok(self.active_entry()?.root_path)
    }

    // ========================================
    // Mutation
    // ========================================

    /// Append `entry` and return its index.
    pub fn add(&mut self, entry: LibraryEntry) -> Result<usize> {
        let mut entries = self.load()?.to_vec();
        debug!(
            "Adding library {} at {}",
            entry.display_name,
            entry.root_path.display()
        );
        entries.push(entry);
        let index = entries.len() - 1;
        self.save(entries)?;
        Ok(index)
    }

    /// Append `folder`, labelled with its base name, and return its index.
    pub fn add_folder(&mut self, folder: impl Into<PathBuf>) -> Result<usize> {
        self.add(LibraryEntry::from_folder(folder))
    }

    /// Change the display name of the entry at `index`.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StockpileError::Validation {
                field: "name".to_string(),
                message: "library name cannot be empty".to_string(),
            });
        }

        let mut entries = self.load()?.to_vec();
        let len = entries.len();
        let entry = entries
            .get_mut(index)
            .ok_or(StockpileError::LibraryIndexOutOfRange { index, len })?;
        entry.display_name = new_name.to_string();
        self.save(entries)
    }

    /// Remove the entry at `index` and return it.
    ///
    /// If an entry before the active one is removed, the active index moves
    /// down with it once the shortened list is saved. Removing the last entry
    /// re-seeds the default.
    pub fn remove(&mut self, index: usize) -> Result<LibraryEntry> {
        let mut entries = self.load()?.to_vec();
        if index >= entries.len() {
            return Err(StockpileError::LibraryIndexOutOfRange {
                index,
                len: entries.len(),
            });
        }

        let removed = entries.remove(index);
        let active = self.raw_active();
        self.save(entries)?;
        if let Some(active) = active {
            if index < active {
                self.set_active(active - 1)?;
            }
        }

        debug!("Removed library {}", removed.display_name);
        Ok(removed)
    }
}
