//! Host preference store seam.
//!
//! Editors keep small per-user settings (the library list, the active
//! library) in a key/value preference store. [`PreferenceStore`] is the
//! boundary to that store; two implementations are provided.

use crate::error::{Result, StockpileError};
use crate::metadata::{atomic_read_json, atomic_write_json};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key/value settings storage scoped to the host application.
pub trait PreferenceStore: std::fmt::Debug {
    /// Get a string value, if the key holds one.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Set a string value.
    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;

    /// Get an integer value, if the key holds one.
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Set an integer value.
    fn set_int(&mut self, key: &str, value: i64) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete_key(&mut self, key: &str) -> Result<()>;

    /// Whether the key holds any value.
    fn has_key(&self, key: &str) -> bool;
}

/// In-memory preferences, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, Value>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key)?.as_str().map(str::to_string)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key)?.as_i64()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Preferences persisted as one JSON object file.
///
/// The file is read once when opened and rewritten atomically after every
/// mutation.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonPreferenceStore {
    /// Open the store at the platform default location.
    pub fn open() -> Result<Self> {
        let path = crate::platform::preferences_path()?;
        Self::open_at(&path)
    }

    /// Open the store backed by `path`.
    ///
    /// A missing file starts an empty store. A file that cannot be parsed is
    /// logged and replaced on the next write.
    pub fn open_at(path: &Path) -> Result<Self> {
        let values = match atomic_read_json::<BTreeMap<String, Value>>(path) {
            Ok(values) => values.unwrap_or_default(),
            Err(StockpileError::Json { message, .. }) => {
                warn!("Ignoring corrupt preference file: {}", message);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// File backing the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `values` to disk, then adopt them as the current state.
    fn commit(&mut self, values: BTreeMap<String, Value>) -> Result<()> {
        atomic_write_json(&self.path, &values, false)?;
        self.values = values;
        Ok(())
    }

    fn commit_insert(&mut self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value);
        self.commit(values)
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key)?.as_str().map(str::to_string)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.commit_insert(key, Value::from(value))
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key)?.as_i64()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.commit_insert(key, Value::from(value))
    }

    fn delete_key(&mut self, key: &str) -> Result<()> {
        if !self.values.contains_key(key) {
            return Ok(());
        }
        let mut values = self.values.clone();
        values.remove(key);
        self.commit(values)
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}
