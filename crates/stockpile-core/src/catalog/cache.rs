//! Owned, explicitly invalidated catalog for the active library root.

use super::builder::{Catalog, CatalogBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Caches the catalog of one root until told otherwise.
///
/// The file system is not watched. Callers invalidate after every mutation
/// (export, delete, library switch); the next read performs a full re-scan.
#[derive(Debug)]
pub struct CatalogCache {
    root: PathBuf,
    builder: CatalogBuilder,
    cached: Option<Catalog>,
}

impl CatalogCache {
    pub fn new(root: impl Into<PathBuf>, builder: CatalogBuilder) -> Self {
        Self {
            root: root.into(),
            builder,
            cached: None,
        }
    }

    /// Root the cached catalog belongs to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn builder(&self) -> &CatalogBuilder {
        &self.builder
    }

    /// Point the cache at another root. Drops the cached catalog if the root
    /// changed.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        if root != self.root {
            debug!("Catalog root changed to {}", root.display());
            self.root = root;
            self.cached = None;
        }
    }

    /// Drop the cached catalog.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Whether a catalog is currently cached.
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Return the cached catalog, scanning the root first if needed.
    pub fn get_or_build(&mut self) -> &Catalog {
        let (builder, root) = (&self.builder, &self.root);
        self.cached.get_or_insert_with(|| builder.build(root))
    }

    /// Re-scan unconditionally.
    pub fn rebuild(&mut self) -> &Catalog {
        self.invalidate();
        self.get_or_build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::AssetVersionRecord;
    use tempfile::TempDir;

    #[test]
    fn test_cache_serves_stale_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = CatalogCache::new(temp_dir.path(), CatalogBuilder::default());
        assert!(cache.get_or_build().is_empty());

        cache
            .builder()
            .store()
            .write(temp_dir.path(), &AssetVersionRecord::new("Foo", "", "1.0.0"))
            .unwrap();
        assert!(cache.get_or_build().is_empty());

        cache.invalidate();
        assert_eq!(cache.get_or_build().len(), 1);
    }

    #[test]
    fn test_set_root_drops_cache() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = CatalogCache::new(temp_dir.path(), CatalogBuilder::default());
        cache.get_or_build();
        assert!(cache.is_cached());

        cache.set_root(temp_dir.path());
        assert!(cache.is_cached());

        cache.set_root(temp_dir.path().join("other"));
        assert!(!cache.is_cached());
    }

    #[test]
    fn test_rebuild_rescans() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = CatalogCache::new(temp_dir.path(), CatalogBuilder::default());
        cache.get_or_build();

        cache
            .builder()
            .store()
            .write(temp_dir.path(), &AssetVersionRecord::new("Foo", "", "1.0.0"))
            .unwrap();
        assert_eq!(cache.rebuild().len(), 1);
    }
}
