//! Catalog of a library root, rebuilt from its metadata files.

use crate::metadata::{is_metadata_file, AssetVersionRecord, MetadataStore};
use crate::version::VersionPolicy;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Records of one library root grouped by asset name, plus the asset folders
/// that hold no usable metadata.
///
/// Each version list is in display order (see
/// [`VersionPolicy::compare_for_display`]). Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    assets: BTreeMap<String, Vec<AssetVersionRecord>>,
    broken_folders: BTreeSet<String>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `records` by name and order each group for display.
    pub fn from_records(
        records: impl IntoIterator<Item = AssetVersionRecord>,
        broken_folders: BTreeSet<String>,
    ) -> Self {
        let mut assets: BTreeMap<String, Vec<AssetVersionRecord>> = BTreeMap::new();
        for record in records {
            assets.entry(record.name.clone()).or_default().push(record);
        }
        for versions in assets.values_mut() {
            versions.sort_by(|a, b| VersionPolicy::compare_for_display(&a.version, &b.version));
        }

        Self {
            assets,
            broken_folders,
        }
    }

    /// Asset names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// Version history of `name`, most recent first. Empty if unknown.
    pub fn versions(&self, name: &str) -> &[AssetVersionRecord] {
        self.assets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most recent version of `name`.
    pub fn latest(&self, name: &str) -> Option<&AssetVersionRecord> {
        self.versions(name).first()
    }

    /// Look up one specific version.
    pub fn find(&self, name: &str, version: &str) -> Option<&AssetVersionRecord> {
        self.versions(name).iter().find(|r| r.version == version)
    }

    /// Iterate over `(name, versions)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AssetVersionRecord])> {
        self.assets
            .iter()
            .map(|(name, versions)| (name.as_str(), versions.as_slice()))
    }

    /// Iterate over every record.
    pub fn records(&self) -> impl Iterator<Item = &AssetVersionRecord> {
        self.assets.values().flatten()
    }

    /// Distinct categories of the latest version of each asset, ascending.
    ///
    /// Blank categories are left out.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .assets
            .values()
            .filter_map(|versions| versions.first())
            .map(|latest| latest.category.as_str())
            .filter(|c| !c.trim().is_empty())
            .collect();
        set.into_iter().collect()
    }

    /// Asset folders under the root with no usable metadata file.
    pub fn broken_folders(&self) -> &BTreeSet<String> {
        &self.broken_folders
    }

    /// Whether the asset folder `folder` was flagged as broken.
    pub fn is_broken(&self, folder: &str) -> bool {
        self.broken_folders.contains(folder)
    }

    /// Number of distinct asset names.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the catalog has no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Total number of version records.
    pub fn record_count(&self) -> usize {
        self.assets.values().map(Vec::len).sum()
    }
}

/// Builds [`Catalog`]s by scanning a library root.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    store: MetadataStore,
}

impl CatalogBuilder {
    pub fn new(store: MetadataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Scan `root` and build its catalog.
    ///
    /// A root that does not exist yields an empty catalog.
    pub fn build(&self, root: &Path) -> Catalog {
        let records = self.store.read_all(root);
        let broken = self.detect_broken_folders(root);
        let catalog = Catalog::from_records(records, broken);

        info!(
            "Built catalog for {}: {} assets, {} versions, {} broken folders",
            root.display(),
            catalog.len(),
            catalog.record_count(),
            catalog.broken_folders().len()
        );
        catalog
    }

    /// Immediate sub-folders of `root` without a parsable metadata file
    /// directly inside them.
    pub fn detect_broken_folders(&self, root: &Path) -> BTreeSet<String> {
        let mut broken = BTreeSet::new();
        let Ok(entries) = fs::read_dir(root) else {
            return broken;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if !self.has_usable_metadata(&path) {
                let name = entry.file_name().to_string_lossy().to_string();
                debug!("Asset folder {} has no usable metadata", name);
                broken.insert(name);
            }
        }

        broken
    }

    fn has_usable_metadata(&self, folder: &Path) -> bool {
        let Ok(entries) = fs::read_dir(folder) else {
            return false;
        };

        entries.flatten().map(|e| e.path()).any(|path| {
            path.is_file() && is_metadata_file(&path) && self.store.read_file(&path).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, category: &str, version: &str) -> AssetVersionRecord {
        AssetVersionRecord::new(name, category, version)
    }

    #[test]
    fn test_from_records_groups_and_orders() {
        let catalog = Catalog::from_records(
            vec![
                record("Foo", "Props", "1.0.0"),
                record("Bar", "Props", "0.1.0"),
                record("Foo", "Props", "1.2.0"),
            ],
            BTreeSet::new(),
        );

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.record_count(), 3);
        let versions: Vec<_> = catalog.versions("Foo").iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.2.0", "1.0.0"]);
        assert_eq!(catalog.latest("Foo").unwrap().version, "1.2.0");
        assert!(catalog.find("Foo", "1.0.0").is_some());
        assert!(catalog.find("Foo", "3.0.0").is_none());
    }

    #[test]
    fn test_unknown_name_has_no_versions() {
        let catalog = Catalog::new();
        assert!(catalog.versions("Nope").is_empty());
        assert!(catalog.latest("Nope").is_none());
    }

    #[test]
    fn test_categories_use_latest_version() {
        let catalog = Catalog::from_records(
            vec![
                record("Foo", "Old", "1.0.0"),
                record("Foo", "Props", "1.1.0"),
                record("Bar", "Lights", "1.0.0"),
                record("Baz", "", "1.0.0"),
            ],
            BTreeSet::new(),
        );

        assert_eq!(catalog.categories(), vec!["Lights", "Props"]);
    }

    #[test]
    fn test_build_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let builder = CatalogBuilder::default();

        let catalog = builder.build(&temp_dir.path().join("not-yet"));
        assert!(catalog.is_empty());
        assert!(catalog.broken_folders().is_empty());
    }

    #[test]
    fn test_build_flags_folder_without_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let builder = CatalogBuilder::default();
        builder
            .store()
            .write(temp_dir.path(), &record("Foo", "Props", "1.0.0"))
            .unwrap();
        let orphan = temp_dir.path().join("Orphan");
        fs::create_dir_all(&orphan).unwrap();
        fs::write(orphan.join("Orphan_v1.0.0.unitypackage"), b"bundle").unwrap();

        let catalog = builder.build(temp_dir.path());

        assert!(catalog.is_broken("Orphan"));
        assert!(!catalog.is_broken("Foo"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_folder_with_only_corrupt_metadata_is_broken() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("Mangled");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("Mangled_v1.0.0.json"), "not json").unwrap();

        let broken = CatalogBuilder::default().detect_broken_folders(temp_dir.path());
        assert!(broken.contains("Mangled"));
    }

    #[test]
    fn test_loose_files_in_root_are_not_folders() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("readme.txt"), "hi").unwrap();

        let broken = CatalogBuilder::default().detect_broken_folders(temp_dir.path());
        assert!(broken.is_empty());
    }
}
