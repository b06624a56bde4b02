//! The asset shelf: export, browse, import and delete against the active
//! library.
//!
//! [`AssetShelf`] ties the library registry, the catalog cache and the
//! project's import status together. Packaging is left to the host through
//! the [`BundleExporter`] and [`BundleImporter`] traits.

mod builder;
mod bundle;
mod request;

pub use builder::AssetShelfBuilder;
pub use bundle::{BundleExporter, BundleImporter, ThumbnailSource};
pub use request::{ExportRequest, ExportedVersion};

use crate::catalog::{Catalog, CatalogCache, CategoryGroup};
use crate::config::LibraryConfig;
use crate::error::{Result, StockpileError};
use crate::import_status::{ImportEntry, ImportStatusCache};
use crate::metadata::{AssetVersionRecord, DeleteReport, MetadataStore};
use crate::naming::{validate_asset_name, validate_version_label};
use crate::registry::{LibraryEntry, LibraryRegistry};
use crate::version::VersionPolicy;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Timestamp format of `exportedAt`: ISO-8601 without offset, local time.
const EXPORTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Asset library front end for one host project.
///
/// Create one with [`AssetShelf::builder`].
pub struct AssetShelf {
    registry: LibraryRegistry,
    import_status: ImportStatusCache,
    catalog: CatalogCache,
    exporter: Box<dyn BundleExporter>,
    importer: Box<dyn BundleImporter>,
    thumbnails: Option<Box<dyn ThumbnailSource>>,
}

impl std::fmt::Debug for AssetShelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetShelf")
            .field("registry", &self.registry)
            .field("import_status", &self.import_status)
            .field("catalog", &self.catalog)
            .field("thumbnails", &self.thumbnails.is_some())
            .finish_non_exhaustive()
    }
}

impl AssetShelf {
    /// Start configuring a shelf for the project at `project_root`.
    pub fn builder(project_root: impl Into<PathBuf>) -> AssetShelfBuilder {
        AssetShelfBuilder::new(project_root)
    }

    fn store(&self) -> &MetadataStore {
        self.catalog.builder().store()
    }

    // ========================================
    // Browsing
    // ========================================

    /// Root of the active library.
    pub fn active_root(&mut self) -> Result<PathBuf> {
        self.registry.active_root()
    }

    /// Catalog of the active library, scanned on first use after a change.
    pub fn catalog(&mut self) -> Result<&Catalog> {
        let root = self.registry.active_root()?;
        self.catalog.set_root(root);
        Ok(self.catalog.get_or_build())
    }

    /// Re-scan the active library.
    pub fn refresh(&mut self) -> Result<&Catalog> {
        let root = self.registry.active_root()?;
        self.catalog.set_root(root);
        Ok(self.catalog.rebuild())
    }

    /// Assets of the active library matching `query`, grouped by category.
    pub fn browse(&mut self, query: &str) -> Result<Vec<CategoryGroup<'_>>> {
        Ok(self.catalog()?.search(query))
    }

    /// Categories already used in the active library.
    pub fn existing_categories(&mut self) -> Result<Vec<String>> {
        Ok(self
            .catalog()?
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Where the preview image of `record` lives in the active library, if
    /// it has one.
    pub fn thumbnail_path(&mut self, record: &AssetVersionRecord) -> Result<Option<PathBuf>> {
        let Some(file) = record.thumbnail_ref.as_deref() else {
            return Ok(None);
        };
        let root = self.registry.active_root()?;
        Ok(Some(root.join(&record.name).join(file)))
    }

    // ========================================
    // Export
    // ========================================

    /// Export request for a brand new asset at the default version.
    ///
    /// A blank `category` becomes the first category already in use, or
    /// `Uncategorized` in an empty library.
    pub fn new_asset_request(
        &mut self,
        name: &str,
        category: Option<&str>,
    ) -> Result<ExportRequest> {
        let category = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => c.to_string(),
            None => self
                .existing_categories()?
                .into_iter()
                .next()
                .unwrap_or_else(|| LibraryConfig::UNCATEGORIZED.to_string()),
        };

        Ok(ExportRequest::new(name.trim(), category, VersionPolicy::DEFAULT))
    }

    /// Export request for the next version of an existing asset.
    ///
    /// Copies name, category, tags and source reference from the latest
    /// version and bumps its patch number.
    pub fn prepare_new_version(&mut self, name: &str) -> Result<ExportRequest> {
        let root = self.registry.active_root()?;
        let latest = self
            .catalog()?
            .latest(name)
            .cloned()
            .ok_or_else(|| StockpileError::AssetNotFound {
                name: name.to_string(),
            })?;

        let mut request = ExportRequest::new(
            latest.name,
            latest.category,
            VersionPolicy::next(&latest.version),
        )
        .target_root(root);
        request.tags = latest.tags;
        request.source_asset = latest.original_asset_ref;
        Ok(request)
    }

    /// Export one version into its library root.
    ///
    /// Writes the bundle through the exporter, then the thumbnail when the
    /// host can render one, then the metadata record. An existing version
    /// with the same name and version is replaced.
    pub fn export(&mut self, request: &ExportRequest) -> Result<ExportedVersion> {
        validate_asset_name(&request.name)?;
        validate_version_label(&request.version)?;

        let sources = request.selected_sources();
        if sources.is_empty() {
            return Err(StockpileError::Validation {
                field: "sources".to_string(),
                message: "nothing to export".to_string(),
            });
        }

        let root = match &request.target_root {
            Some(root) => root.clone(),
            None => self.registry.active_root()?,
        };

        let paths = self.store().paths(&root, &request.name, &request.version);
        fs::create_dir_all(&paths.asset_dir)
            .map_err(|e| StockpileError::io_with_path(e, &paths.asset_dir))?;

        self.exporter.export_bundle(&sources, &paths.bundle)?;
        debug!(
            "Exported {} sources to {}",
            sources.len(),
            paths.bundle.display()
        );

        self.write_thumbnail(request, &paths.thumbnail);

        let mut record =
            AssetVersionRecord::new(&request.name, &request.category, &request.version)
                .with_tags(&request.tags);
        record.original_asset_ref = request.source_asset.clone();
        record.exported_at = Local::now().format(EXPORTED_AT_FORMAT).to_string();
        record.thumbnail_ref = if paths.thumbnail.is_file() {
            paths
                .thumbnail
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
        } else {
            None
        };

        self.store().write(&root, &record)?;
        self.catalog.invalidate();

        info!(
            "Exported {} v{} to {}",
            record.name,
            record.version,
            root.display()
        );
        Ok(ExportedVersion { record, paths })
    }

    fn write_thumbnail(&self, request: &ExportRequest, path: &Path) {
        let Some(source) = &self.thumbnails else {
            return;
        };
        let Some(asset_ref) = request.preview_ref() else {
            return;
        };
        let Some(png) = source.render_png(asset_ref) else {
            debug!("No preview available for {}", asset_ref);
            return;
        };

        if let Err(e) = fs::write(path, png) {
            warn!("Failed to write thumbnail {}: {}", path.display(), e);
        }
    }

    // ========================================
    // Import / delete
    // ========================================

    /// Import one version into the project and record it.
    pub fn import(&mut self, name: &str, version: &str) -> Result<ImportEntry> {
        validate_asset_name(name)?;
        validate_version_label(version)?;

        let root = self.registry.active_root()?;
        if self.store().read(&root, name, version).is_none() {
            return Err(StockpileError::VersionNotFound {
                name: name.to_string(),
                version: version.to_string(),
            });
        }

        let bundle = self.store().paths(&root, name, version).bundle;
        if !bundle.is_file() {
            return Err(StockpileError::BundleImport {
                message: format!("bundle file is missing: {}", bundle.display()),
            });
        }

        self.importer.import_bundle(&bundle)?;
        let entry = self.import_status.set(name, version)?;

        info!("Imported {} v{} from {}", name, version, root.display());
        Ok(entry)
    }

    /// Version of `name` last imported into the project.
    pub fn imported_version(&mut self, name: &str) -> Result<Option<String>> {
        self.import_status.imported_version(name)
    }

    /// Remove every file of one version from the active library.
    ///
    /// Files that are already gone are reported, not treated as errors.
    pub fn delete_version(&mut self, name: &str, version: &str) -> Result<DeleteReport> {
        let root = self.registry.active_root()?;
        let report = self.store().delete(&root, name, version);
        self.catalog.invalidate();
        report
    }

    pub fn import_status(&mut self) -> &mut ImportStatusCache {
        &mut self.import_status
    }

    // ========================================
    // Libraries
    // ========================================

    pub fn registry(&mut self) -> &mut LibraryRegistry {
        &mut self.registry
    }

    /// Registered libraries in display order.
    pub fn libraries(&mut self) -> Result<Vec<LibraryEntry>> {
        Ok(self.registry.load()?.to_vec())
    }

    /// Make the library at `index` active.
    pub fn select_library(&mut self, index: usize) -> Result<()> {
        self.registry.set_active(index)?;
        self.catalog.invalidate();
        Ok(())
    }

    /// Register `folder` as a library. Returns its index.
    pub fn add_library(&mut self, folder: impl Into<PathBuf>) -> Result<usize> {
        let index = self.registry.add_folder(folder)?;
        self.catalog.invalidate();
        Ok(index)
    }

    pub fn rename_library(&mut self, index: usize, name: &str) -> Result<()> {
        self.registry.rename(index, name)?;
        self.catalog.invalidate();
        Ok(())
    }

    /// Unregister the library at `index`. Its files are left alone.
    pub fn remove_library(&mut self, index: usize) -> Result<LibraryEntry> {
        let removed = self.registry.remove(index)?;
        self.catalog.invalidate();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryPreferenceStore;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn fake_exporter(sources: &[String], destination: &Path) -> Result<()> {
        fs::write(destination, sources.join("\n"))?;
        Ok(())
    }

    fn create_test_shelf() -> (AssetShelf, Rc<RefCell<Vec<PathBuf>>>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();

        let imported = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&imported);
        let importer = move |bundle: &Path| -> Result<()> {
            seen.borrow_mut().push(bundle.to_path_buf());
            Ok(())
        };

        let shelf = AssetShelf::builder(&project)
            .with_preferences(MemoryPreferenceStore::new())
            .default_library_root(temp_dir.path().join("library"))
            .with_thumbnails(|_: &str| Some(vec![0x89, b'P', b'N', b'G']))
            .build(fake_exporter, importer)
            .unwrap();

        (shelf, imported, temp_dir)
    }

    fn chair_request(version: &str) -> ExportRequest {
        ExportRequest::new("Chair", "Props", version)
            .with_tags_csv("wood, indoor")
            .with_source_asset("Assets/Chair.prefab")
            .with_sources(["Assets/Chair.prefab", "Packages/com.vendor/Lit.shader"])
    }

    #[test]
    fn test_export_writes_all_files() {
        let (mut shelf, _imported, _temp_dir) = create_test_shelf();

        let exported = shelf.export(&chair_request("1.0.0")).unwrap();
        assert!(exported.paths.metadata.is_file());
        assert!(exported.paths.thumbnail.is_file());
        assert_eq!(
            exported.record.thumbnail_ref.as_deref(),
            Some("Chair_v1.0.0_thumbnail.png")
        );
        assert_eq!(exported.record.exported_at.len(), "2024-01-01T00:00:00".len());

        let bundle = fs::read_to_string(&exported.paths.bundle).unwrap();
        assert_eq!(bundle, "Assets/Chair.prefab");
    }

    #[test]
    fn test_export_without_thumbnail_source() {
        let temp_dir = TempDir::new().unwrap();
        let mut shelf = AssetShelf::builder(temp_dir.path())
            .with_preferences(MemoryPreferenceStore::new())
            .default_library_root(temp_dir.path().join("library"))
            .build(fake_exporter, |_: &Path| -> Result<()> { Ok(()) })
            .unwrap();

        let exported = shelf.export(&chair_request("1.0.0")).unwrap();
        assert!(exported.record.thumbnail_ref.is_none());
        assert!(shelf.thumbnail_path(&exported.record).unwrap().is_none());
    }

    #[test]
    fn test_export_rejects_bad_input() {
        let (mut shelf, _imported, _temp_dir) = create_test_shelf();

        let only_packages = chair_request("1.0.0")
            .with_sources(Vec::<String>::new())
            .with_source_asset("Packages/com.vendor/Lit.shader");
        assert!(matches!(
            shelf.export(&only_packages),
            Err(StockpileError::Validation { .. })
        ));

        let mut request = chair_request("1.0.0");
        request.name = "a/b".to_string();
        assert!(matches!(
            shelf.export(&request),
            Err(StockpileError::InvalidAssetName { .. })
        ));
    }

    #[test]
    fn test_export_invalidates_catalog() {
        let (mut shelf, _imported, _temp_dir) = create_test_shelf();
        assert!(shelf.catalog().unwrap().is_empty());

        shelf.export(&chair_request("1.0.0")).unwrap();
        let catalog = shelf.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.latest("Chair").unwrap().tags, vec!["wood", "indoor"]);
    }

    #[test]
    fn test_prepare_new_version_bumps_patch() {
        let (mut shelf, _imported, _temp_dir) = create_test_shelf();
        shelf.export(&chair_request("1.0.4")).unwrap();

        let request = shelf.prepare_new_version("Chair").unwrap();
        assert_eq!(request.version, "1.0.5");
        assert_eq!(request.category, "Props");
        assert_eq!(request.source_asset.as_deref(), Some("Assets/Chair.prefab"));
        assert_eq!(request.target_root, Some(shelf.active_root().unwrap()));

        assert!(matches!(
            shelf.prepare_new_version("Lamp"),
            Err(StockpileError::AssetNotFound { .. })
        ));
    }

    #[test]
    fn test_new_asset_request_category_default() {
        let (mut shelf, _imported, _temp_dir) = create_test_shelf();

        let request = shelf.new_asset_request("Lamp", None).unwrap();
        assert_eq!(request.category, LibraryConfig::UNCATEGORIZED);
        assert_eq!(request.version, "1.0.0");

        shelf.export(&chair_request("1.0.0")).unwrap();
        let request = shelf.new_asset_request("Lamp", Some("  ")).unwrap();
        assert_eq!(request.category, "Props");

        let request = shelf.new_asset_request("Lamp", Some("Lighting")).unwrap();
        assert_eq!(request.category, "Lighting");
    }

    #[test]
    fn test_import_records_status() {
        let (mut shelf, imported, _temp_dir) = create_test_shelf();
        let exported = shelf.export(&chair_request("1.0.0")).unwrap();

        let entry = shelf.import("Chair", "1.0.0").unwrap();
        assert_eq!(entry.version, "1.0.0");
        assert_eq!(imported.borrow().as_slice(), &[exported.paths.bundle]);
        assert_eq!(shelf.imported_version("Chair").unwrap().as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_thumbnail_path_follows_active_library() {
        let (mut shelf, _imported, temp_dir) = create_test_shelf();
        let exported = shelf.export(&chair_request("1.0.0")).unwrap();
        assert_eq!(
            shelf.thumbnail_path(&exported.record).unwrap(),
            Some(exported.paths.thumbnail.clone())
        );

        let other = temp_dir.path().join("other");
        let index = shelf.add_library(&other).unwrap();
        shelf.select_library(index).unwrap();
        assert_eq!(
            shelf.thumbnail_path(&exported.record).unwrap(),
            Some(other.join("Chair").join("Chair_v1.0.0_thumbnail.png"))
        );
    }

    #[test]
    fn test_unsafe_names_rejected_before_touching_files() {
        let (mut shelf, imported, temp_dir) = create_test_shelf();
        let outside = temp_dir.path().join("Chair_v1.0.0.unitypackage");
        fs::write(&outside, b"pkg").unwrap();

        assert!(matches!(
            shelf.delete_version("../Chair", "1.0.0"),
            Err(StockpileError::InvalidAssetName { .. })
        ));
        assert!(matches!(
            shelf.import("../Chair", "1.0.0"),
            Err(StockpileError::InvalidAssetName { .. })
        ));
        assert!(outside.exists());
        assert!(imported.borrow().is_empty());
    }

    #[test]
    fn test_import_unknown_or_missing_bundle() {
        let (mut shelf, imported, _temp_dir) = create_test_shelf();
        assert!(matches!(
            shelf.import("Chair", "9.9.9"),
            Err(StockpileError::VersionNotFound { .. })
        ));

        let exported = shelf.export(&chair_request("1.0.0")).unwrap();
        fs::remove_file(&exported.paths.bundle).unwrap();
        assert!(matches!(
            shelf.import("Chair", "1.0.0"),
            Err(StockpileError::BundleImport { .. })
        ));
        assert!(imported.borrow().is_empty());
        assert_eq!(shelf.imported_version("Chair").unwrap(), None);
    }

    #[test]
    fn test_delete_version_removes_from_catalog() {
        let (mut shelf, _imported, _temp_dir) = create_test_shelf();
        shelf.export(&chair_request("1.0.0")).unwrap();
        let second = shelf.export(&chair_request("1.0.1")).unwrap();
        assert_eq!(shelf.catalog().unwrap().versions("Chair").len(), 2);

        let report = shelf.delete_version("Chair", "1.0.1").unwrap();
        assert!(report.removed.contains(&second.paths.thumbnail));
        assert_eq!(shelf.catalog().unwrap().versions("Chair").len(), 1);
    }

    #[test]
    fn test_switching_library_changes_catalog() {
        let (mut shelf, _imported, temp_dir) = create_test_shelf();
        shelf.export(&chair_request("1.0.0")).unwrap();

        let index = shelf.add_library(temp_dir.path().join("other")).unwrap();
        shelf.select_library(index).unwrap();
        assert!(shelf.catalog().unwrap().is_empty());
        assert!(shelf.browse("chair").unwrap().is_empty());

        shelf.remove_library(index).unwrap();
        assert_eq!(shelf.catalog().unwrap().len(), 1);
        assert_eq!(shelf.browse("WOOD").unwrap().len(), 1);
    }
}
