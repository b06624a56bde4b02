//! Builder for configuring AssetShelf initialization.

use std::path::PathBuf;

use super::{AssetShelf, BundleExporter, BundleImporter, ThumbnailSource};
use crate::catalog::{CatalogBuilder, CatalogCache};
use crate::config::LibraryConfig;
use crate::error::{Result, StockpileError};
use crate::import_status::ImportStatusCache;
use crate::metadata::MetadataStore;
use crate::platform;
use crate::registry::{JsonPreferenceStore, LibraryRegistry, PreferenceStore};
use tracing::info;

/// Builder for configuring AssetShelf initialization.
///
/// # Example
///
/// ```rust,ignore
/// use stockpile_core::{AssetShelf, MemoryPreferenceStore};
///
/// let shelf = AssetShelf::builder("./MyProject")
///     .with_preferences(MemoryPreferenceStore::new())
///     .bundle_extension("zip")
///     .build(my_exporter, my_importer)?;
/// ```
pub struct AssetShelfBuilder {
    project_root: PathBuf,
    preferences: Option<Box<dyn PreferenceStore>>,
    default_library_root: Option<PathBuf>,
    bundle_extension: String,
    import_status_path: Option<PathBuf>,
    thumbnails: Option<Box<dyn ThumbnailSource>>,
}

impl AssetShelfBuilder {
    /// Create a new builder for the host project at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            preferences: None,
            default_library_root: None,
            bundle_extension: LibraryConfig::DEFAULT_BUNDLE_EXTENSION.to_string(),
            import_status_path: None,
            thumbnails: None,
        }
    }

    /// Preference store holding the library list and active selection.
    ///
    /// Default: [`JsonPreferenceStore`] at the platform config location
    pub fn with_preferences(mut self, prefs: impl PreferenceStore + 'static) -> Self {
        self.preferences = Some(Box::new(prefs));
        self
    }

    /// Root seeded as the `Default` library when none are registered.
    ///
    /// Default: `<documents>/Stockpile/Library`
    pub fn default_library_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.default_library_root = Some(root.into());
        self
    }

    /// Extension of bundle files. A leading dot is ignored.
    ///
    /// Default: `unitypackage`
    pub fn bundle_extension(mut self, extension: &str) -> Self {
        self.bundle_extension = extension.trim().trim_start_matches('.').to_string();
        self
    }

    /// Override where the import status file lives.
    ///
    /// Default: `<project>/ProjectSettings/RxAssetImportStatus.json`
    pub fn import_status_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_status_path = Some(path.into());
        self
    }

    /// Render thumbnails on export.
    ///
    /// Default: none (exports carry no thumbnail)
    pub fn with_thumbnails(mut self, source: impl ThumbnailSource + 'static) -> Self {
        self.thumbnails = Some(Box::new(source));
        self
    }

    /// Build the AssetShelf instance.
    ///
    /// The project root must already exist. The library registry is loaded
    /// (and seeded if empty) before returning.
    pub fn build(
        self,
        exporter: impl BundleExporter + 'static,
        importer: impl BundleImporter + 'static,
    ) -> Result<AssetShelf> {
        if !self.project_root.is_dir() {
            return Err(StockpileError::Config {
                message: format!(
                    "Project root does not exist: {}",
                    self.project_root.display()
                ),
            });
        }
        if self.bundle_extension.is_empty() {
            return Err(StockpileError::Config {
                message: "Bundle extension must not be empty".to_string(),
            });
        }

        let preferences = match self.preferences {
            Some(prefs) => prefs,
            None => Box::new(JsonPreferenceStore::open()?),
        };
        let default_root = match self.default_library_root {
            Some(root) => root,
            None => platform::default_library_root()?,
        };

        let mut registry = LibraryRegistry::new(preferences, default_root);
        let active_root = registry.active_root()?;

        let import_status = match self.import_status_path {
            Some(path) => ImportStatusCache::new(path),
            None => ImportStatusCache::for_project(&self.project_root),
        };

        let store = MetadataStore::new(self.bundle_extension);
        let catalog = CatalogCache::new(&active_root, CatalogBuilder::new(store));

        info!(
            "Opened asset shelf for {} (active library {})",
            self.project_root.display(),
            active_root.display()
        );

        Ok(AssetShelf {
            registry,
            import_status,
            catalog,
            exporter: Box::new(exporter),
            importer: Box::new(importer),
            thumbnails: self.thumbnails,
        })
    }
}
