//! Centralized configuration for Stockpile.
//!
//! File naming conventions, preference keys and project-relative paths shared
//! by the metadata store, the registry and the import status cache.

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Stockpile";
    /// Directory name used under platform config/document folders.
    pub const APP_DIR_NAME: &'static str = "stockpile";
}

/// On-disk layout of a library root.
pub struct LibraryConfig;

impl LibraryConfig {
    /// Extension of per-version metadata files.
    pub const METADATA_EXTENSION: &'static str = "json";
    /// Extension of bundles produced by the host's package exporter.
    pub const DEFAULT_BUNDLE_EXTENSION: &'static str = "unitypackage";
    /// Suffix appended to `<name>_v<version>` for exported previews.
    pub const THUMBNAIL_SUFFIX: &'static str = "_thumbnail.png";
    /// Suffix older tool versions looked for on delete. Still cleaned up.
    pub const LEGACY_PREVIEW_SUFFIX: &'static str = "_preview.png";
    /// Version given to a brand-new asset.
    pub const DEFAULT_VERSION: &'static str = "1.0.0";
    /// Display name of the self-seeded library entry.
    pub const DEFAULT_LIBRARY_NAME: &'static str = "Default";
    /// Source paths with this prefix are host packages, not project content.
    pub const PACKAGE_SOURCE_PREFIX: &'static str = "Packages/";
    /// Category offered when the library has none yet.
    pub const UNCATEGORIZED: &'static str = "Uncategorized";
    /// Folder under the documents directory holding the default library.
    pub const DEFAULT_LIBRARY_DIR_NAME: &'static str = "Library";
}

/// Keys and file names of the host preference store.
pub struct SettingsConfig;

impl SettingsConfig {
    /// JSON blob `{ "entries": [ { "name", "path" } ] }`.
    pub const LIBRARIES_KEY: &'static str = "Stockpile.Libraries";
    /// Integer index into the library list.
    pub const ACTIVE_LIBRARY_KEY: &'static str = "Stockpile.ActiveLibrary";
    pub const PREFERENCES_FILENAME: &'static str = "preferences.json";
}

/// Location of the per-project import status file.
pub struct ImportStatusConfig;

impl ImportStatusConfig {
    pub const SETTINGS_DIR_NAME: &'static str = "ProjectSettings";
    pub const FILENAME: &'static str = "RxAssetImportStatus.json";
}
