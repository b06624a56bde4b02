//! Export requests and their results.

use crate::config::LibraryConfig;
use crate::metadata::{AssetVersionRecord, VersionPaths};
use crate::naming::parse_tags;
use std::path::PathBuf;

/// Everything needed to export one version of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub name: String,
    pub category: String,
    pub tags: Vec<String>,
    pub version: String,
    /// Host path of the asset being exported; recorded in the metadata and
    /// used for the thumbnail.
    pub source_asset: Option<String>,
    /// Host paths to package, usually the asset plus its dependencies.
    pub sources: Vec<String>,
    /// Keep sources under `Packages/`.
    pub include_packages: bool,
    /// Library root to export into. `None` means the active library.
    pub target_root: Option<PathBuf>,
}

impl ExportRequest {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            tags: Vec::new(),
            version: version.into(),
            source_asset: None,
            sources: Vec::new(),
            include_packages: false,
            target_root: None,
        }
    }

    /// Replace the tags with the entries of a comma-separated list.
    pub fn with_tags_csv(mut self, csv: &str) -> Self {
        self.tags = parse_tags(csv);
        self
    }

    pub fn with_source_asset(mut self, asset_ref: impl Into<String>) -> Self {
        self.source_asset = Some(asset_ref.into());
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_packages(mut self, include: bool) -> Self {
        self.include_packages = include;
        self
    }

    pub fn target_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.target_root = Some(root.into());
        self
    }

    /// Paths that will go into the bundle.
    ///
    /// Falls back to the source asset alone when no sources were listed, and
    /// drops `Packages/` paths unless `include_packages` is set.
    pub fn selected_sources(&self) -> Vec<String> {
        let listed: Vec<&String> = if self.sources.is_empty() {
            self.source_asset.iter().collect()
        } else {
            self.sources.iter().collect()
        };

        listed
            .into_iter()
            .filter(|s| {
                self.include_packages || !s.starts_with(LibraryConfig::PACKAGE_SOURCE_PREFIX)
            })
            .cloned()
            .collect()
    }

    /// Asset reference to render the thumbnail from.
    pub fn preview_ref(&self) -> Option<&str> {
        self.source_asset
            .as_deref()
            .or_else(|| self.sources.first().map(String::as_str))
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone)]
pub struct ExportedVersion {
    /// The record as written to disk.
    pub record: AssetVersionRecord,
    pub paths: VersionPaths,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_sources_filtered_by_default() {
        let request = ExportRequest::new("Chair", "Props", "1.0.0").with_sources([
            "Assets/Chair.prefab",
            "Packages/com.vendor.shaders/Lit.shader",
            "Assets/Wood.mat",
        ]);

        assert_eq!(
            request.selected_sources(),
            vec!["Assets/Chair.prefab".to_string(), "Assets/Wood.mat".to_string()]
        );

        let request = request.include_packages(true);
        assert_eq!(request.selected_sources().len(), 3);
    }

    #[test]
    fn test_falls_back_to_source_asset() {
        let request =
            ExportRequest::new("Chair", "Props", "1.0.0").with_source_asset("Assets/Chair.prefab");
        assert_eq!(request.selected_sources(), vec!["Assets/Chair.prefab".to_string()]);
        assert_eq!(request.preview_ref(), Some("Assets/Chair.prefab"));

        assert!(ExportRequest::new("Chair", "Props", "1.0.0")
            .selected_sources()
            .is_empty());
    }

    #[test]
    fn test_tags_from_csv() {
        let request = ExportRequest::new("Chair", "Props", "1.0.0").with_tags_csv(" wood, ,indoor ");
        assert_eq!(request.tags, vec!["wood".to_string(), "indoor".to_string()]);
    }
}
