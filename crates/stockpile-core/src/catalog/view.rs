//! Browse view: catalog records filtered by a search query and partitioned by
//! category.

use super::builder::Catalog;
use crate::metadata::AssetVersionRecord;
use crate::version::VersionPolicy;
use std::collections::BTreeMap;

/// One asset within a category, with its matching versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetGroup<'a> {
    pub name: &'a str,
    /// Most recent first.
    pub versions: Vec<&'a AssetVersionRecord>,
}

impl<'a> AssetGroup<'a> {
    /// The most recent matching version.
    pub fn latest(&self) -> &'a AssetVersionRecord {
        self.versions[0]
    }
}

/// All assets sharing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    /// Sorted by asset name.
    pub assets: Vec<AssetGroup<'a>>,
}

/// Whether `record` matches `query` (already lowercased) by name or tag.
fn matches(record: &AssetVersionRecord, query: &str) -> bool {
    query.is_empty()
        || record.name.to_lowercase().contains(query)
        || record.tags.iter().any(|t| t.to_lowercase().contains(query))
}

impl Catalog {
    /// Every record, partitioned by category (ascending) then asset name.
    pub fn by_category(&self) -> Vec<CategoryGroup<'_>> {
        self.search("")
    }

    /// Records whose name or any tag contains `query`, case-insensitively,
    /// partitioned like [`Catalog::by_category`].
    ///
    /// Matching is per version, so an asset can appear with only some of its
    /// versions, and versions exported under different categories show up in
    /// each of them.
    pub fn search(&self, query: &str) -> Vec<CategoryGroup<'_>> {
        let query = query.trim().to_lowercase();

        let mut tree: BTreeMap<&str, BTreeMap<&str, Vec<&AssetVersionRecord>>> = BTreeMap::new();
        for record in self.records().filter(|r| matches(r, &query)) {
            tree.entry(record.category.as_str())
                .or_default()
                .entry(record.name.as_str())
                .or_default()
                .push(record);
        }

        tree.into_iter()
            .map(|(category, assets)| CategoryGroup {
                category,
                assets: assets
                    .into_iter()
                    .map(|(name, mut versions)| {
                        versions.sort_by(|a, b| {
                            VersionPolicy::compare_for_display(&a.version, &b.version)
                        });
                        AssetGroup { name, versions }
                    })
                    .collect(),
            })
            .collect()
    }
}
