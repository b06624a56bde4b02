//! Per-version metadata record.

use serde::{Deserialize, Deserializer, Serialize};

/// One exported version of one logical asset.
///
/// `(name, version)` identifies the record; it is stored as
/// `<root>/<name>/<name>_v<version>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetVersionRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Expected `major.minor.patch`, but stored verbatim either way.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    /// Host-side location of the asset the bundle was exported from.
    #[serde(default, alias = "originalAsset", deserialize_with = "empty_as_none")]
    pub original_asset_ref: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exported_at: String,
    /// File name of the preview image, present iff one was written.
    #[serde(default, alias = "thumbnailFile", deserialize_with = "empty_as_none")]
    pub thumbnail_ref: Option<String>,
}

impl AssetVersionRecord {
    /// Create a record with no tags, source reference or thumbnail.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            version: version.into(),
            tags: Vec::new(),
            original_asset_ref: None,
            exported_at: String::new(),
            thumbnail_ref: None,
        }
    }

    /// Replace the tag list, trimming entries and dropping empty ones.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// `<name>_v<version>`, the shared stem of the metadata, bundle and
    /// thumbnail files.
    pub fn file_stem(&self) -> String {
        file_stem(&self.name, &self.version)
    }

    /// Whether the export produced a preview image.
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_ref.is_some()
    }
}

/// `<name>_v<version>`.
pub fn file_stem(name: &str, version: &str) -> String {
    format!("{}_v{}", name, version)
}

fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

// Files written by older tooling use `""` and `null` where a value is absent.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(normalize_tags(tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_fields() {
        let record = AssetVersionRecord {
            original_asset_ref: Some("Assets/Props/Chair.prefab".into()),
            thumbnail_ref: Some("Chair_v1.0.0_thumbnail.png".into()),
            exported_at: "2024-03-01T10:00:00".into(),
            ..AssetVersionRecord::new("Chair", "Props", "1.0.0")
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Chair");
        assert_eq!(value["originalAssetRef"], "Assets/Props/Chair.prefab");
        assert_eq!(value["exportedAt"], "2024-03-01T10:00:00");
        assert_eq!(value["thumbnailRef"], "Chair_v1.0.0_thumbnail.png");
    }

    #[test]
    fn test_reads_legacy_field_names_and_empty_strings() {
        let json = r#"{
            "name": "Lamp",
            "category": "Lights",
            "version": "1.0.0",
            "tags": ["warm", "", "  indoor "],
            "originalAsset": "Assets/Lamp.prefab",
            "exportedAt": "2024-01-01T00:00:00",
            "thumbnailFile": ""
        }"#;

        let record: AssetVersionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.original_asset_ref.as_deref(), Some("Assets/Lamp.prefab"));
        assert_eq!(record.thumbnail_ref, None);
        assert_eq!(record.tags, vec!["warm", "indoor"]);
        assert!(!record.has_thumbnail());
    }

    #[test]
    fn test_missing_fields_default() {
        let record: AssetVersionRecord =
            serde_json::from_str(r#"{"name": "Foo", "tags": null}"#).unwrap();
        assert_eq!(record.name, "Foo");
        assert_eq!(record.version, "");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_with_tags_keeps_duplicates_and_order() {
        let record = AssetVersionRecord::new("Foo", "", "1.0.0").with_tags(["b", " a", "", "b"]);
        assert_eq!(record.tags, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(
            AssetVersionRecord::new("Foo", "", "1.2.0").file_stem(),
            "Foo_v1.2.0"
        );
    }
}
