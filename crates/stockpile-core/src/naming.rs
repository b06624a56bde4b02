//! Asset name validation and tag list handling.
//!
//! Asset names become a folder and a file-name prefix under the library root,
//! so they must be safe path components on every platform.

use crate::error::{Result, StockpileError};

/// Characters reserved on NTFS that cannot appear in a file name.
const NTFS_RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Check that `name` is usable as an asset folder name.
pub fn validate_asset_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(StockpileError::InvalidAssetName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("name is empty");
    }
    if name == "." || name == ".." {
        return reject("name is a relative path component");
    }
    if let Some(c) = name.chars().find(|c| NTFS_RESERVED_CHARS.contains(c)) {
        return reject(format!("contains reserved character {:?}", c).as_str());
    }
    if name.chars().any(char::is_control) {
        return reject("contains control characters");
    }
    if name != name.trim() {
        return reject("has leading or trailing whitespace");
    }

    Ok(())
}

/// Check that `version` can be embedded in a file name.
///
/// The shape of the version is not checked here; malformed versions are
/// stored as-is.
pub fn validate_version_label(version: &str) -> Result<()> {
    let reject = |message: &str| {
        Err(StockpileError::Validation {
            field: "version".to_string(),
            message: message.to_string(),
        })
    };

    if version.trim().is_empty() {
        return reject("version is empty");
    }
    if version.chars().any(|c| NTFS_RESERVED_CHARS.contains(&c) || c.is_control()) {
        return reject(format!("{:?} is not usable in a file name", version).as_str());
    }

    Ok(())
}

/// Parse a comma-separated tag list.
///
/// Entries are trimmed and empty ones dropped. Order and duplicates are kept.
///
/// # Examples
///
/// ```
/// use stockpile_core::naming::parse_tags;
///
/// assert_eq!(parse_tags(" wood, chair ,, wood"), vec!["wood", "chair", "wood"]);
/// ```
pub fn parse_tags(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags back into the comma-separated form used by edit forms.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_plain_names() {
        assert!(validate_asset_name("Tavern Chair").is_ok());
        assert!(validate_asset_name("rock_01-final").is_ok());
    }

    #[test]
    fn test_validate_rejects_path_components() {
        for name in ["", "  ", ".", "..", "a/b", "a\\b", "C:thing", "what?", " padded"] {
            let err = validate_asset_name(name).unwrap_err();
            assert!(
                matches!(err, StockpileError::InvalidAssetName { .. }),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_validate_version_label() {
        assert!(validate_version_label("1.0.0").is_ok());
        assert!(validate_version_label("final-ish").is_ok());
        assert!(validate_version_label("").is_err());
        assert!(validate_version_label("1/0").is_err());
    }

    #[test]
    fn test_parse_tags_drops_empty_entries() {
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags(" , ,"), Vec::<String>::new());
        assert_eq!(parse_tags("props,  interior "), vec!["props", "interior"]);
    }

    #[test]
    fn test_join_tags() {
        let tags = vec!["props".to_string(), "interior".to_string()];
        assert_eq!(join_tags(&tags), "props, interior");
        assert_eq!(parse_tags(&join_tags(&tags)), tags);
    }
}
