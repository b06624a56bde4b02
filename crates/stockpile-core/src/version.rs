//! Version string policy for exported assets.
//!
//! Versions are free-form strings on disk. Only the increment helper needs a
//! `major.minor.patch` shape, and only the patch segment has to be numeric.
//! Display ordering compares the raw strings, so `1.9.0` sorts above
//! `1.10.0`. That matches what existing libraries were browsed with.

use crate::config::LibraryConfig;
use std::cmp::Ordering;

/// A version string split into its three segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionTriple<'a> {
    pub major: &'a str,
    pub minor: &'a str,
    pub patch: u64,
}

/// Parsing, ordering and increment rules for asset versions.
pub struct VersionPolicy;

impl VersionPolicy {
    /// Version given to an asset on its first export.
    pub const DEFAULT: &'static str = LibraryConfig::DEFAULT_VERSION;

    /// Split `s` into three dot-separated segments.
    ///
    /// Returns `None` unless there are exactly three segments and the last one
    /// is a non-negative decimal integer.
    pub fn parse(s: &str) -> Option<VersionTriple<'_>> {
        let mut parts = s.split('.');
        let (major, minor, patch) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        if patch.is_empty() || !patch.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let patch = patch.parse().ok()?;
        Some(VersionTriple {
            major,
            minor,
            patch,
        })
    }

    /// Whether `s` can be auto-incremented.
    pub fn is_well_formed(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// Suggest the version following `s` by bumping the patch segment.
    ///
    /// Malformed input is returned unchanged.
    pub fn next(s: &str) -> String {
        match Self::parse(s) {
            Some(v) => match v.patch.checked_add(1) {
                Some(patch) => format!("{}.{}.{}", v.major, v.minor, patch),
                None => s.to_string(),
            },
            None => s.to_string(),
        }
    }

    /// Display order: most recent first, by raw string comparison.
    pub fn compare_for_display(a: &str, b: &str) -> Ordering {
        b.cmp(a)
    }
}
