//! Host collaborators for packaging, unpacking and previewing assets.
//!
//! The shelf never reads or writes bundle contents itself. Editors plug in
//! their own packager through these traits; plain closures work too.

use crate::error::Result;
use std::path::Path;

/// Writes the given host asset paths into one bundle file.
pub trait BundleExporter {
    /// Package `sources` into `destination`, replacing any existing file.
    fn export_bundle(&self, sources: &[String], destination: &Path) -> Result<()>;
}

/// Unpacks a bundle file into the current host project.
pub trait BundleImporter {
    fn import_bundle(&self, bundle: &Path) -> Result<()>;
}

/// Produces a PNG preview for a host asset.
pub trait ThumbnailSource {
    /// Encoded PNG bytes, or `None` when the host has no preview.
    fn render_png(&self, asset_ref: &str) -> Option<Vec<u8>>;
}

impl<F> BundleExporter for F
where
    F: Fn(&[String], &Path) -> Result<()>,
{
    fn export_bundle(&self, sources: &[String], destination: &Path) -> Result<()> {
        self(sources, destination)
    }
}

impl<F> BundleImporter for F
where
    F: Fn(&Path) -> Result<()>,
{
    fn import_bundle(&self, bundle: &Path) -> Result<()> {
        self(bundle)
    }
}

impl<F> ThumbnailSource for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn render_png(&self, asset_ref: &str) -> Option<Vec<u8>> {
        self(asset_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closures_act_as_collaborators() {
        let seen = RefCell::new(Vec::new());
        let exporter = |sources: &[String], dest: &Path| -> Result<()> {
            seen.borrow_mut().push((sources.to_vec(), dest.to_path_buf()));
            Ok(())
        };

        exporter
            .export_bundle(&["Assets/Chair.prefab".to_string()], Path::new("/lib/Chair.pkg"))
            .unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].1, Path::new("/lib/Chair.pkg"));

        let thumbs = |asset: &str| (asset == "Assets/Chair.prefab").then(|| vec![0x89, b'P']);
        assert!(thumbs.render_png("Assets/Chair.prefab").is_some());
        assert!(thumbs.render_png("Assets/Rug.prefab").is_none());
    }
}
