//! Asset catalog: the in-memory grouping of a library root's metadata.
//!
//! - [`CatalogBuilder`] scans a root and groups records by asset name
//! - [`Catalog`] answers version, category and search queries
//! - [`CatalogCache`] holds the catalog of the active root between rebuilds

mod builder;
mod cache;
mod view;

pub use builder::{Catalog, CatalogBuilder};
pub use cache::CatalogCache;
pub use view::{AssetGroup, CategoryGroup};
