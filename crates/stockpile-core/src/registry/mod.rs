//! Library registry: the user's list of library roots and which one is active.
//!
//! The list and the active index live in the host's preference store under
//! two keys:
//! - `Stockpile.Libraries`: `{ "entries": [ { "name", "path" }, ... ] }`
//! - `Stockpile.ActiveLibrary`: integer index into that list

pub mod library_registry;
pub mod preferences;

pub use library_registry::{LibraryEntry, LibraryRegistry};
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
