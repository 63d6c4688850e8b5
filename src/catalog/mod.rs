//! Service Catalog
//!
//! The catalog domain: validated entries and the name-keyed collection that is
//! encoded into the shared document.

pub mod entry;
pub mod store;

pub use entry::{CatalogEntry, ENTRY_FIELDS};
pub use store::{CatalogStore, RecordMap};
