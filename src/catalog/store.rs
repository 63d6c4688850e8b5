//! In-memory catalog keyed by entry name.
//!
//! Owns no I/O. The accessor decodes a store from a fetched document, mutates
//! it for a single operation, and encodes it back for the replace.

use crate::catalog::entry::CatalogEntry;
use crate::error::ApiError;
use std::collections::{BTreeMap, HashMap};

/// Name to record snapshot handed to record-map callers
pub type RecordMap = BTreeMap<String, BTreeMap<String, String>>;

/// Collection of catalog entries, at most one per name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStore {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the entry, replacing any entry with the same name
    pub fn upsert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.name().to_string(), entry);
    }

    /// Remove the named entry; absent names are ignored
    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in unspecified order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Snapshot of every entry as a field record, keyed by name
    pub fn to_record_map(&self) -> RecordMap {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.to_record()))
            .collect()
    }

    /// Encode the catalog as a JSON array of entry objects.
    ///
    /// Element order is not significant.
    pub fn serialize(&self) -> Result<String, ApiError> {
        let listing: Vec<serde_json::Value> =
            self.entries.values().map(CatalogEntry::to_json_value).collect();
        serde_json::to_string(&listing)
            .map_err(|e| ApiError::DecodeError(format!("Failed to encode catalog: {}", e)))
    }

    /// Decode a catalog previously produced by `serialize`.
    ///
    /// Duplicate names in the payload collapse to the last occurrence.
    pub fn deserialize(payload: &str) -> Result<Self, ApiError> {
        let listing: Vec<CatalogEntry> = serde_json::from_str(payload)
            .map_err(|e| ApiError::DecodeError(format!("Failed to decode catalog: {}", e)))?;

        let mut store = Self::new();
        for entry in listing {
            store.upsert(entry);
        }
        Ok(store)
    }
}
