//! Catalog Service
//!
//! Service-facing catalog operations. Each call is one self-contained fetch
//! (and, for mutations, one store) through the shared document accessor.

use crate::accessor::{PublishOutcome, SharedDocumentAccessor};
use crate::catalog::{CatalogEntry, RecordMap};
use crate::error::ApiError;
use tracing::{info, warn};

pub struct CatalogService {
    accessor: SharedDocumentAccessor,
}

impl CatalogService {
    pub fn new(accessor: SharedDocumentAccessor) -> Self {
        Self { accessor }
    }

    pub fn accessor(&self) -> &SharedDocumentAccessor {
        &self.accessor
    }

    /// Full catalog as a JSON array of entry objects
    pub fn list_catalog(&self) -> Result<String, ApiError> {
        self.accessor.load_catalog()?.serialize()
    }

    /// Full catalog as a name to record mapping
    pub fn catalog_as_record_map(&self) -> Result<RecordMap, ApiError> {
        Ok(self.accessor.load_catalog()?.to_record_map())
    }

    /// Look up a single entry by name
    pub fn get_entry(&self, name: &str) -> Result<Option<CatalogEntry>, ApiError> {
        Ok(self.accessor.load_catalog()?.get(name.trim()).cloned())
    }

    /// Create or replace the entry named `name`
    pub fn upsert_entry(
        &self,
        name: &str,
        version: &str,
        github: &str,
        frontend: &str,
        description: &str,
    ) -> Result<PublishOutcome, ApiError> {
        let entry = CatalogEntry::new(
            Some(name),
            Some(version),
            Some(github),
            Some(frontend),
            Some(description),
        )?;
        self.publish_entry(entry)
    }

    /// Create or replace an entry from a JSON submission
    pub fn post_entry_json(&self, json: &str) -> Result<PublishOutcome, ApiError> {
        let entry = CatalogEntry::from_json_str(json)?;
        self.publish_entry(entry)
    }

    /// Upsert, repeating the whole cycle on `Conflict` up to `attempts` times
    pub fn upsert_entry_with_retry(
        &self,
        entry: &CatalogEntry,
        attempts: usize,
    ) -> Result<PublishOutcome, ApiError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.publish_entry(entry.clone()) {
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(name = entry.name(), attempt, "Retrying catalog upsert after conflict");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Remove the entry named `name`; absent names still publish the catalog
    pub fn delete_entry(&self, name: &str) -> Result<PublishOutcome, ApiError> {
        let name = name.trim().to_string();
        let outcome = self.accessor.mutate_catalog(|catalog| catalog.remove(&name))?;
        info!(name = %name, ?outcome, "Deleted catalog entry");
        Ok(outcome)
    }

    fn publish_entry(&self, entry: CatalogEntry) -> Result<PublishOutcome, ApiError> {
        let name = entry.name().to_string();
        let outcome = self.accessor.mutate_catalog(move |catalog| catalog.upsert(entry))?;
        info!(name = %name, ?outcome, "Upserted catalog entry");
        Ok(outcome)
    }
}
