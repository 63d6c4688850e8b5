use std::sync::Arc;

use service_catalog::agent::AgentIdentity;
use service_catalog::document::{DocumentStore, InMemoryDocumentStore, SledDocumentStore};
use service_catalog::{CatalogService, SharedDocumentAccessor};
use tempfile::TempDir;

pub const SERVICE_AGENT: &str = "catalog-service";

/// A sled store in a fresh temp directory; keep the TempDir alive with it
pub fn sled_store() -> (TempDir, Arc<SledDocumentStore>) {
    let temp_dir = TempDir::new().unwrap();
    let store = SledDocumentStore::open(&temp_dir.path().join("store")).unwrap();
    (temp_dir, Arc::new(store))
}

pub fn memory_store() -> Arc<InMemoryDocumentStore> {
    Arc::new(InMemoryDocumentStore::new())
}

pub fn writer_service(documents: Arc<dyn DocumentStore>) -> CatalogService {
    CatalogService::new(SharedDocumentAccessor::new(
        documents,
        AgentIdentity::writer(SERVICE_AGENT),
    ))
}

/// Run `check` once against each backend
pub fn for_each_backend<F>(check: F)
where
    F: Fn(Arc<dyn DocumentStore>),
{
    check(memory_store());
    let (_temp_dir, sled) = sled_store();
    check(sled);
}
