//! Shared Document Accessor
//!
//! Read-modify-write protocol for the catalog document. Every operation
//! fetches the document fresh, resolves it to one of
//!
//! - not found: an empty catalog (never persisted on reads),
//! - found with a foreign tag: `TypeMismatch`,
//! - found and decodable: the stored catalog,
//!
//! and mutations then replace the whole document at the version they fetched.
//! A concurrent replace surfaces as `Conflict`; the accessor never retries and
//! never merges.

use crate::agent::AgentIdentity;
use crate::catalog::CatalogStore;
use crate::document::{Document, DocumentStore, Envelope, FetchOutcome};
use crate::error::ApiError;
use crate::types::{DocumentKey, SERVICE_CATALOG_DOCUMENT_KEY};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Envelope tag identifying a catalog document
pub const CATALOG_DOCUMENT_KIND: &str = "catalog-store";

/// What a successful publish did to the shared document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No document existed; one was created
    Created,
    /// The fetched version was replaced
    Replaced,
    /// Content was unchanged and unchanged writes are skipped
    Unchanged,
}

/// A catalog fetched for one mutation, together with the document it came from.
///
/// Consumed by `publish`, so a fetched catalog cannot outlive its operation.
#[derive(Debug)]
pub struct CatalogCheckout {
    document: Document,
    baseline: CatalogStore,
    catalog: CatalogStore,
}

impl CatalogCheckout {
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogStore {
        &mut self.catalog
    }

    /// Whether no document existed when this checkout was taken
    pub fn is_new(&self) -> bool {
        self.document.is_new()
    }

    fn is_unchanged(&self) -> bool {
        self.baseline == self.catalog
    }
}

/// Mediates every catalog read and write against the document store
pub struct SharedDocumentAccessor {
    documents: Arc<dyn DocumentStore>,
    agent: AgentIdentity,
    key: DocumentKey,
    skip_unchanged_writes: bool,
}

impl SharedDocumentAccessor {
    /// Accessor for the default catalog key, acting as `agent`
    pub fn new(documents: Arc<dyn DocumentStore>, agent: AgentIdentity) -> Self {
        Self {
            documents,
            agent,
            key: SERVICE_CATALOG_DOCUMENT_KEY.to_string(),
            skip_unchanged_writes: false,
        }
    }

    /// Use a different document key
    pub fn with_key(mut self, key: impl Into<DocumentKey>) -> Self {
        self.key = key.into();
        self
    }

    /// Skip the store round-trip when a mutation leaves the catalog unchanged
    pub fn with_skip_unchanged_writes(mut self, skip: bool) -> Self {
        self.skip_unchanged_writes = skip;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn agent(&self) -> &AgentIdentity {
        &self.agent
    }

    /// Fetch and decode the current catalog.
    ///
    /// A missing document yields an empty catalog and writes nothing.
    pub fn load_catalog(&self) -> Result<CatalogStore, ApiError> {
        match self.fetch()? {
            Some(document) => self.decode(&document),
            None => Ok(CatalogStore::new()),
        }
    }

    /// Fetch the catalog for a mutation, keeping the version it was read at
    pub fn checkout(&self) -> Result<CatalogCheckout, ApiError> {
        let (document, catalog) = match self.fetch()? {
            Some(document) => {
                let catalog = self.decode(&document)?;
                (document, catalog)
            }
            None => {
                let document =
                    self.documents
                        .create_document(&self.key, Vec::new(), &self.agent)?;
                (document, CatalogStore::new())
            }
        };

        Ok(CatalogCheckout {
            document,
            baseline: catalog.clone(),
            catalog,
        })
    }

    /// Encode the checked-out catalog and replace the document it came from
    pub fn publish(&self, checkout: CatalogCheckout) -> Result<PublishOutcome, ApiError> {
        if self.skip_unchanged_writes && !checkout.is_new() && checkout.is_unchanged() {
            debug!(key = %self.key, "Catalog unchanged, skipping store");
            return Ok(PublishOutcome::Unchanged);
        }

        let CatalogCheckout {
            mut document,
            catalog,
            ..
        } = checkout;
        let outcome = if document.is_new() {
            PublishOutcome::Created
        } else {
            PublishOutcome::Replaced
        };

        document.set_payload(encode_catalog(&catalog)?);
        match self.documents.store(&document, &self.agent) {
            Ok(()) => {
                info!(
                    key = %self.key,
                    agent = %self.agent.agent_id,
                    entries = catalog.len(),
                    ?outcome,
                    "Published catalog document"
                );
                Ok(outcome)
            }
            Err(err @ ApiError::Conflict { .. }) => {
                warn!(
                    key = %self.key,
                    base_version = ?document.version(),
                    "Catalog document changed concurrently"
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Run one full read-modify-write cycle with `mutation`
    pub fn mutate_catalog<F>(&self, mutation: F) -> Result<PublishOutcome, ApiError>
    where
        F: FnOnce(&mut CatalogStore),
    {
        let mut checkout = self.checkout()?;
        mutation(checkout.catalog_mut());
        self.publish(checkout)
    }

    fn fetch(&self) -> Result<Option<Document>, ApiError> {
        match self.documents.fetch(&self.key, &self.agent)? {
            FetchOutcome::Found(document) => {
                debug!(key = %self.key, version = ?document.version(), "Fetched catalog document");
                Ok(Some(document))
            }
            FetchOutcome::NotFound => {
                debug!(key = %self.key, "Catalog document not found");
                Ok(None)
            }
        }
    }

    fn decode(&self, document: &Document) -> Result<CatalogStore, ApiError> {
        let envelope = Envelope::open(&self.key, CATALOG_DOCUMENT_KIND, document.payload())
            .map_err(|err| {
                warn!(key = %self.key, error = %err, "Catalog document is unreadable");
                err
            })?;
        CatalogStore::deserialize(&envelope.content)
    }
}

/// Wrap an encoded catalog in a tagged envelope
pub fn encode_catalog(catalog: &CatalogStore) -> Result<Vec<u8>, ApiError> {
    Envelope::new(CATALOG_DOCUMENT_KIND, catalog.serialize()?).to_bytes()
}
