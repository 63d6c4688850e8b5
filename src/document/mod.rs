//! Shared Documents
//!
//! Contract for the replicated, access-controlled document store the catalog
//! is persisted in. A document is a key, an opaque version token and a byte
//! payload. Replacing a document requires presenting the version it was
//! fetched at; the store rejects the replace with `Conflict` if another writer
//! got there first.

pub mod envelope;
pub mod memory;
pub mod persistence;

use crate::agent::AgentIdentity;
use crate::error::ApiError;
use crate::types::{DocumentKey, VersionToken};

pub use envelope::Envelope;
pub use memory::InMemoryDocumentStore;
pub use persistence::SledDocumentStore;

/// A shared document as seen by one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    key: DocumentKey,
    /// Version the document was fetched at; `None` until first stored
    version: Option<VersionToken>,
    payload: Vec<u8>,
}

impl Document {
    /// Document fetched from the store at `version`
    pub fn existing(key: impl Into<DocumentKey>, version: VersionToken, payload: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            version: Some(version),
            payload,
        }
    }

    /// Document that has never been stored
    pub fn unstored(key: impl Into<DocumentKey>, payload: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            version: None,
            payload,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> Option<VersionToken> {
        self.version
    }

    pub fn is_new(&self) -> bool {
        self.version.is_none()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload, keeping the base version for the next store
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }
}

/// Result of fetching a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(Document),
    NotFound,
}

/// Replicated document store consumed by the catalog.
///
/// Implementations enforce access control for the presented agent and the
/// optimistic version check on `store`. Failures are reported as
/// `AccessDenied`, `Unavailable`/`StorageError` or `Conflict`.
pub trait DocumentStore: Send + Sync {
    /// Fetch the current version of `key`
    fn fetch(&self, key: &str, agent: &AgentIdentity) -> Result<FetchOutcome, ApiError>;

    /// Prepare a brand-new document; nothing is written until `store`
    fn create_document(
        &self,
        key: &str,
        payload: Vec<u8>,
        agent: &AgentIdentity,
    ) -> Result<Document, ApiError> {
        agent.verify_write(key)?;
        Ok(Document::unstored(key, payload))
    }

    /// Publish `document`, replacing the version it was fetched at.
    ///
    /// A new document (no version) is only created if the key is still absent.
    fn store(&self, document: &Document, agent: &AgentIdentity) -> Result<(), ApiError>;
}
