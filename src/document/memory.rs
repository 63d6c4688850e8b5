//! In-process document store.
//!
//! Behaves like the replicated store for a single process: versioned replace,
//! agent capability checks, plus per-key deny lists and an offline switch so
//! callers can exercise access-denied and unavailable paths.

use crate::agent::AgentIdentity;
use crate::document::{Document, DocumentStore, FetchOutcome};
use crate::error::ApiError;
use crate::types::VersionToken;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredDocument {
    version: VersionToken,
    payload: Vec<u8>,
}

/// Document store held in memory, shareable across threads
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
    /// key -> agent ids refused any access to it
    denied: RwLock<HashMap<String, HashSet<String>>>,
    offline: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every fetch and store of `key` by `agent_id`
    pub fn deny(&self, key: &str, agent_id: &str) {
        self.denied
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(agent_id.to_string());
    }

    /// While offline every call fails with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Current version of `key`, if stored
    pub fn current_version(&self, key: &str) -> Option<VersionToken> {
        self.documents.read().get(key).map(|doc| doc.version)
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable(
                "in-memory document store is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn check_not_denied(&self, key: &str, agent: &AgentIdentity) -> Result<(), ApiError> {
        let denied = self.denied.read();
        if denied
            .get(key)
            .map(|agents| agents.contains(&agent.agent_id))
            .unwrap_or(false)
        {
            return Err(ApiError::AccessDenied(format!(
                "Agent {} has no access to document '{}'",
                agent.agent_id, key
            )));
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn fetch(&self, key: &str, agent: &AgentIdentity) -> Result<FetchOutcome, ApiError> {
        self.check_online()?;
        agent.verify_read(key)?;
        self.check_not_denied(key, agent)?;

        let documents = self.documents.read();
        Ok(match documents.get(key) {
            Some(stored) => FetchOutcome::Found(Document::existing(
                key,
                stored.version,
                stored.payload.clone(),
            )),
            None => FetchOutcome::NotFound,
        })
    }

    fn store(&self, document: &Document, agent: &AgentIdentity) -> Result<(), ApiError> {
        self.check_online()?;
        agent.verify_write(document.key())?;
        self.check_not_denied(document.key(), agent)?;

        let mut documents = self.documents.write();
        let current = documents.get(document.key()).map(|doc| doc.version);
        if current != document.version() {
            debug!(
                key = document.key(),
                expected = ?document.version(),
                current = ?current,
                "Rejecting stale document replace"
            );
            return Err(ApiError::Conflict {
                key: document.key().to_string(),
            });
        }

        let version = document
            .version()
            .map(VersionToken::next)
            .unwrap_or_else(VersionToken::initial);
        documents.insert(
            document.key().to_string(),
            StoredDocument {
                version,
                payload: document.payload().to_vec(),
            },
        );
        debug!(key = document.key(), %version, "Stored document");
        Ok(())
    }
}
