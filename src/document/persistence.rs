//! Sled-backed document store.
//!
//! Each document is one record in the `documents` tree: the bincode encoding
//! of its version and payload. The version check and the replace run inside a
//! single sled transaction, so two writers presenting the same base version
//! cannot both succeed.

use crate::agent::AgentIdentity;
use crate::document::{Document, DocumentStore, FetchOutcome};
use crate::error::{ApiError, StorageError};
use crate::types::VersionToken;
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::path::Path;
use tracing::{debug, info};

const DOCUMENTS_TREE: &str = "documents";

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    version: u64,
    payload: Vec<u8>,
}

fn decode_record(key: &str, raw: &[u8]) -> Result<StoredRecord, ApiError> {
    bincode::deserialize(raw).map_err(|e| {
        ApiError::StorageError(StorageError::CorruptRecord {
            key: key.to_string(),
            message: e.to_string(),
        })
    })
}

/// Durable document store in a sled database
pub struct SledDocumentStore {
    db: sled::Db,
    documents: sled::Tree,
}

impl SledDocumentStore {
    /// Open (or create) a store at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        info!(path = %path.display(), "Opened sled document store");
        Self::from_db(db)
    }

    /// Build a store on an already open database
    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let documents = db.open_tree(DOCUMENTS_TREE)?;
        Ok(Self { db, documents })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

impl DocumentStore for SledDocumentStore {
    fn fetch(&self, key: &str, agent: &AgentIdentity) -> Result<FetchOutcome, ApiError> {
        agent.verify_read(key)?;

        let raw = self
            .documents
            .get(key.as_bytes())
            .map_err(StorageError::from)?;
        Ok(match raw {
            Some(raw) => {
                let record = decode_record(key, &raw)?;
                FetchOutcome::Found(Document::existing(
                    key,
                    VersionToken::from_raw(record.version),
                    record.payload,
                ))
            }
            None => FetchOutcome::NotFound,
        })
    }

    fn store(&self, document: &Document, agent: &AgentIdentity) -> Result<(), ApiError> {
        let key = document.key();
        agent.verify_write(key)?;

        let expected = document.version().map(VersionToken::raw);
        let next = document
            .version()
            .map(VersionToken::next)
            .unwrap_or_else(VersionToken::initial);
        let encoded = bincode::serialize(&StoredRecord {
            version: next.raw(),
            payload: document.payload().to_vec(),
        })
        .map_err(StorageError::from)?;

        let outcome = self
            .documents
            .transaction(|tx| -> Result<(), ConflictableTransactionError<ApiError>> {
                let current = match tx.get(key.as_bytes())? {
                    Some(raw) => Some(
                        decode_record(key, &raw)
                            .map_err(ConflictableTransactionError::Abort)?
                            .version,
                    ),
                    None => None,
                };
                if current != expected {
                    return Err(ConflictableTransactionError::Abort(ApiError::Conflict {
                        key: key.to_string(),
                    }));
                }
                tx.insert(key.as_bytes(), encoded.as_slice())?;
                Ok(())
            });

        match outcome {
            Ok(()) => {
                self.flush()?;
                debug!(key, version = %next, "Stored document");
                Ok(())
            }
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(StorageError::from(err).into()),
        }
    }
}
