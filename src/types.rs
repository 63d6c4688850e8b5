//! Core types shared by the catalog, the document stores and the accessor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which the catalog document is published
pub const SERVICE_CATALOG_DOCUMENT_KEY: &str = "service-catalog";

/// DocumentKey: name of a shared document in the replicated store
pub type DocumentKey = String;

/// Opaque version of a stored document, used for optimistic-concurrency replace.
///
/// Tokens are only compared for equality; callers must not derive ordering
/// from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionToken(u64);

impl VersionToken {
    /// Version assigned to a document on its first successful store
    pub fn initial() -> Self {
        VersionToken(1)
    }

    /// Version assigned after replacing a document holding `self`
    pub fn next(self) -> Self {
        VersionToken(self.0.wrapping_add(1))
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        VersionToken(raw)
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
