//! Service Catalog: named service entries in a shared, versioned document
//!
//! The catalog lives in a single document of a replicated, access-controlled
//! store. Reads fetch and decode it; writes fetch it, mutate the decoded
//! catalog and replace the whole document at the version they read, surfacing
//! concurrent writers as conflicts.

pub mod accessor;
pub mod agent;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod service;
pub mod types;

pub use accessor::{PublishOutcome, SharedDocumentAccessor};
pub use catalog::{CatalogEntry, CatalogStore};
pub use error::ApiError;
pub use service::CatalogService;
