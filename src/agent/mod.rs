//! Agents
//!
//! Identities that scope every fetch and store against the shared document
//! store.

pub mod identity;

pub use identity::{AgentIdentity, AgentRole, Capability};
