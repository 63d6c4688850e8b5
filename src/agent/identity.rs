//! Agent identity and capability checks.
//!
//! Every document store call is scoped to an agent. Stores consult these checks
//! before touching a document; the catalog core only propagates the outcome.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Agent role defining what an agent may do with shared documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Reader agents can only fetch documents
    #[serde(alias = "Reader")]
    Reader,
    /// Writer agents can fetch, create and replace documents
    #[serde(alias = "Writer")]
    Writer,
}

impl Default for AgentRole {
    fn default() -> Self {
        AgentRole::Writer
    }
}

/// Agent capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Read,
    Write,
}

/// Identity a caller presents to the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Unique identifier for the agent
    pub agent_id: String,
    pub role: AgentRole,
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl AgentIdentity {
    /// Create a new agent identity with the capabilities of its role
    pub fn new(agent_id: impl Into<String>, role: AgentRole) -> Self {
        let capabilities = match role {
            AgentRole::Reader => vec![Capability::Read],
            AgentRole::Writer => vec![Capability::Read, Capability::Write],
        };

        Self {
            agent_id: agent_id.into(),
            role,
            capabilities,
            metadata: HashMap::new(),
        }
    }

    pub fn reader(agent_id: impl Into<String>) -> Self {
        Self::new(agent_id, AgentRole::Reader)
    }

    pub fn writer(agent_id: impl Into<String>) -> Self {
        Self::new(agent_id, AgentRole::Writer)
    }

    pub fn can_read(&self) -> bool {
        self.capabilities.contains(&Capability::Read)
    }

    pub fn can_write(&self) -> bool {
        self.capabilities.contains(&Capability::Write)
    }

    /// Verify that the agent may fetch `key`
    pub fn verify_read(&self, key: &str) -> Result<(), ApiError> {
        if !self.can_read() {
            return Err(ApiError::AccessDenied(format!(
                "Agent {} (role: {:?}) cannot read document '{}'",
                self.agent_id, self.role, key
            )));
        }
        Ok(())
    }

    /// Verify that the agent may create or replace `key`
    pub fn verify_write(&self, key: &str) -> Result<(), ApiError> {
        if !self.can_write() {
            return Err(ApiError::AccessDenied(format!(
                "Agent {} (role: {:?}) cannot write document '{}'",
                self.agent_id, self.role, key
            )));
        }
        Ok(())
    }
}
