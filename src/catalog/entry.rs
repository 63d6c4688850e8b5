//! Catalog entries: one named record of service metadata.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field names of an entry record, in listing order
pub const ENTRY_FIELDS: [&str; 5] = ["name", "version", "github", "frontend", "description"];

/// A registered service.
///
/// All fields are trimmed on construction and the name is never blank.
/// Entries are replaced as a whole; there are no field setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct CatalogEntry {
    name: String,
    version: String,
    github: String,
    frontend: String,
    description: String,
}

/// Unvalidated wire shape of an entry; absent fields decode as `None`
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    github: Option<String>,
    #[serde(default)]
    frontend: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawEntry> for CatalogEntry {
    type Error = ApiError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        CatalogEntry::new(
            raw.name.as_deref(),
            raw.version.as_deref(),
            raw.github.as_deref(),
            raw.frontend.as_deref(),
            raw.description.as_deref(),
        )
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl CatalogEntry {
    /// Build an entry from optional field values.
    ///
    /// Fails with `InvalidEntry` if the name is missing or blank after trimming.
    pub fn new(
        name: Option<&str>,
        version: Option<&str>,
        github: Option<&str>,
        frontend: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, ApiError> {
        let name = name
            .ok_or_else(|| ApiError::InvalidEntry("Name must not be null".to_string()))?
            .trim();
        if name.is_empty() {
            return Err(ApiError::InvalidEntry("Name must not be empty".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            version: trimmed(version),
            github: trimmed(github),
            frontend: trimmed(frontend),
            description: trimmed(description),
        })
    }

    /// Build an entry from a JSON object with the five entry fields.
    ///
    /// Absent or null fields are treated as empty, except `name`.
    pub fn parse(value: &serde_json::Value) -> Result<Self, ApiError> {
        let object = value.as_object().ok_or_else(|| {
            ApiError::ParseError("Entry submission must be a JSON object".to_string())
        })?;

        let mut fields: [Option<&str>; 5] = [None; 5];
        for (slot, field) in fields.iter_mut().zip(ENTRY_FIELDS) {
            *slot = match object.get(field) {
                None | Some(serde_json::Value::Null) => None,
                Some(serde_json::Value::String(s)) => Some(s.as_str()),
                Some(other) => {
                    return Err(ApiError::ParseError(format!(
                        "Field '{}' must be a string, got {}",
                        field, other
                    )))
                }
            };
        }

        let [name, version, github, frontend, description] = fields;
        Self::new(name, version, github, frontend, description)
    }

    /// Parse a single-entry submission from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::parse(&value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn github(&self) -> &str {
        &self.github
    }

    pub fn frontend(&self) -> &str {
        &self.frontend
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Field name to value mapping for record-map callers
    pub fn to_record(&self) -> BTreeMap<String, String> {
        ENTRY_FIELDS
            .iter()
            .zip([
                &self.name,
                &self.version,
                &self.github,
                &self.frontend,
                &self.description,
            ])
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    /// Entry as a JSON object with all five fields present
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "version": self.version,
            "github": self.github,
            "frontend": self.frontend,
            "description": self.description,
        })
    }
}
