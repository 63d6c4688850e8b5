//! Tagged document payloads.
//!
//! Every payload written to a shared document is wrapped in an envelope that
//! names the kind of content it carries. Decoding checks the tag before the
//! content is touched, so a document written by another feature under the
//! same key fails with `TypeMismatch` instead of being coerced.

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope schema written by this crate
pub const ENVELOPE_SCHEMA: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: String,
    pub schema: u32,
    pub written_at: DateTime<Utc>,
    /// Encoded content, interpreted according to `kind`
    pub content: String,
}

/// Only the tag fields, so a foreign envelope can be identified without
/// requiring its content to be a string
#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    kind: Option<String>,
    schema: Option<u32>,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, content: String) -> Self {
        Self {
            kind: kind.into(),
            schema: ENVELOPE_SCHEMA,
            written_at: Utc::now(),
            content,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(self)
            .map_err(|e| ApiError::DecodeError(format!("Failed to encode envelope: {}", e)))
    }

    /// Decode `payload` stored under `key` and check it carries `expected_kind`.
    ///
    /// Unparseable bytes are a `DecodeError`; well-formed JSON that is not an
    /// envelope of `expected_kind` at a supported schema is a `TypeMismatch`.
    pub fn open(key: &str, expected_kind: &str, payload: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_slice(payload).map_err(|e| {
            ApiError::DecodeError(format!("Document '{}' is not valid JSON: {}", key, e))
        })?;

        let mismatch = |found: String| ApiError::TypeMismatch {
            key: key.to_string(),
            expected: expected_kind.to_string(),
            found,
        };

        let header: EnvelopeHeader = match &value {
            serde_json::Value::Object(_) => serde_json::from_value(value.clone())
                .map_err(|_| mismatch("malformed envelope".to_string()))?,
            serde_json::Value::Array(_) => return Err(mismatch("untagged array".to_string())),
            other => return Err(mismatch(format!("untagged {}", json_type_name(other)))),
        };

        match (header.kind, header.schema) {
            (Some(kind), Some(schema)) if kind == expected_kind && schema <= ENVELOPE_SCHEMA => {}
            (Some(kind), Some(schema)) if kind == expected_kind => {
                return Err(mismatch(format!("{} schema {}", kind, schema)))
            }
            (Some(kind), _) => return Err(mismatch(kind)),
            (None, _) => return Err(mismatch("untagged object".to_string())),
        }

        serde_json::from_value(value).map_err(|e| {
            ApiError::DecodeError(format!("Document '{}' has a corrupt envelope: {}", key, e))
        })
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
