// crates/mage-client/src/response.rs
// ============================================================================
// Module: Mage Response Envelope
// Description: Uniform response envelope returned by every Mage endpoint.
// Purpose: Decode `code`/`message`/`data`/`task_id` and pass `data` through.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every endpoint answers with the same JSON envelope:
//!
//! ```json
//! {"code": 0, "message": "ok", "data": {...}, "task_id": "..."}
//! ```
//!
//! `data` is vendor-defined and differs per endpoint. It is kept as an
//! uninterpreted [`Value`]; [`ApiResponse::data_as`] decodes it into a caller
//! chosen type on demand.
//! Invariants:
//! - `code` is required; a body without it is not an envelope.
//! - `data` is never modified by this crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

// ============================================================================
// SECTION: Task Identifier
// ============================================================================

/// Task identifier returned by submission endpoints.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new task identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Response Envelope
// ============================================================================

/// Decoded response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Vendor status code; `0` reports success.
    pub code: i64,
    /// Human-readable vendor message; `null` decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Endpoint-specific payload, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Task identifier from submission endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl ApiResponse {
    /// Returns true when the vendor reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Returns the task identifier, treating an empty string as absent.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        self.task_id.as_deref().filter(|id| !id.is_empty()).map(TaskId::new)
    }

    /// Decodes `data` into `T`.
    ///
    /// Returns `Ok(None)` when the envelope carries no data.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Data`] when `data` does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ClientError> {
        match &self.data {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                T::deserialize(value).map(Some).map_err(|err| ClientError::Data(err.to_string()))
            }
        }
    }

    /// Converts a non-success envelope into [`ClientError::Api`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] when `code` is non-zero.
    pub fn into_success(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Api {
                code: self.code,
                message: self.message,
            })
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes an optional string, mapping `null` to an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
