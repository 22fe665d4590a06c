//! Response types for the API

use serde::{Deserialize, Serialize};

use crate::vstorage::Id;

/// List of object identifiers returned by discovery endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdList {
    pub ids: Vec<Id>,
}

impl IdList {
    /// Plain identifier strings, in response order
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        self.ids.into_iter().map(|id| id.id).collect()
    }
}

/// Error body returned with non-success status codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Not-found error body
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }
}
