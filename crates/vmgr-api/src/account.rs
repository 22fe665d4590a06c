//! Host account types

use serde::{Deserialize, Serialize};

/// Local account on a managed host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAccountSpec {
    /// Account login name
    pub id: String,
}

impl HostAccountSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
