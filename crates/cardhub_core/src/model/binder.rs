//! Raw-response envelopes threaded through a task's stages.
//!
//! # Invariants
//! - A binder is produced once per task and only read afterwards.
//! - Site-specific document traversal stays inside adapters.

use serde_json::Value;

/// Raw metadata response returned by an adapter transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as a JSON document.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Parsed metadata document plus the URLs derived for it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBinder {
    pub character_id: String,
    pub normalized_url: String,
    pub direct_url: String,
    pub document: Value,
}

/// Raw lore-book documents linked from the metadata document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookBinder {
    pub documents: Vec<Value>,
    /// Newest update time across `documents`, unix-epoch nanoseconds.
    pub update_time: i64,
}

/// Full binder shared by the metadata and card stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Binder {
    pub metadata: MetadataBinder,
    pub books: BookBinder,
}
