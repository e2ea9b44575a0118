//! Read-only integration checker configuration.

use crate::model::metadata::{Metadata, SourceId};
use crate::model::sheet::Sheet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Last-known-good fetch result for one source's canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub source: SourceId,
    pub canonical_url: String,
    pub metadata: Metadata,
    pub sheet: Sheet,
    /// Unix epoch milliseconds.
    pub captured_at_ms: i64,
}

impl Snapshot {
    /// Captures a snapshot stamped with the current time.
    pub fn capture(
        source: SourceId,
        canonical_url: impl Into<String>,
        metadata: Metadata,
        sheet: Sheet,
    ) -> Self {
        let captured_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as i64);
        Self {
            source,
            canonical_url: canonical_url.into(),
            metadata,
            sheet,
            captured_at_ms,
        }
    }
}

/// Canonical URLs and snapshots, built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationConfig {
    canonical_urls: BTreeMap<SourceId, String>,
    snapshots: BTreeMap<SourceId, Snapshot>,
}

impl IntegrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canonical_url(mut self, source: SourceId, url: impl Into<String>) -> Self {
        self.canonical_urls.insert(source, url.into());
        self
    }

    /// Adds a snapshot; its URL becomes the canonical URL unless one is set.
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.canonical_urls
            .entry(snapshot.source.clone())
            .or_insert_with(|| snapshot.canonical_url.clone());
        self.snapshots.insert(snapshot.source.clone(), snapshot);
        self
    }

    pub fn canonical_url(&self, source: &SourceId) -> Option<&str> {
        self.canonical_urls.get(source).map(String::as_str)
    }

    pub fn snapshot(&self, source: &SourceId) -> Option<&Snapshot> {
        self.snapshots.get(source)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.canonical_urls.keys()
    }
}
