//! Core fetch orchestration and reconciliation for CardHub.
//! This crate is the single source of truth for metadata/sheet invariants.

pub mod db;
pub mod fetch;
pub mod integration;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repo;

pub use fetch::error::{
    error_kind_of, AdapterError, AdapterResult, ErrorKind, FetchError, FetchResult,
};
pub use fetch::fetcher::{BaseFetcher, Fetcher};
pub use fetch::router::{RoutedTaskMap, RoutedTaskSlice, Router, RouterError};
pub use fetch::stage::StageCell;
pub use fetch::task::{FetchedCard, Task};
pub use integration::check::{
    check_integrations, IntegrationReport, IntegrationResult, IntegrationStatus,
};
pub use integration::config::{IntegrationConfig, Snapshot};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::binder::{Binder, BookBinder, MetadataBinder, RawResponse};
pub use model::metadata::{CardInfo, CreatorInfo, Metadata, SourceId, ANONYMOUS_CREATOR};
pub use model::sheet::{BookEntry, CharacterBook, Sheet};
pub use model::tag::{tag_names, Tag};
pub use normalize::consistency::is_consistent;
pub use normalize::patch::patch_sheet;
pub use normalize::tags::{merge_tags, sanitize_tag, tags_from_names, MergedTags};
pub use repo::snapshot_repo::{RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
