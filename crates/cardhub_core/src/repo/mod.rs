//! Persistence for integration snapshots.
//!
//! # Invariants
//! - At most one last-known-good snapshot is stored per source.
//! - Stored JSON that no longer decodes is reported, never skipped.

pub mod snapshot_repo;
