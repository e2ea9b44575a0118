//! Operational health check over registered adapters.
//!
//! # Responsibility
//! - Fetch one canonical character per source and verify the result.
//! - Compare results against last-known-good snapshots.
//!
//! # Invariants
//! - Configuration is supplied by the caller and only read here.
//! - Checks run one thread per adapter and all are joined before reporting.

pub mod check;
pub mod config;
