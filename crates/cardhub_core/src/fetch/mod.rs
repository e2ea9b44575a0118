//! Routed, memoized fetch orchestration.
//!
//! # Responsibility
//! - Define the adapter capability contract (`Fetcher`).
//! - Turn URLs into tasks and run their stages exactly once.
//! - Classify failures into the coded `ErrorKind` taxonomy.

pub mod error;
pub mod fetcher;
pub mod router;
pub mod stage;
pub mod task;
