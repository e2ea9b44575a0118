//! Reconciliation between metadata headers and embedded sheets.
//!
//! # Responsibility
//! - Canonicalize and merge tag collections.
//! - Patch a sheet so it agrees with its metadata.
//! - Verify agreement with a pure predicate.
//!
//! # Invariants
//! - Nothing in this module touches the network or storage.
//! - `patch_sheet` output always satisfies `is_consistent`.

pub mod consistency;
pub mod patch;
pub mod tags;
