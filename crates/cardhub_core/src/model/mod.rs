//! Normalized character-profile model.
//!
//! # Responsibility
//! - Define the typed shapes exchanged between adapters and core.
//! - Keep raw site documents confined to binder envelopes.
//!
//! # Invariants
//! - `Metadata::latest_update_time()` is `max(update_time, book_update_time)`.
//! - A retained `Tag` never has an empty slug.

pub mod binder;
pub mod metadata;
pub mod sheet;
pub mod tag;

/// Nanoseconds per second, used when truncating metadata timestamps.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Truncates a unix-epoch nanosecond timestamp to whole seconds.
pub fn unix_seconds(nanos: i64) -> i64 {
    nanos.div_euclid(NANOS_PER_SECOND)
}
