//! SQLite storage for integration snapshots.
//!
//! # Responsibility
//! - Open and configure connections to the snapshot database.
//! - Bring the `integration_snapshots` schema up to date before use.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Snapshots are not read or written before the schema check succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{SCHEMA_VERSION, SNAPSHOT_TABLE};

pub type DbResult<T> = Result<T, DbError>;

/// Snapshot database error.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer CardHub build.
    NewerSchema { found: u32, supported: u32 },
    /// The snapshot table exists but lacks columns the repository reads.
    SnapshotTableMismatch { missing_columns: Vec<String> },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "snapshot database schema version {found} is newer than supported {supported}"
            ),
            Self::SnapshotTableMismatch { missing_columns } => write!(
                f,
                "table `{SNAPSHOT_TABLE}` is missing columns: {}",
                missing_columns.join(", ")
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NewerSchema { .. } | Self::SnapshotTableMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
