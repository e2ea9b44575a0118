//! Snapshot database schema.
//!
//! # Invariants
//! - After `ensure_schema`, `PRAGMA user_version` equals [`SCHEMA_VERSION`].
//! - The snapshot table carries every column the repository selects.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;
/// Table holding one last-known-good snapshot per source.
pub const SNAPSHOT_TABLE: &str = "integration_snapshots";

const SNAPSHOT_COLUMNS: [&str; 5] = [
    "source_id",
    "canonical_url",
    "metadata_json",
    "sheet_json",
    "captured_at",
];

// captured_at is unix epoch milliseconds.
const CREATE_SNAPSHOT_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS integration_snapshots (
    source_id TEXT PRIMARY KEY NOT NULL,
    canonical_url TEXT NOT NULL,
    metadata_json TEXT NOT NULL,
    sheet_json TEXT NOT NULL,
    captured_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
);";

/// Creates the snapshot table on fresh databases and verifies existing ones.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::NewerSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_SNAPSHOT_TABLE_SQL)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        info!(
            "event=db_schema module=db status=ok table={} from_version={} to_version={}",
            SNAPSHOT_TABLE, found, SCHEMA_VERSION
        );
    }

    verify_snapshot_columns(conn)
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn verify_snapshot_columns(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([SNAPSHOT_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<BTreeSet<String>, _>>()?;

    let missing_columns: Vec<String> = SNAPSHOT_COLUMNS
        .into_iter()
        .filter(|column| !present.contains(*column))
        .map(str::to_string)
        .collect();
    if missing_columns.is_empty() {
        Ok(())
    } else {
        Err(DbError::SnapshotTableMismatch { missing_columns })
    }
}
