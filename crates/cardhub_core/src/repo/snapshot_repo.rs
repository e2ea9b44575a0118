//! Snapshot repository contract and SQLite implementation.

use crate::db::DbError;
use crate::integration::config::{IntegrationConfig, Snapshot};
use crate::model::metadata::SourceId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SNAPSHOT_SELECT_SQL: &str = "SELECT
    source_id,
    canonical_url,
    metadata_json,
    sheet_json,
    captured_at
FROM integration_snapshots";

pub type RepoResult<T> = Result<T, RepoError>;

/// Snapshot persistence error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(SourceId),
    InvalidData(String),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(source_id) => write!(f, "snapshot not found: {source_id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted snapshot: {message}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Last-known-good snapshot storage.
pub trait SnapshotRepository {
    fn upsert_snapshot(&self, snapshot: &Snapshot) -> RepoResult<()>;
    fn get_snapshot(&self, source_id: &SourceId) -> RepoResult<Option<Snapshot>>;
    fn list_snapshots(&self) -> RepoResult<Vec<Snapshot>>;
    fn delete_snapshot(&self, source_id: &SourceId) -> RepoResult<()>;

    /// Builds the read-only checker configuration from every stored snapshot.
    fn load_integration_config(&self) -> RepoResult<IntegrationConfig> {
        let config = self
            .list_snapshots()?
            .into_iter()
            .fold(IntegrationConfig::new(), |config, snapshot| {
                config.with_snapshot(snapshot)
            });
        Ok(config)
    }
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn upsert_snapshot(&self, snapshot: &Snapshot) -> RepoResult<()> {
        let metadata_json = serde_json::to_string(&snapshot.metadata).map_err(RepoError::Encode)?;
        let sheet_json = serde_json::to_string(&snapshot.sheet).map_err(RepoError::Encode)?;

        self.conn.execute(
            "INSERT INTO integration_snapshots (
                source_id,
                canonical_url,
                metadata_json,
                sheet_json,
                captured_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(source_id) DO UPDATE SET
                canonical_url = excluded.canonical_url,
                metadata_json = excluded.metadata_json,
                sheet_json = excluded.sheet_json,
                captured_at = excluded.captured_at;",
            params![
                snapshot.source.as_str(),
                snapshot.canonical_url.as_str(),
                metadata_json,
                sheet_json,
                snapshot.captured_at_ms,
            ],
        )?;
        Ok(())
    }

    fn get_snapshot(&self, source_id: &SourceId) -> RepoResult<Option<Snapshot>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SNAPSHOT_SELECT_SQL} WHERE source_id = ?1;"))?;
        let raw = stmt
            .query_row([source_id.as_str()], read_raw_row)
            .optional()?;
        raw.map(decode_snapshot).transpose()
    }

    fn list_snapshots(&self) -> RepoResult<Vec<Snapshot>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SNAPSHOT_SELECT_SQL} ORDER BY source_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut snapshots = Vec::new();
        while let Some(row) = rows.next()? {
            snapshots.push(decode_snapshot(read_raw_row(row)?)?);
        }
        Ok(snapshots)
    }

    fn delete_snapshot(&self, source_id: &SourceId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM integration_snapshots WHERE source_id = ?1;",
            [source_id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(source_id.clone()));
        }
        Ok(())
    }
}

struct RawSnapshotRow {
    source_id: String,
    canonical_url: String,
    metadata_json: String,
    sheet_json: String,
    captured_at_ms: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawSnapshotRow> {
    Ok(RawSnapshotRow {
        source_id: row.get(0)?,
        canonical_url: row.get(1)?,
        metadata_json: row.get(2)?,
        sheet_json: row.get(3)?,
        captured_at_ms: row.get(4)?,
    })
}

fn decode_snapshot(raw: RawSnapshotRow) -> RepoResult<Snapshot> {
    let metadata = serde_json::from_str(&raw.metadata_json).map_err(|err| {
        RepoError::InvalidData(format!(
            "metadata_json for `{}` does not decode: {err}",
            raw.source_id
        ))
    })?;
    let sheet = serde_json::from_str(&raw.sheet_json).map_err(|err| {
        RepoError::InvalidData(format!(
            "sheet_json for `{}` does not decode: {err}",
            raw.source_id
        ))
    })?;
    Ok(Snapshot {
        source: SourceId::new(raw.source_id),
        canonical_url: raw.canonical_url,
        metadata,
        sheet,
        captured_at_ms: raw.captured_at_ms,
    })
}
