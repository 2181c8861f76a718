//! SQLite-backed key-value store.
//!
//! The store keeps raw keys and values in a single `WITHOUT ROWID` table
//! keyed by a BLOB primary key. SQLite compares BLOBs with `memcmp`, so an
//! index scan from the prefix upward returns keys in the same lexicographic
//! byte order as an LSM iterator would.
//!
//! # Snapshot
//!
//! Each scan runs inside its own deferred read transaction. The first read
//! pins the snapshot; rows committed by writers afterwards are not visible
//! until the scan finishes.

use crate::{error::StoreError, KvStore};
use rusqlite::{params, Connection, OpenFlags};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Schema of the key-value table. Exposed so fixtures and loaders can
/// create compatible stores; this crate never executes it.
pub const KV_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key   BLOB PRIMARY KEY,
    value BLOB NOT NULL
) WITHOUT ROWID;
"#;

const SCAN_SQL: &str = "SELECT key, value FROM kv WHERE key >= ?1 ORDER BY key";

/// Read-only handle on an SQLite key-value store.
///
/// One handle serves one worker. Peer workers open their own handles; SQLite
/// supports any number of concurrent readers on the same file.
///
/// # Example
///
/// ```rust,no_run
/// use tdx_store::SqliteStore;
///
/// use tdx_store::KvStore;
///
/// let store = SqliteStore::open_read_only("store.db").expect("store");
/// let mut trades = 0;
/// store
///     .scan_prefix(b"M:", |_, _| {
///         trades += 1;
///         std::ops::ControlFlow::Continue(())
///     })
///     .expect("scan");
/// println!("{} trade records", trades);
/// ```
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open an existing store without write access.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `path`
    /// - `Open` if the file cannot be opened or is not a database
    /// - `MissingTable` if the database has no `kv` table
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(StoreError::NotFound(path));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&path, flags).map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;

        // First real read: surfaces "file is not a database" here rather
        // than in the middle of a scan.
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv'",
                [],
                |row| row.get(0),
            )
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;

        if tables == 0 {
            return Err(StoreError::MissingTable(path));
        }

        info!(path = %path.display(), "Store opened read-only");

        Ok(Self { conn, path })
    }
}

impl KvStore for SqliteStore {
    fn scan_prefix<F>(&self, prefix: &[u8], mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(&[u8], &[u8]) -> ControlFlow<()>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let mut visited = 0u64;

        {
            let mut stmt = tx.prepare(SCAN_SQL)?;
            let mut rows = stmt.query(params![prefix])?;

            while let Some(row) = rows.next()? {
                let key: Vec<u8> = row.get(0)?;
                if !key.starts_with(prefix) {
                    break;
                }

                let value: Vec<u8> = row.get(1)?;
                visited += 1;

                if visit(&key, &value).is_break() {
                    break;
                }
            }
        }

        // Read-only transaction: nothing to commit.
        tx.rollback()?;

        debug!(
            path = %self.path.display(),
            prefix = %String::from_utf8_lossy(prefix),
            visited,
            "Prefix scan finished"
        );

        Ok(())
    }
}
