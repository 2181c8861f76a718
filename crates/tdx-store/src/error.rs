//! Error types for the store layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when opening or scanning the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store path does not exist. Read-only opens never create it.
    #[error("store not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The database could not be opened or is not a valid store.
    #[error("failed to open store at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The database has no key-value table.
    #[error("store at {} has no `kv` table", .0.display())]
    MissingTable(PathBuf),

    /// Query or iteration error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
