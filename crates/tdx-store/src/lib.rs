//! # tdx-store
//!
//! Read-only access to the embedded, ordered key-value store that holds
//! trade records.
//!
//! This crate provides a [`KvStore`] trait abstraction over the store, so the
//! export pipeline only ever sees an ordered prefix scan:
//!
//! - **Read-only**: Nothing here writes. [`SqliteStore`] opens the database
//!   with read-only flags and refuses to create a missing file.
//!
//! - **Ordered**: Keys are visited in ascending lexicographic byte order,
//!   the same order a seek-then-next iterator over the store yields.
//!
//! - **Testable**: The [`MemoryStore`] implementation allows testing the
//!   pipeline without any file on disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::ops::ControlFlow;
//! use tdx_store::{KvStore, SqliteStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open_read_only("/var/lib/chain/store.db")?;
//!
//!     let mut count = 0;
//!     store.scan_prefix(b"M:", |_key, _value| {
//!         count += 1;
//!         ControlFlow::Continue(())
//!     })?;
//!
//!     println!("{} trade records", count);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing with MemoryStore
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use tdx_store::{KvStore, MemoryStore};
//!
//! let store = MemoryStore::new()
//!     .with_entry(b"M:2".to_vec(), b"second".to_vec())
//!     .with_entry(b"M:1".to_vec(), b"first".to_vec())
//!     .with_entry(b"O:1".to_vec(), b"an order".to_vec());
//!
//! let mut seen = Vec::new();
//! store
//!     .scan_prefix(b"M:", |_key, value| {
//!         seen.push(value.to_vec());
//!         ControlFlow::Continue(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(seen, vec![b"first".to_vec(), b"second".to_vec()]);
//! ```

pub mod error;
mod memory;
mod sqlite;

use std::ops::ControlFlow;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, KV_TABLE_SCHEMA};

/// Ordered key-value store abstraction.
///
/// ## Scan Semantics
///
/// [`scan_prefix`](KvStore::scan_prefix) visits every entry whose key starts
/// with `prefix`, in ascending key order, against a snapshot of the store
/// taken when the scan starts. Writes made by other processes during the
/// scan are not observed.
///
/// The visitor returns [`ControlFlow::Break`] to stop the scan early. An
/// early stop is not an error; the visitor keeps whatever reason it had.
///
/// ## Implementors
///
/// - [`SqliteStore`]: Production implementation over an SQLite database
/// - [`MemoryStore`]: In-memory implementation for tests
pub trait KvStore {
    /// Visit all entries under `prefix` in ascending key order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the underlying iteration fails.
    fn scan_prefix<F>(&self, prefix: &[u8], visit: F) -> Result<(), StoreError>
    where
        F: FnMut(&[u8], &[u8]) -> ControlFlow<()>;
}
