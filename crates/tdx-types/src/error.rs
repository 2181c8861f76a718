//! Error types for tdx-types.

use thiserror::Error;

/// Errors that can occur when working with types.
#[derive(Debug, Error)]
pub enum TypeError {
    /// Stored bytes are not a valid trade record.
    #[error("record decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}
