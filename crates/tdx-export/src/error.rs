//! Error types for the export pipeline.

use std::path::PathBuf;
use tdx_store::StoreError;
use tdx_types::TypeError;
use thiserror::Error;

/// Errors that can occur while exporting trades.
///
/// Variants fall in two classes, see [`ExportError::is_fatal`]:
/// - fatal: the data source or the destination is unusable, the whole run
///   has to stop
/// - scan-aborting: this pipeline stops where it is, rows already written
///   stay in the flushed output, peers carry on
#[derive(Debug, Error)]
pub enum ExportError {
    /// The store could not be opened.
    #[error("cannot open store: {0}")]
    StoreOpen(#[source] StoreError),

    /// The output file could not be created.
    #[error("cannot create output file {}: {source}", path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record could not be decoded.
    #[error("cannot decode record at key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: TypeError,
    },

    /// Writing a row to the output failed.
    #[error("write error: {0}")]
    Write(#[from] csv::Error),

    /// The store failed while iterating.
    #[error("scan error: {0}")]
    Scan(#[from] StoreError),

    /// Buffered output could not be flushed.
    #[error("flush error: {0}")]
    Flush(#[source] std::io::Error),

    /// Market metadata could not be parsed.
    #[error("invalid market metadata: {0}")]
    MarketData(#[from] serde_json::Error),

    /// Reading a whitelist or metadata file failed.
    #[error("cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Returns true if the error must stop the whole run, not only the
    /// pipeline that hit it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExportError::StoreOpen(_) | ExportError::OutputCreate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classes() {
        let fatal = ExportError::StoreOpen(StoreError::NotFound(PathBuf::from("x.db")));
        assert!(fatal.is_fatal());

        let fatal = ExportError::OutputCreate {
            path: PathBuf::from("trades-1.csv"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(fatal.is_fatal());

        let aborting = ExportError::Flush(std::io::Error::from(std::io::ErrorKind::WriteZero));
        assert!(!aborting.is_fatal());
    }

    #[test]
    fn test_decode_error_names_key() {
        let source = tdx_types::decode_trade(&[0x0f]).unwrap_err();
        let err = ExportError::Decode {
            key: "M:0001".to_string(),
            source,
        };
        assert!(err.to_string().contains("M:0001"));
        assert!(!err.is_fatal());
    }
}
