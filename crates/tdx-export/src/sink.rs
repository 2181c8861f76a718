//! CSV output sink.

use crate::formatter::{TradeRow, HEADER};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Buffered CSV destination for trade rows.
///
/// The header is written exactly once, before the first row. Callers must
/// call [`flush`](CsvSink::flush) on every exit path; dropping the sink
/// flushes too, but silently discards any error.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
    rows: u64,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer.
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        Self {
            writer,
            header_written: false,
            rows: 0,
        }
    }

    /// Write the header row. Later calls are no-ops.
    pub fn write_header(&mut self) -> Result<(), csv::Error> {
        if self.header_written {
            return Ok(());
        }
        self.writer.write_record(HEADER)?;
        self.header_written = true;
        Ok(())
    }

    /// Write one data row, writing the header first if needed.
    pub fn write_row(&mut self, row: &TradeRow) -> Result<(), csv::Error> {
        self.write_header()?;
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Push buffered output to the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Data rows written so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
