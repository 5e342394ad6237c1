//! Where scraped records go.
//!
//! A run hands its results to an [`OutputSink`] as a single batch.
//! [`JsonSink`] writes the batch as `{"urls": [...]}`.

// ============================================================================
// Imports
// ============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::scrape::ProductRecord;

// ============================================================================
// OutputSink
// ============================================================================

/// Accepts batches of scraped products.
pub trait OutputSink {
    /// Stores one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be written.
    fn push_batch(&mut self, records: &[ProductRecord]) -> Result<()>;
}

#[derive(Serialize)]
struct Batch<'a> {
    urls: &'a [ProductRecord],
}

// ============================================================================
// JsonSink
// ============================================================================

/// Writes each batch as pretty-printed JSON to a file or stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSink {
    path: Option<PathBuf>,
}

impl JsonSink {
    /// Writes to standard output.
    #[inline]
    #[must_use]
    pub fn stdout() -> Self {
        Self { path: None }
    }

    /// Writes to `path`, replacing its contents.
    #[inline]
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Output file, `None` for stdout.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn write_to(writer: impl Write, records: &[ProductRecord]) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, &Batch { urls: records })?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl OutputSink for JsonSink {
    fn push_batch(&mut self, records: &[ProductRecord]) -> Result<()> {
        match &self.path {
            Some(path) => {
                Self::write_to(File::create(path)?, records)?;
                info!(count = records.len(), path = %path.display(), "Results written");
            }
            None => Self::write_to(io::stdout().lock(), records)?,
        }
        Ok(())
    }
}

// ============================================================================
// MemorySink
// ============================================================================

/// Keeps batches in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    batches: Vec<Vec<ProductRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch pushed so far.
    #[inline]
    #[must_use]
    pub fn batches(&self) -> &[Vec<ProductRecord>] {
        &self.batches
    }
}

impl OutputSink for MemorySink {
    fn push_batch(&mut self, records: &[ProductRecord]) -> Result<()> {
        self.batches.push(records.to_vec());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
