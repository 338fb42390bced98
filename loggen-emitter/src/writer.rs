//! Append-only output file writer.
//!
//! Each call performs a full open/append/close cycle; no handle is held
//! between ticks, so the file can be rotated or truncated externally and the
//! next emission simply recreates it.

use loggen_core::error::{LoggenError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::trace;

/// Writes whole lines to one path in append mode.
#[derive(Debug, Clone)]
pub struct AppendWriter {
    path: PathBuf,
}

impl AppendWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append `line` (already newline-terminated), creating the file if absent.
    pub fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LoggenError::io(&self.path, e))?;

        file.write_all(line.as_bytes())
            .map_err(|e| LoggenError::io(&self.path, e))?;
        file.flush().map_err(|e| LoggenError::io(&self.path, e))?;
        drop(file);

        trace!(path = %self.path.display(), bytes = line.len(), "Appended line");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
