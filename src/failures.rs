//! What to do with rows that fail to decode.
//!
//! A [`CsvSource`](crate::CsvSource) yields decode failures as ordinary items and leaves the
//! policy to the caller. [`FailureMode`] names the three usual policies and
//! [`FailureCollector`] keeps the failures that were set aside, for reporting once the stream
//! has been drained.
//!
//! ```
//! use ironcsv::{cell, CsvFormat, CsvSource, FailureCollector, FailureMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let text = "1\nx\n3\n";
//! let source = CsvSource::from_reader(text.as_bytes(), &CsvFormat::default(), cell::i64())?;
//!
//! let mut failures = FailureCollector::new();
//! let values = source.collect_with_mode(FailureMode::Collect, &mut failures)?;
//! assert_eq!(values, vec![1, 3]);
//! assert_eq!(failures.error_count(), 1);
//! assert_eq!(failures.errors()[0].row, 2);
//! # Ok(())
//! # }
//! ```

use crate::error::DecodeError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Policy for rows that fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Drop failing rows silently.
    Skip,
    /// Drop failing rows and record them in a [`FailureCollector`].
    #[default]
    Collect,
    /// Stop at the first failing row.
    FailFast,
}

/// One failed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// 1-based data row number, not counting a skipped header.
    pub row: usize,
    pub error: DecodeError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.error)
    }
}

/// Accumulates row failures for batch reporting.
#[derive(Debug, Clone, Default)]
pub struct FailureCollector {
    failures: Vec<RowFailure>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that data row `row` failed with `error`.
    pub fn add(&mut self, row: usize, error: DecodeError) {
        self.failures.push(RowFailure { row, error });
    }

    /// Number of failed rows recorded.
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn errors(&self) -> &[RowFailure] {
        &self.failures
    }

    pub fn clear(&mut self) {
        self.failures.clear();
    }

    /// Failures as a pretty-printed JSON array.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.failures)
    }

    /// Write [`to_json`](Self::to_json) to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        use anyhow::Context;
        let path = path.as_ref();
        let json = self.to_json().context("serialize row failures")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))
    }
}

impl fmt::Display for FailureCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FailureCollector({} failures)", self.error_count())
    }
}

impl Extend<RowFailure> for FailureCollector {
    fn extend<I: IntoIterator<Item = RowFailure>>(&mut self, iter: I) {
        self.failures.extend(iter);
    }
}
