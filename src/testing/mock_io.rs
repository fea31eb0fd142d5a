//! Mock I/O helpers for testing sources and sinks without real streams.
//!
//! [`MockRowReader`] and [`MockRowWriter`] implement the raw row traits over in-memory rows.
//! Both hand out a [`MockTracker`] before they are moved into a source or sink, so a test can
//! still observe close calls and written rows afterwards. Either can be told to fail on a
//! given row to exercise the I/O fault paths.

use crate::raw::{RawRowReader, RawRowWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::{NamedTempFile, TempDir};

#[derive(Default)]
struct Observed {
    closes: AtomicUsize,
    flushes: AtomicUsize,
    pulls: AtomicUsize,
    rows: Mutex<Vec<Vec<String>>>,
}

/// Shared view of what a mock reader or writer has been asked to do.
#[derive(Clone, Default)]
pub struct MockTracker {
    inner: Arc<Observed>,
}

impl MockTracker {
    /// How many times `close` was called.
    pub fn close_count(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }

    /// How many times `flush` was called (writers only).
    pub fn flush_count(&self) -> usize {
        self.inner.flushes.load(Ordering::SeqCst)
    }

    /// How many rows were requested (readers only), including the final `None`.
    pub fn pull_count(&self) -> usize {
        self.inner.pulls.load(Ordering::SeqCst)
    }

    /// Rows written so far (writers only), header included.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.inner
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn owned_rows<R, S>(rows: R) -> Vec<Vec<String>>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = S>,
    S: Into<String>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

/// In-memory [`RawRowReader`].
///
/// ```
/// use ironcsv::testing::MockRowReader;
/// use ironcsv::{cell, CsvSource};
///
/// let reader = MockRowReader::new([["1"], ["x"]]);
/// let tracker = reader.tracker();
/// let mut source = CsvSource::new(reader, false, cell::i32());
/// assert_eq!(source.next().unwrap().unwrap(), Ok(1));
/// drop(source);
/// assert_eq!(tracker.close_count(), 1);
/// ```
pub struct MockRowReader {
    rows: std::vec::IntoIter<Vec<String>>,
    fail_at: Option<usize>,
    pulled: usize,
    closed: bool,
    tracker: MockTracker,
}

impl MockRowReader {
    pub fn new<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: owned_rows(rows).into_iter(),
            fail_at: None,
            pulled: 0,
            closed: false,
            tracker: MockTracker::default(),
        }
    }

    /// Fail with an I/O error on the `n`th pull (0-based) instead of returning a row.
    #[must_use]
    pub fn fail_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// A handle that outlives this reader.
    pub fn tracker(&self) -> MockTracker {
        self.tracker.clone()
    }
}

impl RawRowReader for MockRowReader {
    fn next_raw_row(&mut self) -> anyhow::Result<Option<Vec<String>>> {
        if self.closed {
            anyhow::bail!("mock reader used after close");
        }
        let n = self.pulled;
        self.pulled += 1;
        self.tracker.inner.pulls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(n) {
            return Err(std::io::Error::other(format!("injected read fault at pull {n}")).into());
        }
        Ok(self.rows.next())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.closed = true;
        self.tracker.inner.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory [`RawRowWriter`] that records every row it is given.
pub struct MockRowWriter {
    fail_at: Option<usize>,
    written: usize,
    closed: bool,
    tracker: MockTracker,
}

impl Default for MockRowWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRowWriter {
    pub fn new() -> Self {
        Self {
            fail_at: None,
            written: 0,
            closed: false,
            tracker: MockTracker::default(),
        }
    }

    /// Fail with an I/O error on the `n`th row write (0-based, header included).
    #[must_use]
    pub fn fail_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub fn tracker(&self) -> MockTracker {
        self.tracker.clone()
    }
}

impl RawRowWriter for MockRowWriter {
    fn write_raw_row(&mut self, fields: &[String]) -> anyhow::Result<()> {
        if self.closed {
            anyhow::bail!("mock writer used after close");
        }
        let n = self.written;
        self.written += 1;
        if self.fail_at == Some(n) {
            return Err(std::io::Error::other(format!("injected write fault at row {n}")).into());
        }
        self.tracker
            .inner
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(fields.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.tracker.inner.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.flush()?;
        self.closed = true;
        self.tracker.inner.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    _temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new empty temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self {
            _temp_file: temp_file,
            path,
        })
    }

    /// Create a new temporary file whose name ends in `.{extension}`.
    ///
    /// The extension decides compression, so `"csv.gz"` gives a gzip file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self {
            _temp_file: temp_file,
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A temporary directory that is automatically deleted when dropped.
pub struct TempDirPath {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path for `filename` inside this directory. The file is not created.
    #[must_use]
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }
}

/// Create a temporary `.csv` file holding `text` verbatim.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written.
pub fn mock_csv_file(text: &str) -> std::io::Result<TempFilePath> {
    let temp = TempFilePath::with_extension("csv")?;
    std::fs::write(temp.path(), text)?;
    Ok(temp)
}
