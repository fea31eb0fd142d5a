//! Pull-based decoding of a CSV input.
//!
//! A [`CsvSource`] owns one raw row reader and one row decoder. It is an [`Iterator`] whose
//! items are nested results:
//!
//! - the outer `anyhow::Result` carries I/O faults of the underlying reader,
//! - the inner [`DecodeResult`] carries the outcome of decoding one row.
//!
//! A row that fails to decode is an ordinary item and does not stop the stream. An I/O fault
//! is yielded once and ends it.
//!
//! # Lifecycle
//!
//! A source starts unopened and opens on the first pull, skipping the header row if the format
//! has one. The reader is closed exactly once, on whichever happens first: the input runs out,
//! the reader fails, [`close`](CsvSource::close) is called, or the source is dropped. A closed
//! source only ever yields `None`.
//!
//! ```
//! use ironcsv::{cell, CsvFormat, CsvSource};
//! use ironcsv::row::row2;
//!
//! # fn main() -> anyhow::Result<()> {
//! let text = "id,name\n1,a\n2,b\n";
//! let format = CsvFormat::new().has_header(true);
//! let source = CsvSource::from_reader(text.as_bytes(), &format, row2(cell::u32(), cell::string()))?;
//!
//! let rows = source.collect_fail_fast()?;
//! assert_eq!(rows, vec![(1, "a".to_string()), (2, "b".to_string())]);
//! # Ok(())
//! # }
//! ```

use crate::failures::{FailureCollector, FailureMode};
use crate::format::CsvFormat;
use crate::raw::{CsvRowReader, RawRowReader};
use crate::result::DecodeResult;
use crate::row::RowDecoder;
use anyhow::{Context, Result};
use std::io::Read;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

type BoxedReader = Box<dyn RawRowReader + Send>;
type Opener = Box<dyn FnOnce() -> Result<BoxedReader> + Send>;

enum State {
    /// Holds a reader that has not been pulled from yet.
    Ready(BoxedReader),
    /// Nothing acquired yet; the reader is created on first pull.
    Deferred(Opener),
    Open(BoxedReader),
    Closed,
}

/// A single-pass stream of decoded rows.
///
/// A source is `Send` whenever its decoder is, so it can be handed to another thread and
/// drained there.
pub struct CsvSource<A, D> {
    state: State,
    decoder: D,
    has_header: bool,
    label: String,
    rows_read: usize,
    failures: usize,
    _a: PhantomData<fn() -> A>,
}

impl<A, D: RowDecoder<A>> CsvSource<A, D> {
    /// A source over an already split input.
    pub fn new(reader: impl RawRowReader + Send + 'static, has_header: bool, decoder: D) -> Self {
        Self::with_state(State::Ready(Box::new(reader)), has_header, decoder, "reader")
    }

    /// A source over any `Read`, tokenized according to `format`.
    ///
    /// # Errors
    /// Returns an error if the format's delimiter or quote is not ASCII.
    pub fn from_reader<R: Read + Send + 'static>(
        input: R,
        format: &CsvFormat,
        decoder: D,
    ) -> Result<Self> {
        let reader = CsvRowReader::new(input, format)?;
        Ok(Self::new(reader, format.has_header, decoder))
    }

    /// A source over the file at `path`, decompressed according to the format's
    /// [`compression`](CsvFormat::compression).
    ///
    /// The file is opened on the first pull; a failure to open it is yielded as the first item.
    ///
    /// # Errors
    /// Returns an error if the format's delimiter or quote is not ASCII.
    pub fn from_path(path: impl AsRef<Path>, format: &CsvFormat, decoder: D) -> Result<Self> {
        format.delimiter_byte()?;
        format.quote_byte()?;
        let path: PathBuf = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        let has_header = format.has_header;
        let format = format.clone();
        let opener: Opener = Box::new(move || {
            let input = crate::io::open_input(&path, format.compression)?;
            let reader = CsvRowReader::new(input, &format)?;
            Ok(Box::new(reader) as BoxedReader)
        });
        Ok(Self::with_state(
            State::Deferred(opener),
            has_header,
            decoder,
            label,
        ))
    }

    fn with_state(state: State, has_header: bool, decoder: D, label: impl Into<String>) -> Self {
        Self {
            state,
            decoder,
            has_header,
            label: label.into(),
            rows_read: 0,
            failures: 0,
            _a: PhantomData,
        }
    }

    /// Decode every row, stopping only at an I/O fault.
    ///
    /// # Errors
    /// Returns the first I/O fault of the underlying reader.
    pub fn collect_results(self) -> Result<Vec<DecodeResult<A>>> {
        self.collect()
    }

    /// Decode every row, stopping at the first I/O fault or decode failure.
    ///
    /// # Errors
    /// Returns the first I/O fault, or the first decode failure with its row number.
    pub fn collect_fail_fast(self) -> Result<Vec<A>> {
        let mut sink = FailureCollector::new();
        self.collect_with_mode(FailureMode::FailFast, &mut sink)
    }

    /// Decode every row, handling decode failures according to `mode`.
    ///
    /// Failing rows are dropped from the output under [`FailureMode::Skip`] and
    /// [`FailureMode::Collect`]; the latter also records them in `collector`.
    ///
    /// # Errors
    /// Returns the first I/O fault, or under [`FailureMode::FailFast`] the first decode failure.
    pub fn collect_with_mode(
        mut self,
        mode: FailureMode,
        collector: &mut FailureCollector,
    ) -> Result<Vec<A>> {
        let mut out = Vec::new();
        while let Some(item) = self.next() {
            match item? {
                Ok(value) => out.push(value),
                Err(e) => match mode {
                    FailureMode::Skip => {}
                    FailureMode::Collect => collector.add(self.rows_read, e),
                    FailureMode::FailFast => {
                        let row = self.rows_read;
                        return Err(anyhow::Error::new(e))
                            .with_context(|| format!("decode CSV row #{row} of {}", self.label));
                    }
                },
            }
        }
        Ok(out)
    }
}

impl<A, D> CsvSource<A, D> {
    /// Data rows pulled so far, not counting a skipped header.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Rows pulled so far that failed to decode.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Stop reading and release the input now.
    ///
    /// Closing an already closed source does nothing.
    ///
    /// # Errors
    /// Returns an error if the underlying reader fails to close. The source is closed either way.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Ready(mut reader) | State::Open(mut reader) => {
                tracing::debug!(
                    "Closing CSV source {} after {} rows ({} failed)",
                    self.label,
                    self.rows_read,
                    self.failures
                );
                reader
                    .close()
                    .with_context(|| format!("close CSV source {}", self.label))
            }
            State::Deferred(_) | State::Closed => Ok(()),
        }
    }

    /// Acquire the reader and skip the header. Leaves the source open or closed.
    fn open(&mut self) -> Result<()> {
        let reader = match std::mem::replace(&mut self.state, State::Closed) {
            State::Ready(reader) => reader,
            State::Deferred(opener) => opener()?,
            other => {
                self.state = other;
                return Ok(());
            }
        };
        tracing::debug!("Opened CSV source {}", self.label);
        self.state = State::Open(reader);
        if self.has_header
            && let State::Open(reader) = &mut self.state
        {
            match reader.next_raw_row() {
                Ok(Some(_)) => {}
                Ok(None) => return self.close(),
                Err(e) => return Err(self.fault(e.context("read CSV header"))),
            }
        }
        Ok(())
    }

    /// Close after an I/O fault, keeping the fault as the error to report.
    fn fault(&mut self, err: anyhow::Error) -> anyhow::Error {
        if let Err(close_err) = self.close() {
            tracing::warn!("{close_err:#}");
        }
        err.context(format!("read CSV source {}", self.label))
    }
}

impl<A, D: RowDecoder<A>> Iterator for CsvSource<A, D> {
    type Item = Result<DecodeResult<A>>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Ready(_) | State::Deferred(_))
            && let Err(e) = self.open()
        {
            return Some(Err(e));
        }
        let State::Open(reader) = &mut self.state else {
            return None;
        };
        match reader.next_raw_row() {
            Ok(Some(fields)) => {
                self.rows_read += 1;
                let decoded = self.decoder.decode_row(&fields);
                if let Err(e) = &decoded {
                    self.failures += 1;
                    tracing::trace!("CSV row #{} failed to decode: {}", self.rows_read, e);
                }
                Some(Ok(decoded))
            }
            Ok(None) => self.close().err().map(Err),
            Err(e) => Some(Err(self.fault(e))),
        }
    }
}

impl<A, D: RowDecoder<A>> FusedIterator for CsvSource<A, D> {}

impl<A, D> Drop for CsvSource<A, D> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("{e:#}");
        }
    }
}
