//! Push-based encoding into a CSV output.
//!
//! A [`CsvSink`] owns one raw row writer and one row encoder. The header, if any, is written
//! when the sink is opened; each [`write`](CsvSink::write) then encodes and writes one row, in
//! call order. The writer is flushed and released exactly once, on [`close`](CsvSink::close),
//! on drop, or as soon as a write fails.
//!
//! A row that encodes to no fields at all, such as an empty vector through
//! [`RowCodec::list`](crate::RowCodec::list), is written as a single empty field (`""`) because
//! CSV has no other way to spell it. Reading the file back yields a row of one empty field.
//!
//! ```
//! use ironcsv::{cell, CsvFormat, CsvSink};
//! use ironcsv::row::row2;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("out/points.csv");
//! let codec = row2(cell::i32(), cell::i32());
//!
//! let written = CsvSink::create(&path, &CsvFormat::default(), ["x", "y"], codec)?
//!     .scoped(|sink| sink.write_all(&[(1, 2), (3, 4)]))?;
//!
//! assert_eq!(written, 2);
//! assert_eq!(std::fs::read_to_string(&path)?, "x,y\n1,2\n3,4\n");
//! # Ok(())
//! # }
//! ```

use crate::format::CsvFormat;
use crate::io::compression::CompressedWriter;
use crate::raw::{CsvRowWriter, RawRowWriter};
use crate::row::RowEncoder;
use anyhow::{Context, Result};
use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;

type BoxedWriter = Box<dyn RawRowWriter + Send>;

/// A sequential writer of encoded rows.
///
/// A sink is `Send` whenever its encoder is.
pub struct CsvSink<A, E> {
    writer: Option<BoxedWriter>,
    encoder: E,
    label: String,
    rows_written: usize,
    fields: Vec<String>,
    _a: PhantomData<fn(&A)>,
}

impl<A, E: RowEncoder<A>> CsvSink<A, E> {
    /// Open a sink over `writer`, writing `header` first unless it is empty.
    ///
    /// # Errors
    /// Returns an error if the header cannot be written. The writer is released in that case.
    pub fn open<I, S>(
        writer: impl RawRowWriter + Send + 'static,
        header: I,
        encoder: E,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::open_labeled(Box::new(writer), header, encoder, "writer")
    }

    /// A sink over any `Write`, escaped according to `format`.
    ///
    /// # Errors
    /// Returns an error if the format is invalid or the header cannot be written.
    pub fn from_writer<W, I, S>(output: W, format: &CsvFormat, header: I, encoder: E) -> Result<Self>
    where
        W: Write + Send + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let writer = CsvRowWriter::new(output, format)?;
        Self::open(writer, header, encoder)
    }

    /// A sink writing the file at `path`, compressed according to the format's
    /// [`compression`](CsvFormat::compression).
    /// Creates parent directories if needed.
    ///
    /// # Errors
    /// Returns an error if the format is invalid, the file cannot be created or the header
    /// cannot be written.
    pub fn create<I, S>(path: impl AsRef<Path>, format: &CsvFormat, header: I, encoder: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.as_ref();
        format.delimiter_byte()?;
        format.quote_byte()?;
        let output = crate::io::create_output(path, format.compression)?;
        let writer = CsvRowWriter::with_finish(output, format, CompressedWriter::finish)?;
        Self::open_labeled(Box::new(writer), header, encoder, path.display().to_string())
    }

    fn open_labeled<I, S>(
        writer: BoxedWriter,
        header: I,
        encoder: E,
        label: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sink = Self {
            writer: Some(writer),
            encoder,
            label: label.into(),
            rows_written: 0,
            fields: Vec::new(),
            _a: PhantomData,
        };
        tracing::debug!("Opened CSV sink {}", sink.label);
        sink.fields = header.into_iter().map(Into::into).collect();
        if !sink.fields.is_empty() {
            sink.write_fields().context("write CSV header")?;
        }
        Ok(sink)
    }

    /// Encode `value` and write it as the next row.
    ///
    /// # Errors
    /// Returns an error if the sink is closed or the write fails. A failed write closes the sink.
    pub fn write(&mut self, value: &A) -> Result<()> {
        self.fields.clear();
        self.encoder.encode_into(value, &mut self.fields);
        let row = self.rows_written + 1;
        self.write_fields()
            .with_context(|| format!("write CSV row #{row}"))?;
        self.rows_written = row;
        Ok(())
    }

    /// Write every value in order, returning how many were written.
    ///
    /// # Errors
    /// Stops at and returns the first failed write.
    pub fn write_all<'a, I>(&mut self, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a A>,
        A: 'a,
    {
        let mut n = 0;
        for value in values {
            self.write(value)?;
            n += 1;
        }
        Ok(n)
    }

    /// Run `body` against this sink, then close it.
    ///
    /// The sink is closed on every exit path. If `body` fails, its error is returned and a
    /// close failure is only logged; otherwise a close failure is returned.
    ///
    /// # Errors
    /// Returns the body's error or the close error.
    pub fn scoped<T, F>(mut self, body: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        match body(&mut self) {
            Ok(value) => {
                self.close()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(close_err) = self.close() {
                    tracing::warn!("{close_err:#}");
                }
                Err(e)
            }
        }
    }

    /// Close the sink and return the number of rows written.
    ///
    /// # Errors
    /// Returns an error if flushing or releasing the writer fails.
    pub fn finish(mut self) -> Result<usize> {
        self.close()?;
        Ok(self.rows_written)
    }
}

impl<A, E> CsvSink<A, E> {
    /// Data rows written so far, not counting the header.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Flush buffered rows to the underlying output.
    ///
    /// # Errors
    /// Returns an error if the sink is closed or the flush fails. A failed flush closes the sink.
    pub fn flush(&mut self) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            anyhow::bail!("CSV sink {} is closed", self.label);
        };
        if let Err(e) = writer.flush() {
            return Err(self.fault(e));
        }
        Ok(())
    }

    /// Flush and release the output. Closing an already closed sink does nothing.
    ///
    /// # Errors
    /// Returns an error if flushing or releasing fails. The sink is closed either way.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        tracing::debug!(
            "Closing CSV sink {} after {} rows",
            self.label,
            self.rows_written
        );
        writer
            .close()
            .with_context(|| format!("close CSV sink {}", self.label))
    }

    fn write_fields(&mut self) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            anyhow::bail!("CSV sink {} is closed", self.label);
        };
        if let Err(e) = writer.write_raw_row(&self.fields) {
            return Err(self.fault(e));
        }
        Ok(())
    }

    /// Release the writer after an I/O fault, keeping the fault as the error to report.
    fn fault(&mut self, err: anyhow::Error) -> anyhow::Error {
        if let Err(close_err) = self.close() {
            tracing::warn!("{close_err:#}");
        }
        err.context(format!("write CSV sink {}", self.label))
    }
}

impl<A, E> Drop for CsvSink<A, E> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("{e:#}");
        }
    }
}
