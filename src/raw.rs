//! Raw row collaborators.
//!
//! Sources and sinks never look at CSV text themselves. They pull and push rows that are
//! already split into fields, through the two traits in this module. The default
//! implementations, [`CsvRowReader`] and [`CsvRowWriter`], delegate tokenizing, quoting and
//! escaping to the `csv` crate; tests and unusual inputs can plug in their own.

use crate::format::CsvFormat;
use anyhow::{Context, Result};
use csv::StringRecord;
use std::io::{self, Read, Write};

/// Produces one row of raw fields at a time.
pub trait RawRowReader {
    /// The next row, or `None` once the input is exhausted.
    fn next_raw_row(&mut self) -> Result<Option<Vec<String>>>;

    /// Release the underlying input. Called exactly once by [`crate::CsvSource`].
    fn close(&mut self) -> Result<()>;
}

/// Consumes one row of raw fields at a time.
pub trait RawRowWriter {
    /// Write one row, escaping fields as needed.
    fn write_raw_row(&mut self, fields: &[String]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Flush and release the underlying output. Called exactly once by [`crate::CsvSink`].
    fn close(&mut self) -> Result<()>;
}

impl<T: RawRowReader + ?Sized> RawRowReader for Box<T> {
    fn next_raw_row(&mut self) -> Result<Option<Vec<String>>> {
        (**self).next_raw_row()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<T: RawRowWriter + ?Sized> RawRowWriter for Box<T> {
    fn write_raw_row(&mut self, fields: &[String]) -> Result<()> {
        (**self).write_raw_row(fields)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// [`RawRowReader`] over any `Read`, tokenized by the `csv` crate.
///
/// Rows may have differing field counts. Blank lines are skipped by the tokenizer.
pub struct CsvRowReader<R> {
    inner: Option<csv::Reader<R>>,
    record: StringRecord,
}

impl<R: Read> CsvRowReader<R> {
    /// # Errors
    /// Returns an error if the format's delimiter or quote is not ASCII.
    pub fn new(input: R, format: &CsvFormat) -> Result<Self> {
        let inner = format.reader_builder()?.from_reader(input);
        Ok(Self {
            inner: Some(inner),
            record: StringRecord::new(),
        })
    }

    /// Whether [`close`](RawRowReader::close) has released the input.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl<R: Read> RawRowReader for CsvRowReader<R> {
    fn next_raw_row(&mut self) -> Result<Option<Vec<String>>> {
        let Some(reader) = self.inner.as_mut() else {
            anyhow::bail!("read from a closed CSV reader");
        };
        let more = reader.read_record(&mut self.record).with_context(|| {
            match self.record.position() {
                Some(pos) => format!("read CSV record at line {}", pos.line()),
                None => "read CSV record".to_string(),
            }
        })?;
        if !more {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the csv reader drops the wrapped input.
        self.inner.take();
        Ok(())
    }
}

/// [`RawRowWriter`] over any `Write`, escaped by the `csv` crate.
///
/// Dropping an open writer closes it, logging a failure instead of returning it.
pub struct CsvRowWriter<W: Write> {
    inner: Option<csv::Writer<W>>,
    finish: fn(W) -> io::Result<()>,
}

fn flush_output<W: Write>(mut output: W) -> io::Result<()> {
    output.flush()
}

impl<W: Write> CsvRowWriter<W> {
    /// # Errors
    /// Returns an error if the format's delimiter or quote is not ASCII.
    pub fn new(output: W, format: &CsvFormat) -> Result<Self> {
        Self::with_finish(output, format, flush_output::<W>)
    }

    /// Like [`new`](Self::new), but hands the output to `finish` on close instead of only
    /// flushing it. Compressed outputs use this to write their trailer.
    ///
    /// # Errors
    /// Returns an error if the format's delimiter or quote is not ASCII.
    pub fn with_finish(
        output: W,
        format: &CsvFormat,
        finish: fn(W) -> io::Result<()>,
    ) -> Result<Self> {
        let inner = format.writer_builder()?.from_writer(output);
        Ok(Self {
            inner: Some(inner),
            finish,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    fn writer(&mut self) -> Result<&mut csv::Writer<W>> {
        self.inner
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("write to a closed CSV writer"))
    }
}

impl<W: Write> RawRowWriter for CsvRowWriter<W> {
    fn write_raw_row(&mut self, fields: &[String]) -> Result<()> {
        self.writer()?.write_record(fields)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer()?.flush().context("flush CSV writer")
    }

    fn close(&mut self) -> Result<()> {
        let Some(writer) = self.inner.take() else {
            return Ok(());
        };
        let output = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flush CSV writer on close: {}", e.error()))?;
        (self.finish)(output).context("finish CSV output on close")
    }
}

impl<W: Write> Drop for CsvRowWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("{e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reader_splits_quoted_fields() -> Result<()> {
        let text = "a,\"b,c\",d\n1,\"say \"\"hi\"\"\"\n";
        let mut r = CsvRowReader::new(text.as_bytes(), &CsvFormat::default())?;
        assert_eq!(r.next_raw_row()?, Some(row(&["a", "b,c", "d"])));
        assert_eq!(r.next_raw_row()?, Some(row(&["1", "say \"hi\""])));
        assert_eq!(r.next_raw_row()?, None);
        r.close()?;
        assert!(r.is_closed());
        assert!(r.next_raw_row().is_err());
        Ok(())
    }

    #[test]
    fn writer_escapes_and_uses_delimiter() -> Result<()> {
        let mut buf = Vec::new();
        {
            let mut w = CsvRowWriter::new(&mut buf, &CsvFormat::new().delimiter(';'))?;
            w.write_raw_row(&row(&["a;b", "c"]))?;
            w.write_raw_row(&row(&["1", ""]))?;
            w.write_raw_row(&row(&[""]))?;
            w.close()?;
            assert!(w.write_raw_row(&row(&["late"])).is_err());
        }
        assert_eq!(String::from_utf8(buf)?, "\"a;b\";c\n1;\n\"\"\n");
        Ok(())
    }

    #[test]
    fn close_runs_finish_once() -> Result<()> {
        fn mark(output: &mut Vec<u8>) -> io::Result<()> {
            output.write_all(b"#end\n")
        }

        let mut buf = Vec::new();
        {
            let mut w = CsvRowWriter::with_finish(&mut buf, &CsvFormat::default(), mark)?;
            w.write_raw_row(&row(&["1"]))?;
            w.close()?;
            w.close()?;
        }
        assert_eq!(String::from_utf8(buf)?, "1\n#end\n");
        Ok(())
    }

    #[test]
    fn drop_closes_an_open_writer() -> Result<()> {
        fn mark(output: &mut Vec<u8>) -> io::Result<()> {
            output.write_all(b"#end\n")
        }

        let mut buf = Vec::new();
        {
            let mut w = CsvRowWriter::with_finish(&mut buf, &CsvFormat::default(), mark)?;
            w.write_raw_row(&row(&["2"]))?;
        }
        assert_eq!(String::from_utf8(buf)?, "2\n#end\n");
        Ok(())
    }
}
