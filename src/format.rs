//! Text format configuration shared by sources and sinks.

use crate::io::compression::Compression;
use serde::{Deserialize, Serialize};

/// Delimiter, quoting, header and compression settings for one CSV stream.
///
/// `CsvFormat` derives `Deserialize`, so it can be embedded directly in an application's own
/// configuration file. Every field has a default:
///
/// ```
/// use ironcsv::CsvFormat;
///
/// let fmt: CsvFormat = serde_json::from_str(r#"{ "delimiter": ";", "has_header": true }"#).unwrap();
/// assert_eq!(fmt.delimiter, ';');
/// assert_eq!(fmt.quote, '"');
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    /// Field separator. Must be a single-byte (ASCII) character.
    pub delimiter: char,
    /// Quote character. Must be a single-byte (ASCII) character.
    pub quote: char,
    /// Whether the first row of a source is a header and must be skipped.
    pub has_header: bool,
    /// Line terminator used when writing.
    pub terminator: Terminator,
    /// Compression of files opened by path. Ignored by sources and sinks over a caller's
    /// own reader or writer.
    pub compression: Compression,
}

/// Row terminator written by sinks. Readers accept both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminator {
    #[default]
    Lf,
    Crlf,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            has_header: false,
            terminator: Terminator::Lf,
            compression: Compression::Auto,
        }
    }
}

impl CsvFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab-separated values.
    pub fn tsv() -> Self {
        Self::default().delimiter('\t')
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn has_header(mut self, yes: bool) -> Self {
        self.has_header = yes;
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// The delimiter as the single byte the tokenizer works with.
    ///
    /// # Errors
    /// Returns an error if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        ascii_byte(self.delimiter, "delimiter")
    }

    /// The quote character as a single byte.
    ///
    /// # Errors
    /// Returns an error if the quote character is not ASCII.
    pub fn quote_byte(&self) -> anyhow::Result<u8> {
        ascii_byte(self.quote, "quote")
    }

    pub(crate) fn reader_builder(&self) -> anyhow::Result<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter_byte()?)
            .quote(self.quote_byte()?)
            .has_headers(false)
            .flexible(true);
        Ok(builder)
    }

    pub(crate) fn writer_builder(&self) -> anyhow::Result<csv::WriterBuilder> {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter_byte()?)
            .quote(self.quote_byte()?)
            .has_headers(false)
            .flexible(true)
            .terminator(match self.terminator {
                Terminator::Lf => csv::Terminator::Any(b'\n'),
                Terminator::Crlf => csv::Terminator::CRLF,
            });
        Ok(builder)
    }
}

fn ascii_byte(c: char, what: &str) -> anyhow::Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        anyhow::bail!("CSV {what} must be an ASCII character, got {c:?}")
    }
}
