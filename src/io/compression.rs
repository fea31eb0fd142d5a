//! Compression for file-backed sources and sinks.
//!
//! [`CsvSource::from_path`](crate::CsvSource::from_path) and
//! [`CsvSink::create`](crate::CsvSink::create) pass their files through [`reader`] and
//! [`CompressedWriter`], using the [`Compression`] set on the
//! [`CsvFormat`](crate::CsvFormat). The default, [`Compression::Auto`], reads and writes
//! `data.csv.gz` as gzip without any extra configuration.
//!
//! Codecs, each behind its own feature:
//! - gzip (`.gz`, `.gzip`), feature `compression-gzip`
//! - zstd (`.zst`, `.zstd`), feature `compression-zstd`
//! - bzip2 (`.bz2`, `.bzip2`), feature `compression-bzip2`
//! - xz (`.xz`), feature `compression-xz`
//!
//! Under `Auto`, readers are matched by file extension first and by magic bytes second, and
//! writers by extension only. Naming a codec forces it regardless of the file name, and
//! [`Compression::None`] reads and writes plain text:
//!
//! ```
//! use ironcsv::io::compression::Compression;
//! use ironcsv::CsvFormat;
//!
//! let fmt: CsvFormat = serde_json::from_str(r#"{ "compression": "none" }"#).unwrap();
//! assert_eq!(fmt.compression, Compression::None);
//! assert_eq!(Compression::from_path("events.CSV.GZ"), Some(Compression::Gzip));
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Compression applied to a CSV file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Detect from the file name and, when reading, from the first bytes.
    #[default]
    Auto,
    /// Plain text whatever the file is called.
    None,
    Gzip,
    Zstd,
    Bzip2,
    Xz,
}

const CODECS: [Compression; 4] = [
    Compression::Gzip,
    Compression::Zstd,
    Compression::Bzip2,
    Compression::Xz,
];

impl Compression {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
        }
    }

    /// Lowercase file extensions, leading dot included.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Auto | Self::None => &[],
            Self::Gzip => &[".gz", ".gzip"],
            Self::Zstd => &[".zst", ".zstd"],
            Self::Bzip2 => &[".bz2", ".bzip2"],
            Self::Xz => &[".xz"],
        }
    }

    fn magic_bytes(self) -> &'static [u8] {
        match self {
            Self::Auto | Self::None => &[],
            Self::Gzip => &[0x1f, 0x8b],
            Self::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
            Self::Bzip2 => b"BZh",
            Self::Xz => &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00],
        }
    }

    fn feature(self) -> &'static str {
        match self {
            Self::Auto | Self::None => "",
            Self::Gzip => "compression-gzip",
            Self::Zstd => "compression-zstd",
            Self::Bzip2 => "compression-bzip2",
            Self::Xz => "compression-xz",
        }
    }

    /// Whether support for this codec was compiled in.
    pub fn is_available(self) -> bool {
        match self {
            Self::Auto | Self::None => true,
            Self::Gzip => cfg!(feature = "compression-gzip"),
            Self::Zstd => cfg!(feature = "compression-zstd"),
            Self::Bzip2 => cfg!(feature = "compression-bzip2"),
            Self::Xz => cfg!(feature = "compression-xz"),
        }
    }

    /// The available codec whose extension ends `path`, compared case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().to_string_lossy().to_lowercase();
        CODECS
            .into_iter()
            .filter(|c| c.is_available())
            .find(|c| c.extensions().iter().any(|ext| name.ends_with(ext)))
    }

    /// The available codec whose magic bytes start `head`.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        CODECS
            .into_iter()
            .filter(|c| c.is_available())
            .find(|c| head.starts_with(c.magic_bytes()))
    }

    fn not_compiled_in(self) -> anyhow::Error {
        anyhow::anyhow!(
            "{self} support is not compiled in (enable feature `{}`)",
            self.feature()
        )
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wrap `input` in the decompressor `compression` selects.
///
/// `path_hint` is only consulted under [`Compression::Auto`]; when its extension names no codec,
/// the first bytes of `input` are checked for a known signature and plain text is assumed
/// otherwise.
///
/// # Errors
/// Returns an error if the first bytes cannot be read, the selected codec was not compiled in,
/// or its decoder cannot be set up.
pub fn reader<R: Read + Send + 'static>(
    input: R,
    compression: Compression,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read + Send>> {
    let mut input = BufReader::new(input);
    let codec = match compression {
        Compression::Auto => match Compression::from_path(&path_hint) {
            Some(codec) => codec,
            None => {
                let head = input.fill_buf().context("read leading bytes")?;
                Compression::sniff(head).unwrap_or(Compression::None)
            }
        },
        forced => forced,
    };
    tracing::trace!("Reading {} as {codec}", path_hint.as_ref().display());
    decompress(input, codec).with_context(|| format!("set up {codec} decoder"))
}

fn decompress<R: BufRead + Send + 'static>(
    input: R,
    codec: Compression,
) -> Result<Box<dyn Read + Send>> {
    Ok(match codec {
        Compression::Auto | Compression::None => Box::new(input),
        #[cfg(feature = "compression-gzip")]
        Compression::Gzip => Box::new(flate2::bufread::GzDecoder::new(input)),
        #[cfg(feature = "compression-zstd")]
        Compression::Zstd => Box::new(zstd::stream::read::Decoder::with_buffer(input)?),
        #[cfg(feature = "compression-bzip2")]
        Compression::Bzip2 => Box::new(bzip2::bufread::BzDecoder::new(input)),
        #[cfg(feature = "compression-xz")]
        Compression::Xz => Box::new(xz2::bufread::XzDecoder::new(input)),
        #[allow(unreachable_patterns)]
        missing => return Err(missing.not_compiled_in()),
    })
}

/// A buffered output, compressed by the codec chosen when it was created.
///
/// Compressed formats end with a trailer, so the output is only complete once
/// [`finish`](Self::finish) has returned. Dropping an unfinished writer may leave a truncated
/// file.
pub enum CompressedWriter<W: Write> {
    Plain(BufWriter<W>),
    #[cfg(feature = "compression-gzip")]
    Gzip(flate2::write::GzEncoder<BufWriter<W>>),
    #[cfg(feature = "compression-zstd")]
    Zstd(zstd::stream::write::Encoder<'static, BufWriter<W>>),
    #[cfg(feature = "compression-bzip2")]
    Bzip2(bzip2::write::BzEncoder<BufWriter<W>>),
    #[cfg(feature = "compression-xz")]
    Xz(xz2::write::XzEncoder<BufWriter<W>>),
}

impl<W: Write> CompressedWriter<W> {
    /// Wrap `output` in the compressor `compression` selects.
    ///
    /// Under [`Compression::Auto`] the codec is taken from the extension of `path_hint`, and
    /// plain text is written when it names none.
    ///
    /// # Errors
    /// Returns an error if the selected codec was not compiled in or its encoder cannot be set up.
    pub fn new(output: W, compression: Compression, path_hint: impl AsRef<Path>) -> Result<Self> {
        let codec = match compression {
            Compression::Auto => Compression::from_path(path_hint).unwrap_or(Compression::None),
            forced => forced,
        };
        let output = BufWriter::new(output);
        Ok(match codec {
            Compression::Auto | Compression::None => Self::Plain(output),
            #[cfg(feature = "compression-gzip")]
            Compression::Gzip => Self::Gzip(flate2::write::GzEncoder::new(
                output,
                flate2::Compression::default(),
            )),
            #[cfg(feature = "compression-zstd")]
            Compression::Zstd => Self::Zstd(
                zstd::stream::write::Encoder::new(output, zstd::DEFAULT_COMPRESSION_LEVEL)
                    .context("set up zstd encoder")?,
            ),
            #[cfg(feature = "compression-bzip2")]
            Compression::Bzip2 => Self::Bzip2(bzip2::write::BzEncoder::new(
                output,
                bzip2::Compression::default(),
            )),
            #[cfg(feature = "compression-xz")]
            Compression::Xz => Self::Xz(xz2::write::XzEncoder::new(output, 6)),
            #[allow(unreachable_patterns)]
            missing => return Err(missing.not_compiled_in()),
        })
    }

    /// The codec in use, [`Compression::None`] for plain text.
    pub fn compression(&self) -> Compression {
        match self {
            Self::Plain(_) => Compression::None,
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(_) => Compression::Gzip,
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(_) => Compression::Zstd,
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(_) => Compression::Bzip2,
            #[cfg(feature = "compression-xz")]
            Self::Xz(_) => Compression::Xz,
        }
    }

    /// Write the codec's trailer and flush everything to the underlying output.
    ///
    /// # Errors
    /// Returns the first error of finishing the stream or flushing the output.
    pub fn finish(self) -> io::Result<()> {
        let mut output = match self {
            Self::Plain(w) => w,
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(e) => e.finish()?,
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(e) => e.finish()?,
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(e) => e.finish()?,
            #[cfg(feature = "compression-xz")]
            Self::Xz(e) => e.finish()?,
        };
        output.flush()
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(e) => e.write(buf),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(e) => e.write(buf),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(e) => e.write(buf),
            #[cfg(feature = "compression-xz")]
            Self::Xz(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(e) => e.flush(),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(e) => e.flush(),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(e) => e.flush(),
            #[cfg(feature = "compression-xz")]
            Self::Xz(e) => e.flush(),
        }
    }
}
