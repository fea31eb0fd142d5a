//! # ironcsv
//!
//! A **compositional CSV codec library** for Rust. Typed values are converted to and from CSV
//! rows by codecs assembled from small, reusable pieces, and streamed through sources and sinks
//! that never load a whole file into memory and always release their underlying stream.
//!
//! ## Key Features
//!
//! - **Cell codecs** - one text field to one typed value and back, with built-ins for numbers,
//!   `bool`, `char`, `String`, `Option`, `Either` and (feature `chrono`) dates and timestamps
//! - **Row codecs** - positional products of cell codecs (`row2` .. `row6`), fixed-width and
//!   variable-length columns, nesting, and a Serde bridge for `#[derive(Deserialize)]` structs
//! - **Failures as values** - every decode returns a [`DecodeResult`]; nothing panics on bad input
//! - **Streaming** - [`CsvSource`] is a lazy iterator of decoded rows, [`CsvSink`] a sequential
//!   row writer; both close their stream exactly once on every exit path
//! - **Transparent compression** - gzip, zstd, bzip2 and xz by file extension or magic bytes,
//!   or as forced by [`CsvFormat::compression`]
//!
//! ## Quick Start
//!
//! ```
//! use ironcsv::{cell, CsvFormat, CsvSink, CsvSource};
//! use ironcsv::row::row3;
//!
//! # fn main() -> anyhow::Result<()> {
//! #[derive(Debug, PartialEq)]
//! struct Reading { sensor: String, value: f64, flagged: bool }
//!
//! let codec = row3(cell::string(), cell::f64(), cell::bool()).imap(
//!     |(sensor, value, flagged)| Reading { sensor, value, flagged },
//!     |r: &Reading| (r.sensor.clone(), r.value, r.flagged),
//! );
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("readings.csv.gz");
//! let format = CsvFormat::new().has_header(true);
//!
//! let readings = vec![
//!     Reading { sensor: "t1".into(), value: 20.5, flagged: false },
//!     Reading { sensor: "t2".into(), value: -3.0, flagged: true },
//! ];
//! CsvSink::create(&path, &format, ["sensor", "value", "flagged"], codec.clone())?
//!     .scoped(|sink| sink.write_all(&readings))?;
//!
//! let back = CsvSource::from_path(&path, &format, codec)?.collect_fail_fast()?;
//! assert_eq!(back, readings);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### DecodeResult
//!
//! [`DecodeResult<A>`] is `Result<A, DecodeError>`. `map`, `and_then` and `?` compose decode
//! steps and stop at the first failure; [`DecodeResultExt::or_try`] tries an alternative.
//!
//! ### Cell codecs
//!
//! A [`CellCodec<A>`] pairs a [`CellDecoder`] (`&str` to `DecodeResult<A>`) with a total
//! [`CellEncoder`] (`&A` to `String`). Decoders compose with the combinators of
//! [`CellDecoderExt`]. See the [`cell`] module for the built-ins and their literal formats.
//!
//! ### Row codecs
//!
//! A [`RowCodec<A>`] consumes fields left to right. Decoding stops at the first failing column
//! and reports it as [`DecodeError::Column`]; encoding writes the same columns in the same order.
//! See the [`row`] module.
//!
//! ### Sources and sinks
//!
//! A [`CsvSource`] yields `anyhow::Result<DecodeResult<A>>` per row: the outer result is an I/O
//! fault, the inner one the decode outcome. A row that fails to decode does not stop the stream;
//! [`FailureMode`] and [`FailureCollector`] cover the usual ways of handling such rows.
//! A [`CsvSink`] writes an optional header and then one row per value.
//!
//! The text format of both is set by a [`CsvFormat`], which can be deserialized from an
//! application's configuration. Splitting rows into fields, quoting and escaping are done by
//! the `csv` crate behind the traits in [`raw`].
//!
//! ### Codec lookup
//!
//! Codecs are explicit values. Where a codec must be found by type at runtime, a
//! [`CodecRegistry`] maps types to registered codecs.
//!
//! ## Logging
//!
//! Sources and sinks emit `tracing` events: `debug` when they open and close, `trace` for each
//! row that fails to decode and `warn` when a close fails where the error cannot be returned.
//! The library never installs a subscriber.

pub mod cell;
pub mod error;
pub mod failures;
pub mod format;
pub mod io;
pub mod raw;
pub mod registry;
pub mod result;
pub mod row;
pub mod sink;
pub mod source;
pub mod testing;

pub use cell::{CellCodec, CellDecoder, CellDecoderExt, CellEncoder, CellEncoderExt, Either};
pub use error::DecodeError;
pub use failures::{FailureCollector, FailureMode, RowFailure};
pub use format::{CsvFormat, Terminator};
pub use io::compression::Compression;
pub use raw::{CsvRowReader, CsvRowWriter, RawRowReader, RawRowWriter};
pub use registry::{CodecRegistry, TypeTag};
pub use result::{DecodeResult, DecodeResultExt};
pub use row::{RowCodec, RowDecoder, RowEncoder, SerdeRowDecoder};
pub use sink::CsvSink;
pub use source::CsvSource;
