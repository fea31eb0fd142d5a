//! Testing utilities for code built on ironcsv.
//!
//! - **Assertions** for the codec laws: [`assert_round_trip`], [`assert_row_round_trip`],
//!   [`assert_decode_fails`], [`assert_row_decode_fails`], [`assert_decodes_none`].
//! - **Mock I/O**: [`MockRowReader`] and [`MockRowWriter`] stand in for real streams and
//!   report through a [`MockTracker`] how often they were closed, flushed and read.
//! - **Temporary files**: [`TempFilePath`], [`TempDirPath`] and [`mock_csv_file`].
//!
//! # Quick Start
//!
//! ```
//! use ironcsv::{cell, CsvSink};
//! use ironcsv::row::row2;
//! use ironcsv::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let codec = row2(cell::i32(), cell::string());
//! assert_row_round_trip(&codec, &[(1, "a".to_string()), (-2, String::new())]);
//!
//! let writer = MockRowWriter::new();
//! let tracker = writer.tracker();
//! CsvSink::open(writer, ["n", "s"], codec)?.scoped(|sink| sink.write(&(1, "a".to_string())))?;
//! assert_eq!(tracker.rows().len(), 2);
//! assert_eq!(tracker.close_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod mock_io;

pub use assertions::*;
pub use mock_io::*;
