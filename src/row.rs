//! Row codecs: one ordered sequence of fields to one typed value and back.
//!
//! A row codec is assembled from cell codecs laid out left to right. Every component knows how
//! many fields it consumes, so decoding walks the row with a running offset and encoding
//! appends each component's fields in the same order. The two directions therefore agree on
//! positions by construction.
//!
//! ```
//! use ironcsv::cell;
//! use ironcsv::row::{row3, RowCodec, RowDecoder, RowEncoder};
//!
//! #[derive(Debug, PartialEq)]
//! struct Trade { id: u64, symbol: String, qty: Option<i32> }
//!
//! let codec: RowCodec<Trade> = row3(cell::u64(), cell::string(), cell::option(cell::i32()))
//!     .imap(
//!         |(id, symbol, qty)| Trade { id, symbol, qty },
//!         |t: &Trade| (t.id, t.symbol.clone(), t.qty),
//!     );
//!
//! let fields: Vec<String> = vec!["7".into(), "ACME".into(), "".into()];
//! let trade = codec.decode_row(&fields).unwrap();
//! assert_eq!(trade, Trade { id: 7, symbol: "ACME".into(), qty: None });
//! assert_eq!(codec.encode_row(&trade), fields);
//! ```
//!
//! Decoding is first-failure-wins: the first component that fails aborts the row and the
//! failure is reported against its column. Fields past the last component are ignored unless
//! the codec is made [`strict`](RowCodec::strict).

pub mod product;
pub mod seq;
pub mod serde_rows;

use crate::cell::{CellCodec, CellDecoder, CellEncoder};
use crate::error::DecodeError;
use crate::result::{DecodeResult, DecodeResultExt};
use std::fmt;
use std::sync::Arc;

pub use product::{row2, row3, row4, row5, row6};
pub use seq::{ArrayCodec, ListCodec, SkipCodec};
pub use serde_rows::SerdeRowDecoder;

/// Decodes a typed value from a row of fields.
pub trait RowDecoder<A>: Send + Sync {
    /// Decode starting at field `offset`.
    ///
    /// Returns the value together with the offset just past the fields it consumed.
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(A, usize)>;

    /// Decode a whole row.
    fn decode_row(&self, fields: &[String]) -> DecodeResult<A> {
        self.decode_from(fields, 0).map(|(a, _)| a)
    }
}

/// Encodes a typed value into a row of fields. Encoding is total.
pub trait RowEncoder<A>: Send + Sync {
    /// Append this value's fields to `out`.
    fn encode_into(&self, value: &A, out: &mut Vec<String>);

    fn encode_row(&self, value: &A) -> Vec<String> {
        let mut out = Vec::new();
        self.encode_into(value, &mut out);
        out
    }
}

impl<A, D: RowDecoder<A> + ?Sized> RowDecoder<A> for Arc<D> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(A, usize)> {
        (**self).decode_from(fields, offset)
    }
}

impl<A, E: RowEncoder<A> + ?Sized> RowEncoder<A> for Arc<E> {
    fn encode_into(&self, value: &A, out: &mut Vec<String>) {
        (**self).encode_into(value, out)
    }
}

// A cell codec is a one-column row codec.
impl<A> RowDecoder<A> for CellCodec<A> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(A, usize)> {
        self.decode_at(fields, offset)
            .with_column(offset)
            .map(|a| (a, offset + 1))
    }
}

impl<A> RowEncoder<A> for CellCodec<A> {
    fn encode_into(&self, value: &A, out: &mut Vec<String>) {
        out.push(CellEncoder::encode(self, value));
    }
}

/// A shareable decoder/encoder pair for one row type.
pub struct RowCodec<A> {
    decoder: Arc<dyn RowDecoder<A>>,
    encoder: Arc<dyn RowEncoder<A>>,
}

impl<A> Clone for RowCodec<A> {
    fn clone(&self) -> Self {
        Self {
            decoder: Arc::clone(&self.decoder),
            encoder: Arc::clone(&self.encoder),
        }
    }
}

impl<A: 'static> From<CellCodec<A>> for RowCodec<A> {
    fn from(cell: CellCodec<A>) -> Self {
        RowCodec::new(cell.clone(), cell)
    }
}

impl<A: 'static> RowCodec<A> {
    pub fn new<D, E>(decoder: D, encoder: E) -> Self
    where
        D: RowDecoder<A> + 'static,
        E: RowEncoder<A> + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            encoder: Arc::new(encoder),
        }
    }

    /// A single column.
    pub fn cell(cell: CellCodec<A>) -> Self {
        cell.into()
    }

    /// Map the decoded value to `B`, and project `B` back to `A` for encoding.
    pub fn imap<B, F, G>(self, to: F, from: G) -> RowCodec<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
        G: Fn(&B) -> A + Send + Sync + 'static,
    {
        self.try_imap(move |a| Ok(to(a)), from)
    }

    /// Like [`imap`](Self::imap) but the decode direction may reject the value.
    ///
    /// Rejections are not attributed to a column since they concern the whole row.
    pub fn try_imap<B, F, G>(self, to: F, from: G) -> RowCodec<B>
    where
        B: 'static,
        F: Fn(A) -> DecodeResult<B> + Send + Sync + 'static,
        G: Fn(&B) -> A + Send + Sync + 'static,
    {
        RowCodec::new(
            MappedRow {
                inner: self.clone(),
                f: to,
            },
            ContramappedRow {
                inner: self,
                f: from,
            },
        )
    }

    /// Reject rows whose field count differs from what this codec consumes.
    pub fn strict(self) -> Self {
        let encoder = Arc::clone(&self.encoder);
        Self {
            decoder: Arc::new(StrictRow { inner: self }),
            encoder,
        }
    }

    /// The decoding half.
    pub fn decoder(&self) -> Arc<dyn RowDecoder<A>> {
        Arc::clone(&self.decoder)
    }

    /// The encoding half.
    pub fn encoder(&self) -> Arc<dyn RowEncoder<A>> {
        Arc::clone(&self.encoder)
    }
}

impl<A> fmt::Debug for RowCodec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowCodec<{}>", std::any::type_name::<A>())
    }
}

impl<A> RowDecoder<A> for RowCodec<A> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(A, usize)> {
        self.decoder.decode_from(fields, offset)
    }
}

impl<A> RowEncoder<A> for RowCodec<A> {
    fn encode_into(&self, value: &A, out: &mut Vec<String>) {
        self.encoder.encode_into(value, out)
    }
}

struct MappedRow<A, F> {
    inner: RowCodec<A>,
    f: F,
}

impl<A, B, F> RowDecoder<B> for MappedRow<A, F>
where
    F: Fn(A) -> DecodeResult<B> + Send + Sync,
{
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(B, usize)> {
        let (a, next) = self.inner.decode_from(fields, offset)?;
        (self.f)(a).map(|b| (b, next))
    }
}

struct ContramappedRow<A, G> {
    inner: RowCodec<A>,
    f: G,
}

impl<A, B, G> RowEncoder<B> for ContramappedRow<A, G>
where
    G: Fn(&B) -> A + Send + Sync,
{
    fn encode_into(&self, value: &B, out: &mut Vec<String>) {
        self.inner.encode_into(&(self.f)(value), out)
    }
}

struct StrictRow<A> {
    inner: RowCodec<A>,
}

impl<A> RowDecoder<A> for StrictRow<A> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(A, usize)> {
        let (a, next) = self.inner.decode_from(fields, offset)?;
        if next != fields.len() {
            return Err(DecodeError::Arity {
                expected: next,
                found: fields.len(),
            });
        }
        Ok((a, next))
    }
}
