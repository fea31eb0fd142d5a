//! Cell codecs: one text field to one typed value and back.
//!
//! The two halves are separate object-safe traits, [`CellDecoder`] and [`CellEncoder`], so a
//! read-only pipeline never has to provide an encoder (and vice versa). [`CellCodec`] bundles
//! both behind `Arc`s; it is cheap to clone and can be shared across threads by any number of
//! sources and sinks.
//!
//! Codecs are plain values. Nothing is resolved implicitly: build one from the constructors in
//! this module (or look one up in a [`crate::registry::CodecRegistry`]) and pass it to the row
//! layer.
//!
//! ## Built-in codecs
//!
//! | constructor        | type              | literal format                               |
//! |--------------------|-------------------|----------------------------------------------|
//! | [`i32()`] etc.     | integers          | `FromStr`, optional sign, overflow fails     |
//! | [`f64()`], [`f32()`] | floats          | `.` decimal point, no locale                 |
//! | [`bool()`]         | `bool`            | `true` / `false`, ASCII case-insensitive     |
//! | [`char()`]         | `char`            | exactly one character                        |
//! | [`string()`]       | `String`          | identity, never fails                        |
//! | [`unit()`]         | `()`              | empty cell                                   |
//! | [`option()`]       | `Option<A>`       | empty cell is `None`                         |
//! | [`either()`]       | `Either<A, B>`    | `A` first, then `B`                          |
//!
//! No whitespace is trimmed by any built-in decoder. With the `chrono` feature the
//! [`temporal`] module adds date and timestamp codecs.

pub mod builtin;
pub mod combinators;
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
#[cfg(feature = "chrono")]
pub mod temporal;

use crate::error::DecodeError;
use crate::result::DecodeResult;
use std::fmt;
use std::sync::Arc;

pub use builtin::*;
pub use combinators::{
    AndThenDecoder, ContramapEncoder, EnsureDecoder, MapDecoder, OrDecoder, TryMapDecoder,
};

/// Decodes one cell.
pub trait CellDecoder<A>: Send + Sync {
    /// Decode a single cell's text. Must not panic on any input.
    fn decode(&self, cell: &str) -> DecodeResult<A>;

    /// Decode the cell at `index` of `fields`.
    ///
    /// An index past the end of the row is a [`DecodeError::IndexOutOfBounds`] failure.
    fn decode_at(&self, fields: &[String], index: usize) -> DecodeResult<A> {
        match fields.get(index) {
            Some(cell) => self.decode(cell),
            None => Err(DecodeError::IndexOutOfBounds {
                index,
                len: fields.len(),
            }),
        }
    }
}

/// Encodes one value into cell text. Encoding is total.
pub trait CellEncoder<A>: Send + Sync {
    fn encode(&self, value: &A) -> String;
}

impl<A, D: CellDecoder<A> + ?Sized> CellDecoder<A> for Arc<D> {
    fn decode(&self, cell: &str) -> DecodeResult<A> {
        (**self).decode(cell)
    }
}

impl<A, E: CellEncoder<A> + ?Sized> CellEncoder<A> for Arc<E> {
    fn encode(&self, value: &A) -> String {
        (**self).encode(value)
    }
}

/// Decoder built from a plain function.
pub struct FnDecoder<F>(pub F);

impl<A, F> CellDecoder<A> for FnDecoder<F>
where
    F: Fn(&str) -> DecodeResult<A> + Send + Sync,
{
    fn decode(&self, cell: &str) -> DecodeResult<A> {
        (self.0)(cell)
    }
}

/// Encoder built from a plain function.
pub struct FnEncoder<F>(pub F);

impl<A, F> CellEncoder<A> for FnEncoder<F>
where
    F: Fn(&A) -> String + Send + Sync,
{
    fn encode(&self, value: &A) -> String {
        (self.0)(value)
    }
}

/// Combinators available on every [`CellDecoder`].
pub trait CellDecoderExt<A>: CellDecoder<A> + Sized {
    /// Post-process a successful decode.
    fn map<B, F>(self, f: F) -> MapDecoder<Self, F, A>
    where
        F: Fn(A) -> B + Send + Sync,
    {
        MapDecoder::new(self, f)
    }

    /// Post-process a successful decode with a step that may fail.
    fn try_map<B, F>(self, f: F) -> TryMapDecoder<Self, F, A>
    where
        F: Fn(A) -> DecodeResult<B> + Send + Sync,
    {
        TryMapDecoder::new(self, f)
    }

    /// Pick the decoder for the same cell based on the value decoded by `self`.
    fn and_then<B, D2, F>(self, f: F) -> AndThenDecoder<Self, F, A>
    where
        D2: CellDecoder<B>,
        F: Fn(A) -> D2 + Send + Sync,
    {
        AndThenDecoder::new(self, f)
    }

    /// Try `self`, then `other` on the same cell.
    fn or<D2>(self, other: D2) -> OrDecoder<Self, D2>
    where
        D2: CellDecoder<A>,
    {
        OrDecoder::new(self, other)
    }

    /// Reject decoded values that fail `predicate`.
    fn ensure<P>(self, message: impl Into<String>, predicate: P) -> EnsureDecoder<Self, P>
    where
        P: Fn(&A) -> bool + Send + Sync,
    {
        EnsureDecoder::new(self, message.into(), predicate)
    }
}

impl<A, D: CellDecoder<A>> CellDecoderExt<A> for D {}

/// Combinators available on every [`CellEncoder`].
pub trait CellEncoderExt<A>: CellEncoder<A> + Sized {
    /// Encode a `B` by first projecting it to an `A`.
    fn contramap<B, F>(self, f: F) -> ContramapEncoder<Self, F, A>
    where
        F: Fn(&B) -> A + Send + Sync,
    {
        ContramapEncoder::new(self, f)
    }
}

impl<A, E: CellEncoder<A>> CellEncoderExt<A> for E {}

/// A shareable decoder/encoder pair for one cell type.
pub struct CellCodec<A> {
    decoder: Arc<dyn CellDecoder<A>>,
    encoder: Arc<dyn CellEncoder<A>>,
}

impl<A> Clone for CellCodec<A> {
    fn clone(&self) -> Self {
        Self {
            decoder: Arc::clone(&self.decoder),
            encoder: Arc::clone(&self.encoder),
        }
    }
}

impl<A: 'static> CellCodec<A> {
    /// Pair up a decoder and an encoder.
    pub fn new<D, E>(decoder: D, encoder: E) -> Self
    where
        D: CellDecoder<A> + 'static,
        E: CellEncoder<A> + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            encoder: Arc::new(encoder),
        }
    }

    /// Build a codec from two closures.
    pub fn from_fns<D, E>(decode: D, encode: E) -> Self
    where
        D: Fn(&str) -> DecodeResult<A> + Send + Sync + 'static,
        E: Fn(&A) -> String + Send + Sync + 'static,
    {
        Self::new(FnDecoder(decode), FnEncoder(encode))
    }

    /// Derive a codec for `B` from an isomorphism-like pair of functions.
    ///
    /// `to` runs after a successful decode, `from` before encoding.
    pub fn imap<B, F, G>(self, to: F, from: G) -> CellCodec<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
        G: Fn(&B) -> A + Send + Sync + 'static,
    {
        CellCodec::new(
            MapDecoder::new(self.decoder, to),
            ContramapEncoder::new(self.encoder, from),
        )
    }

    /// Like [`imap`](Self::imap) but the decode direction may fail.
    pub fn try_imap<B, F, G>(self, to: F, from: G) -> CellCodec<B>
    where
        B: 'static,
        F: Fn(A) -> DecodeResult<B> + Send + Sync + 'static,
        G: Fn(&B) -> A + Send + Sync + 'static,
    {
        CellCodec::new(
            TryMapDecoder::new(self.decoder, to),
            ContramapEncoder::new(self.encoder, from),
        )
    }

    /// The decoding half.
    pub fn decoder(&self) -> Arc<dyn CellDecoder<A>> {
        Arc::clone(&self.decoder)
    }

    /// The encoding half.
    pub fn encoder(&self) -> Arc<dyn CellEncoder<A>> {
        Arc::clone(&self.encoder)
    }
}

impl<A> fmt::Debug for CellCodec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellCodec<{}>", std::any::type_name::<A>())
    }
}

impl<A> CellDecoder<A> for CellCodec<A> {
    fn decode(&self, cell: &str) -> DecodeResult<A> {
        self.decoder.decode(cell)
    }
}

impl<A> CellEncoder<A> for CellCodec<A> {
    fn encode(&self, value: &A) -> String {
        self.encoder.encode(value)
    }
}
