//! Decoder and encoder adapters returned by [`CellDecoderExt`](super::CellDecoderExt) and
//! [`CellEncoderExt`](super::CellEncoderExt).

use super::{CellDecoder, CellEncoder};
use crate::error::DecodeError;
use crate::result::{DecodeResult, DecodeResultExt};
use std::marker::PhantomData;

/* ===================== map ===================== */

pub struct MapDecoder<D, F, A> {
    inner: D,
    f: F,
    _a: PhantomData<fn() -> A>,
}

impl<D, F, A> MapDecoder<D, F, A> {
    pub fn new(inner: D, f: F) -> Self {
        Self {
            inner,
            f,
            _a: PhantomData,
        }
    }
}

impl<A, B, D, F> CellDecoder<B> for MapDecoder<D, F, A>
where
    D: CellDecoder<A>,
    F: Fn(A) -> B + Send + Sync,
{
    fn decode(&self, cell: &str) -> DecodeResult<B> {
        self.inner.decode(cell).map(&self.f)
    }
}

/* ===================== try_map ===================== */

pub struct TryMapDecoder<D, F, A> {
    inner: D,
    f: F,
    _a: PhantomData<fn() -> A>,
}

impl<D, F, A> TryMapDecoder<D, F, A> {
    pub fn new(inner: D, f: F) -> Self {
        Self {
            inner,
            f,
            _a: PhantomData,
        }
    }
}

impl<A, B, D, F> CellDecoder<B> for TryMapDecoder<D, F, A>
where
    D: CellDecoder<A>,
    F: Fn(A) -> DecodeResult<B> + Send + Sync,
{
    fn decode(&self, cell: &str) -> DecodeResult<B> {
        self.inner.decode(cell).and_then(&self.f)
    }
}

/* ===================== and_then ===================== */

/// Context-sensitive decoding: the first decode selects the decoder that runs next on the
/// same cell text.
pub struct AndThenDecoder<D, F, A> {
    inner: D,
    f: F,
    _a: PhantomData<fn() -> A>,
}

impl<D, F, A> AndThenDecoder<D, F, A> {
    pub fn new(inner: D, f: F) -> Self {
        Self {
            inner,
            f,
            _a: PhantomData,
        }
    }
}

impl<A, B, D, D2, F> CellDecoder<B> for AndThenDecoder<D, F, A>
where
    D: CellDecoder<A>,
    D2: CellDecoder<B>,
    F: Fn(A) -> D2 + Send + Sync,
{
    fn decode(&self, cell: &str) -> DecodeResult<B> {
        let next = self.inner.decode(cell).map(&self.f)?;
        next.decode(cell)
    }
}

/* ===================== or ===================== */

/// Left-biased fallback: `second` only runs when `first` fails.
pub struct OrDecoder<D1, D2> {
    first: D1,
    second: D2,
}

impl<D1, D2> OrDecoder<D1, D2> {
    pub fn new(first: D1, second: D2) -> Self {
        Self { first, second }
    }
}

impl<A, D1, D2> CellDecoder<A> for OrDecoder<D1, D2>
where
    D1: CellDecoder<A>,
    D2: CellDecoder<A>,
{
    fn decode(&self, cell: &str) -> DecodeResult<A> {
        self.first
            .decode(cell)
            .or_try(|| self.second.decode(cell))
    }
}

/* ===================== ensure ===================== */

pub struct EnsureDecoder<D, P> {
    inner: D,
    message: String,
    predicate: P,
}

impl<D, P> EnsureDecoder<D, P> {
    pub fn new(inner: D, message: String, predicate: P) -> Self {
        Self {
            inner,
            message,
            predicate,
        }
    }
}

impl<A, D, P> CellDecoder<A> for EnsureDecoder<D, P>
where
    D: CellDecoder<A>,
    P: Fn(&A) -> bool + Send + Sync,
{
    fn decode(&self, cell: &str) -> DecodeResult<A> {
        let value = self.inner.decode(cell)?;
        if (self.predicate)(&value) {
            Ok(value)
        } else {
            Err(DecodeError::custom(format!("'{cell}': {}", self.message)))
        }
    }
}

/* ===================== contramap ===================== */

pub struct ContramapEncoder<E, F, A> {
    inner: E,
    f: F,
    _a: PhantomData<fn(A)>,
}

impl<E, F, A> ContramapEncoder<E, F, A> {
    pub fn new(inner: E, f: F) -> Self {
        Self {
            inner,
            f,
            _a: PhantomData,
        }
    }
}

impl<A, B, E, F> CellEncoder<B> for ContramapEncoder<E, F, A>
where
    E: CellEncoder<A>,
    F: Fn(&B) -> A + Send + Sync,
{
    fn encode(&self, value: &B) -> String {
        self.inner.encode(&(self.f)(value))
    }
}
