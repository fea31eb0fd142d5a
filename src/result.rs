//! The outcome of a decode.
//!
//! A [`DecodeResult`] is a plain [`Result`] whose failure side is a [`DecodeError`]. The usual
//! `Result` combinators give the composition the codecs rely on:
//!
//! - `map` transforms a success and leaves a failure untouched,
//! - `and_then` chains a decode step that may itself fail (its failure is passed through as-is),
//! - `or_else(|_| other)` falls back to a second attempt,
//! - `?` short-circuits on the first failure.
//!
//! [`DecodeResultExt`] adds the two operations the row and cell layers need on top of that.

use crate::error::DecodeError;

/// Success value or decode failure.
pub type DecodeResult<A> = Result<A, DecodeError>;

/// Extra combinators for [`DecodeResult`].
pub trait DecodeResultExt<A> {
    /// Keep `self` on success; otherwise evaluate `other`.
    ///
    /// When both fail the result is [`DecodeError::Both`] carrying the two failures, so the
    /// caller can see why neither alternative applied.
    fn or_try<F>(self, other: F) -> DecodeResult<A>
    where
        F: FnOnce() -> DecodeResult<A>;

    /// Attribute a failure to column `index` of a row.
    fn with_column(self, index: usize) -> DecodeResult<A>;
}

impl<A> DecodeResultExt<A> for DecodeResult<A> {
    fn or_try<F>(self, other: F) -> DecodeResult<A>
    where
        F: FnOnce() -> DecodeResult<A>,
    {
        match self {
            Ok(a) => Ok(a),
            Err(left) => other().map_err(|right| DecodeError::Both {
                left: Box::new(left),
                right: Box::new(right),
            }),
        }
    }

    fn with_column(self, index: usize) -> DecodeResult<A> {
        self.map_err(|e| e.at_column(index))
    }
}
