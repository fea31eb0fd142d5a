//! Built-in cell codecs.

use super::{CellCodec, CellDecoder, CellEncoder};
use crate::error::DecodeError;
use crate::result::{DecodeResult, DecodeResultExt};
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

/* ===================== FromStr / Display ===================== */

/// Codec for any type with a `FromStr` parser and a `Display` printer.
///
/// `target` names the type in failure messages.
pub struct FromStrCodec<T> {
    target: &'static str,
    _t: PhantomData<fn() -> T>,
}

impl<T> FromStrCodec<T> {
    pub const fn new(target: &'static str) -> Self {
        Self {
            target,
            _t: PhantomData,
        }
    }
}

impl<T> CellDecoder<T> for FromStrCodec<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn decode(&self, cell: &str) -> DecodeResult<T> {
        cell.parse::<T>()
            .map_err(|e| DecodeError::parse(cell, self.target, e))
    }
}

impl<T: Display> CellEncoder<T> for FromStrCodec<T> {
    fn encode(&self, value: &T) -> String {
        value.to_string()
    }
}

/// Codec for a user type that round-trips through `FromStr` and `Display`.
pub fn from_str<T>(target: &'static str) -> CellCodec<T>
where
    T: FromStr + Display + 'static,
    T::Err: Display,
{
    CellCodec::new(FromStrCodec::<T>::new(target), FromStrCodec::<T>::new(target))
}

macro_rules! numeric_codecs {
    ($($ty:ident),* $(,)?) => {
        $(
            #[doc = concat!("Codec for `", stringify!($ty), "`.")]
            pub fn $ty() -> CellCodec<$ty> {
                from_str::<$ty>(stringify!($ty))
            }
        )*
    };
}

numeric_codecs!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/* ===================== bool ===================== */

/// `true` / `false`, compared ASCII case-insensitively; encodes lowercase.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolCodec;

impl CellDecoder<bool> for BoolCodec {
    fn decode(&self, cell: &str) -> DecodeResult<bool> {
        if cell.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if cell.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(DecodeError::parse(cell, "bool", "expected 'true' or 'false'"))
        }
    }
}

impl CellEncoder<bool> for BoolCodec {
    fn encode(&self, value: &bool) -> String {
        value.to_string()
    }
}

pub fn bool() -> CellCodec<bool> {
    CellCodec::new(BoolCodec, BoolCodec)
}

/* ===================== char ===================== */

/// Exactly one Unicode scalar value.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharCodec;

impl CellDecoder<char> for CharCodec {
    fn decode(&self, cell: &str) -> DecodeResult<char> {
        let mut chars = cell.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            (None, _) => Err(DecodeError::parse(cell, "char", "empty cell")),
            (Some(_), Some(_)) => Err(DecodeError::parse(
                cell,
                "char",
                "more than one character",
            )),
        }
    }
}

impl CellEncoder<char> for CharCodec {
    fn encode(&self, value: &char) -> String {
        value.to_string()
    }
}

pub fn char() -> CellCodec<char> {
    CellCodec::new(CharCodec, CharCodec)
}

/* ===================== String / () ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct StringCodec;

impl CellDecoder<String> for StringCodec {
    fn decode(&self, cell: &str) -> DecodeResult<String> {
        Ok(cell.to_string())
    }
}

impl CellEncoder<String> for StringCodec {
    fn encode(&self, value: &String) -> String {
        value.clone()
    }
}

/// The identity codec. Never fails.
pub fn string() -> CellCodec<String> {
    CellCodec::new(StringCodec, StringCodec)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnitCodec;

impl CellDecoder<()> for UnitCodec {
    fn decode(&self, cell: &str) -> DecodeResult<()> {
        if cell.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::parse(cell, "()", "expected an empty cell"))
        }
    }
}

impl CellEncoder<()> for UnitCodec {
    fn encode(&self, _value: &()) -> String {
        String::new()
    }
}

/// Accepts only the empty cell. Useful as a placeholder column.
pub fn unit() -> CellCodec<()> {
    CellCodec::new(UnitCodec, UnitCodec)
}

/* ===================== Option ===================== */

/// The empty cell is `None`; anything else is delegated to the inner codec.
///
/// `Some` of a value whose encoding is the empty string (e.g. `Some(String::new())`) encodes
/// to an empty cell and therefore reads back as `None`.
pub struct OptionCodec<A> {
    inner: CellCodec<A>,
}

impl<A> CellDecoder<Option<A>> for OptionCodec<A> {
    fn decode(&self, cell: &str) -> DecodeResult<Option<A>> {
        if cell.is_empty() {
            Ok(None)
        } else {
            self.inner.decode(cell).map(Some)
        }
    }
}

impl<A> CellEncoder<Option<A>> for OptionCodec<A> {
    fn encode(&self, value: &Option<A>) -> String {
        match value {
            Some(a) => self.inner.encode(a),
            None => String::new(),
        }
    }
}

pub fn option<A: 'static>(inner: CellCodec<A>) -> CellCodec<Option<A>> {
    let codec = std::sync::Arc::new(OptionCodec { inner });
    CellCodec::new(std::sync::Arc::clone(&codec), codec)
}

/* ===================== Either ===================== */

/// One of two alternatives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(l) => Some(l),
            Either::Right(_) => None,
        }
    }

    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }
}

/// Tries the left codec first and the right codec only if the left one fails.
pub struct EitherCodec<L, R> {
    left: CellCodec<L>,
    right: CellCodec<R>,
}

impl<L, R> CellDecoder<Either<L, R>> for EitherCodec<L, R> {
    fn decode(&self, cell: &str) -> DecodeResult<Either<L, R>> {
        self.left
            .decode(cell)
            .map(Either::Left)
            .or_try(|| self.right.decode(cell).map(Either::Right))
    }
}

impl<L, R> CellEncoder<Either<L, R>> for EitherCodec<L, R> {
    fn encode(&self, value: &Either<L, R>) -> String {
        match value {
            Either::Left(l) => self.left.encode(l),
            Either::Right(r) => self.right.encode(r),
        }
    }
}

pub fn either<L: 'static, R: 'static>(
    left: CellCodec<L>,
    right: CellCodec<R>,
) -> CellCodec<Either<L, R>> {
    let codec = std::sync::Arc::new(EitherCodec { left, right });
    CellCodec::new(std::sync::Arc::clone(&codec), codec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_reject_overflow_and_junk() {
        assert_eq!(i8().decode("127"), Ok(127));
        assert!(i8().decode("128").is_err());
        assert!(u32().decode("-1").is_err());
        assert!(i64().decode("12a").is_err());
        assert!(i32().decode("").is_err());
        assert!(i32().decode(" 1").is_err());
    }

    #[test]
    fn floats_use_decimal_point() {
        assert_eq!(f64().decode("1.5"), Ok(1.5));
        assert!(f64().decode("1,5").is_err());
        assert_eq!(f64().encode(&0.1), "0.1");
    }

    #[test]
    fn bool_policy() {
        let b = bool();
        assert_eq!(b.decode("true"), Ok(true));
        assert_eq!(b.decode("FALSE"), Ok(false));
        assert_eq!(b.decode("True"), Ok(true));
        assert!(b.decode("yes").is_err());
        assert!(b.decode("1").is_err());
        assert!(b.decode("").is_err());
        assert_eq!(b.encode(&true), "true");
    }

    #[test]
    fn char_requires_exactly_one() {
        let c = char();
        assert_eq!(c.decode("é"), Ok('é'));
        assert!(c.decode("").is_err());
        assert!(c.decode("ab").is_err());
    }

    #[test]
    fn string_never_fails() {
        assert_eq!(string().decode(""), Ok(String::new()));
        assert_eq!(string().decode(" x "), Ok(" x ".to_string()));
    }

    #[test]
    fn option_empty_is_none() {
        let c = option(i32());
        assert_eq!(c.decode(""), Ok(None));
        assert_eq!(c.decode("5"), Ok(Some(5)));
        assert!(c.decode("five").is_err());
        assert_eq!(c.encode(&None), "");
    }

    #[test]
    fn either_prefers_left() {
        let c = either(i64(), f64());
        assert_eq!(c.decode("3"), Ok(Either::Left(3)));
        assert_eq!(c.decode("3.5"), Ok(Either::Right(3.5)));
        assert!(c.decode("x").is_err());
        assert_eq!(c.encode(&Either::Right(2.5)), "2.5");
    }

    #[test]
    fn unit_only_accepts_empty() {
        assert_eq!(unit().decode(""), Ok(()));
        assert!(unit().decode("x").is_err());
    }
}
