//! Assertion functions for codec laws.
//!
//! Each function panics with the offending input and both sides of the comparison, so a
//! failing property names the exact value that broke it.

use crate::cell::{CellCodec, CellDecoder, CellEncoder};
use crate::error::DecodeError;
use crate::row::{RowCodec, RowDecoder, RowEncoder};
use std::fmt::Debug;

/// Assert that every value survives `encode` followed by `decode` unchanged.
///
/// # Panics
///
/// Panics on the first value that does not round-trip.
///
/// # Example
///
/// ```
/// use ironcsv::cell;
/// use ironcsv::testing::assert_round_trip;
///
/// assert_round_trip(&cell::i64(), &[i64::MIN, -1, 0, 42, i64::MAX]);
/// assert_round_trip(&cell::option(cell::string()), &[None, Some("x".to_string())]);
/// ```
pub fn assert_round_trip<A: Debug + PartialEq>(codec: &CellCodec<A>, values: &[A]) {
    for value in values {
        let text = codec.encode(value);
        match codec.decode(&text) {
            Ok(decoded) => assert_eq!(
                &decoded, value,
                "Cell round-trip changed the value:\n  Original: {value:?}\n  Encoded: {text:?}\n  Decoded: {decoded:?}"
            ),
            Err(e) => panic!(
                "Cell round-trip failed to decode:\n  Original: {value:?}\n  Encoded: {text:?}\n  Error: {e}"
            ),
        }
    }
}

/// Assert that every row value survives `encode_row` followed by `decode_row` unchanged.
///
/// # Panics
///
/// Panics on the first value that does not round-trip.
pub fn assert_row_round_trip<A: Debug + PartialEq>(codec: &RowCodec<A>, values: &[A]) {
    for value in values {
        let fields = codec.encode_row(value);
        match codec.decode_row(&fields) {
            Ok(decoded) => assert_eq!(
                &decoded, value,
                "Row round-trip changed the value:\n  Original: {value:?}\n  Encoded: {fields:?}\n  Decoded: {decoded:?}"
            ),
            Err(e) => panic!(
                "Row round-trip failed to decode:\n  Original: {value:?}\n  Encoded: {fields:?}\n  Error: {e}"
            ),
        }
    }
}

/// Assert that `input` does not decode, returning the failure for further checks.
///
/// # Panics
///
/// Panics if `input` decodes successfully.
///
/// # Example
///
/// ```
/// use ironcsv::{cell, DecodeError};
/// use ironcsv::testing::assert_decode_fails;
///
/// let err = assert_decode_fails(&cell::u8(), "256");
/// assert!(matches!(err, DecodeError::Parse { target: "u8", .. }));
/// ```
pub fn assert_decode_fails<A: Debug>(decoder: &impl CellDecoder<A>, input: &str) -> DecodeError {
    match decoder.decode(input) {
        Ok(value) => panic!("Expected decoding {input:?} to fail, but it produced {value:?}"),
        Err(e) => e,
    }
}

/// Row-level counterpart of [`assert_decode_fails`].
///
/// # Panics
///
/// Panics if `fields` decode successfully.
pub fn assert_row_decode_fails<A: Debug>(decoder: &impl RowDecoder<A>, fields: &[&str]) -> DecodeError {
    let fields: Vec<String> = fields.iter().map(|s| (*s).to_string()).collect();
    match decoder.decode_row(&fields) {
        Ok(value) => panic!("Expected decoding row {fields:?} to fail, but it produced {value:?}"),
        Err(e) => e,
    }
}

/// Assert that decoding `input` yields `Ok(None)`, whatever the inner codec.
///
/// # Panics
///
/// Panics if `input` decodes to anything else.
pub fn assert_decodes_none<A: Debug>(codec: &CellCodec<Option<A>>, input: &str) {
    match codec.decode(input) {
        Ok(None) => {}
        other => panic!("Expected {input:?} to decode as None, got {other:?}"),
    }
}
