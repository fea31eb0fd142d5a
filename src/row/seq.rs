//! Homogeneous row codecs: the same cell codec across several columns.

use super::{RowCodec, RowDecoder, RowEncoder};
use crate::cell::{CellCodec, CellEncoder};
use crate::error::DecodeError;
use crate::result::DecodeResult;
use std::sync::Arc;

/// Checks that at least `required` fields are available from `offset` on.
fn require_fields(fields: &[String], offset: usize, required: usize) -> DecodeResult<()> {
    if required == 0 {
        return Ok(());
    }
    if fields.is_empty() {
        return Err(DecodeError::EmptyRow);
    }
    let available = fields.len().saturating_sub(offset);
    if available < required {
        return Err(DecodeError::Arity {
            expected: offset + required,
            found: fields.len(),
        });
    }
    Ok(())
}

fn decode_span<A>(
    cell: &CellCodec<A>,
    fields: &[String],
    span: std::ops::Range<usize>,
) -> DecodeResult<Vec<A>> {
    let mut out = Vec::with_capacity(span.len());
    for idx in span {
        let (value, _) = cell.decode_from(fields, idx)?;
        out.push(value);
    }
    Ok(out)
}

/// Exactly `N` consecutive cells of one type.
///
/// The width is part of the type, so every value encodes to exactly the `N` fields its decoder
/// consumes.
pub struct ArrayCodec<A, const N: usize> {
    cell: CellCodec<A>,
}

impl<A, const N: usize> RowDecoder<[A; N]> for ArrayCodec<A, N> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<([A; N], usize)> {
        require_fields(fields, offset, N)?;
        let end = offset + N;
        let values = decode_span(&self.cell, fields, offset..end)?;
        let array = <[A; N]>::try_from(values).map_err(|short: Vec<A>| DecodeError::Arity {
            expected: end,
            found: offset + short.len(),
        })?;
        Ok((array, end))
    }
}

impl<A, const N: usize> RowEncoder<[A; N]> for ArrayCodec<A, N> {
    fn encode_into(&self, value: &[A; N], out: &mut Vec<String>) {
        out.extend(value.iter().map(|a| CellEncoder::encode(&self.cell, a)));
    }
}

/// Every remaining cell, requiring at least `min` of them.
///
/// Standing alone, an empty list is a row with no fields, which a [`CsvSink`](crate::CsvSink)
/// writes as one empty field.
pub struct ListCodec<A> {
    cell: CellCodec<A>,
    min: usize,
}

impl<A> RowDecoder<Vec<A>> for ListCodec<A> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(Vec<A>, usize)> {
        require_fields(fields, offset, self.min)?;
        let end = fields.len().max(offset);
        decode_span(&self.cell, fields, offset..end).map(|v| (v, end))
    }
}

impl<A> RowEncoder<Vec<A>> for ListCodec<A> {
    fn encode_into(&self, value: &Vec<A>, out: &mut Vec<String>) {
        out.extend(value.iter().map(|a| CellEncoder::encode(&self.cell, a)));
    }
}

/// Ignores `count` columns on decode and writes as many empty cells on encode.
pub struct SkipCodec {
    count: usize,
}

impl RowDecoder<()> for SkipCodec {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<((), usize)> {
        require_fields(fields, offset, self.count)?;
        Ok(((), offset + self.count))
    }
}

impl RowEncoder<()> for SkipCodec {
    fn encode_into(&self, _value: &(), out: &mut Vec<String>) {
        out.extend(std::iter::repeat_n(String::new(), self.count));
    }
}

impl<A: 'static> RowCodec<A> {
    /// A fixed-arity row of `N` cells decoded with `cell`.
    ///
    /// Decoding fails with [`DecodeError::EmptyRow`] on an empty row and with
    /// [`DecodeError::Arity`] when fewer than `N` fields remain.
    ///
    /// ```
    /// use ironcsv::{cell, RowCodec};
    /// use ironcsv::row::{RowDecoder, RowEncoder};
    ///
    /// let rgb = RowCodec::array::<3>(cell::u8());
    /// let fields = rgb.encode_row(&[255, 128, 0]);
    /// assert_eq!(fields, ["255", "128", "0"]);
    /// assert_eq!(rgb.decode_row(&fields), Ok([255, 128, 0]));
    /// ```
    pub fn array<const N: usize>(cell: CellCodec<A>) -> RowCodec<[A; N]> {
        let codec = Arc::new(ArrayCodec::<A, N> { cell });
        RowCodec::new(Arc::clone(&codec), codec)
    }
}

impl<A: 'static> RowCodec<Vec<A>> {
    /// All remaining cells, of which there must be at least `min`.
    ///
    /// An empty vector encodes to a row with no fields. A CSV writer can only express that
    /// as a single empty field, so after a round trip through text it reads back as `[""]`
    /// (or as a failure, for element types that reject the empty cell).
    pub fn list(cell: CellCodec<A>, min: usize) -> Self {
        let codec = Arc::new(ListCodec { cell, min });
        RowCodec::new(Arc::clone(&codec), codec)
    }
}

impl RowCodec<()> {
    /// `count` ignored columns.
    pub fn skip(count: usize) -> Self {
        let codec = Arc::new(SkipCodec { count });
        RowCodec::new(Arc::clone(&codec), codec)
    }
}
