//! Tuple row codecs.
//!
//! `rowN` lays out `N` components left to right. A component is anything that converts into a
//! [`RowCodec`], so single cells and nested multi-column codecs can be mixed freely:
//!
//! ```
//! use ironcsv::cell;
//! use ironcsv::row::{row2, RowDecoder};
//!
//! let point = row2(cell::f64(), cell::f64());
//! let segment = row2(point.clone(), point);
//! let fields: Vec<String> = ["0", "0", "3", "4"].iter().map(|s| s.to_string()).collect();
//! assert_eq!(segment.decode_row(&fields), Ok(((0.0, 0.0), (3.0, 4.0))));
//! ```

use super::{RowCodec, RowDecoder, RowEncoder};
use crate::result::DecodeResult;
use std::sync::Arc;

/// Positional product of row codecs held as a tuple.
pub struct TupleCodec<T>(pub T);

macro_rules! tuple_row_codecs {
    ($( $name:ident => ($($T:ident : $idx:tt),+) );* $(;)?) => {$( paste::paste! {
        impl<$($T),+> RowDecoder<($($T,)+)> for TupleCodec<($(RowCodec<$T>,)+)> {
            fn decode_from(
                &self,
                fields: &[String],
                offset: usize,
            ) -> DecodeResult<(($($T,)+), usize)> {
                let next = offset;
                $( let ([<$T:lower>], next) = self.0.$idx.decode_from(fields, next)?; )+
                Ok((($([<$T:lower>],)+), next))
            }
        }

        impl<$($T),+> RowEncoder<($($T,)+)> for TupleCodec<($(RowCodec<$T>,)+)> {
            fn encode_into(&self, value: &($($T,)+), out: &mut Vec<String>) {
                $( self.0.$idx.encode_into(&value.$idx, out); )+
            }
        }

        #[doc = concat!("Row codec for a ", stringify!($name), " tuple, components left to right.")]
        pub fn $name<$($T: 'static),+>(
            $([<$T:lower>]: impl Into<RowCodec<$T>>),+
        ) -> RowCodec<($($T,)+)> {
            let codec = Arc::new(TupleCodec(($([<$T:lower>].into(),)+)));
            RowCodec::new(Arc::clone(&codec), codec)
        }
    } )*};
}

tuple_row_codecs! {
    row2 => (A: 0, B: 1);
    row3 => (A: 0, B: 1, C: 2);
    row4 => (A: 0, B: 1, C: 2, D: 3);
    row5 => (A: 0, B: 1, C: 2, D: 3, E: 4);
    row6 => (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
}
