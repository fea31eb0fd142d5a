//! Row decoding through Serde.
//!
//! [`SerdeRowDecoder`] hands the remaining fields of a row to `csv`'s Serde deserializer, so any
//! `#[derive(Deserialize)]` struct or tuple can be read without writing a codec by hand.
//! Deserialization is positional unless a header is supplied with
//! [`with_header`](SerdeRowDecoder::with_header), in which case struct fields are matched by name.

use super::RowDecoder;
use crate::error::DecodeError;
use crate::result::DecodeResult;
use csv::StringRecord;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

pub struct SerdeRowDecoder<T> {
    header: Option<StringRecord>,
    _t: PhantomData<fn() -> T>,
}

impl<T> Default for SerdeRowDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SerdeRowDecoder<T> {
    pub fn new() -> Self {
        Self {
            header: None,
            _t: PhantomData,
        }
    }

    /// Match struct fields against these column names instead of by position.
    pub fn with_header<I, S>(mut self, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.header = Some(header.into_iter().collect());
        self
    }
}

impl<T: DeserializeOwned> RowDecoder<T> for SerdeRowDecoder<T> {
    fn decode_from(&self, fields: &[String], offset: usize) -> DecodeResult<(T, usize)> {
        let rest = fields.get(offset..).unwrap_or(&[]);
        let record: StringRecord = rest.iter().collect();
        match record.deserialize::<T>(self.header.as_ref()) {
            Ok(value) => Ok((value, fields.len().max(offset))),
            Err(e) => Err(deserialize_failure(&e, offset)),
        }
    }
}

fn deserialize_failure(err: &csv::Error, offset: usize) -> DecodeError {
    if let csv::ErrorKind::Deserialize { err: de, .. } = err.kind() {
        let failure = DecodeError::custom(de.kind().to_string());
        return match de.field() {
            Some(field) => failure.at_column(offset + field as usize),
            None => failure,
        };
    }
    DecodeError::custom(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Quote {
        symbol: String,
        bid: f64,
        ask: Option<f64>,
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_struct() {
        let d = SerdeRowDecoder::<Quote>::new();
        assert_eq!(
            d.decode_row(&row(&["ACME", "1.5", ""])),
            Ok(Quote {
                symbol: "ACME".into(),
                bid: 1.5,
                ask: None
            })
        );
    }

    #[test]
    fn named_struct_follows_header_order() {
        let d = SerdeRowDecoder::<Quote>::new().with_header(["bid", "ask", "symbol"]);
        assert_eq!(
            d.decode_row(&row(&["2", "3", "XYZ"])),
            Ok(Quote {
                symbol: "XYZ".into(),
                bid: 2.0,
                ask: Some(3.0)
            })
        );
    }

    #[test]
    fn failure_points_at_column() {
        let d = SerdeRowDecoder::<Quote>::new();
        let err = d.decode_row(&row(&["ACME", "cheap", "1"])).unwrap_err();
        assert_eq!(err.column(), Some(1));
    }
}
