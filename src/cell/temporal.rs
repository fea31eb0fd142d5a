//! Date and timestamp codecs backed by `chrono`.
//!
//! The format string is fixed per codec, so decoding and encoding always agree.

use super::{CellCodec, CellDecoder, CellEncoder};
use crate::error::DecodeError;
use crate::result::DecodeResult;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// ISO 8601 calendar date, `%Y-%m-%d`.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// ISO 8601 local timestamp without offset, `%Y-%m-%dT%H:%M:%S%.f`.
pub const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub struct NaiveDateCodec {
    format: String,
}

impl CellDecoder<NaiveDate> for NaiveDateCodec {
    fn decode(&self, cell: &str) -> DecodeResult<NaiveDate> {
        NaiveDate::parse_from_str(cell, &self.format)
            .map_err(|e| DecodeError::parse(cell, "date", e))
    }
}

impl CellEncoder<NaiveDate> for NaiveDateCodec {
    fn encode(&self, value: &NaiveDate) -> String {
        value.format(&self.format).to_string()
    }
}

/// Dates in the given `strftime` format.
pub fn naive_date(format: impl Into<String>) -> CellCodec<NaiveDate> {
    let codec = std::sync::Arc::new(NaiveDateCodec {
        format: format.into(),
    });
    CellCodec::new(std::sync::Arc::clone(&codec), codec)
}

pub struct NaiveDateTimeCodec {
    format: String,
}

impl CellDecoder<NaiveDateTime> for NaiveDateTimeCodec {
    fn decode(&self, cell: &str) -> DecodeResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(cell, &self.format)
            .map_err(|e| DecodeError::parse(cell, "timestamp", e))
    }
}

impl CellEncoder<NaiveDateTime> for NaiveDateTimeCodec {
    fn encode(&self, value: &NaiveDateTime) -> String {
        value.format(&self.format).to_string()
    }
}

/// Timestamps without offset in the given `strftime` format.
pub fn naive_date_time(format: impl Into<String>) -> CellCodec<NaiveDateTime> {
    let codec = std::sync::Arc::new(NaiveDateTimeCodec {
        format: format.into(),
    });
    CellCodec::new(std::sync::Arc::clone(&codec), codec)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc3339Codec;

impl CellDecoder<DateTime<Utc>> for Rfc3339Codec {
    fn decode(&self, cell: &str) -> DecodeResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(cell)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DecodeError::parse(cell, "RFC 3339 timestamp", e))
    }
}

impl CellEncoder<DateTime<Utc>> for Rfc3339Codec {
    fn encode(&self, value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// RFC 3339 timestamps, normalized to UTC. Encodes with a `Z` suffix.
pub fn date_time_utc() -> CellCodec<DateTime<Utc>> {
    CellCodec::new(Rfc3339Codec, Rfc3339Codec)
}
