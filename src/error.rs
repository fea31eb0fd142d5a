//! Decode failure taxonomy.
//!
//! Every decoder in this crate reports problems as a [`DecodeError`] value rather than
//! panicking. Cell-level failures (`Parse`, `IndexOutOfBounds`) are wrapped into row-level
//! failures (`Column`, `Arity`, `EmptyRow`) by the row codecs, so the error that reaches the
//! caller always names the first column that went wrong.
//!
//! I/O faults are a separate concern and travel as [`anyhow::Error`] through the streaming
//! types in [`crate::source`] and [`crate::sink`].

use serde::Serialize;
use thiserror::Error;

/// Why a cell or row could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// The cell text is not a valid literal for the target type.
    #[error("cannot decode '{input}' as {target}: {reason}")]
    Parse {
        input: String,
        target: &'static str,
        reason: String,
    },

    /// A positional decode asked for a field past the end of the row.
    #[error("no field at index {index} (row has {len} fields)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The row has fewer fields than the decoder requires (or more, for strict codecs).
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    /// The row has no fields but at least one is required.
    #[error("empty row")]
    EmptyRow,

    /// A row decode failed at the given column.
    #[error("column {index}: {source}")]
    Column {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    /// Both alternatives of a fallback decoder failed.
    #[error("no alternative matched ({left}; {right})")]
    Both {
        left: Box<DecodeError>,
        right: Box<DecodeError>,
    },

    /// A user-supplied refinement rejected the value.
    #[error("{message}")]
    Custom { message: String },
}

impl DecodeError {
    /// Build a [`DecodeError::Parse`] for `input` and the named target type.
    pub fn parse(input: &str, target: &'static str, reason: impl ToString) -> Self {
        Self::Parse {
            input: input.to_string(),
            target,
            reason: reason.to_string(),
        }
    }

    /// Build a [`DecodeError::Custom`] failure.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Wrap this failure as having happened at column `index`.
    ///
    /// Already-wrapped failures keep their innermost column, since that is where the
    /// offending cell actually sits.
    #[must_use]
    pub fn at_column(self, index: usize) -> Self {
        match self {
            e @ Self::Column { .. } => e,
            e @ (Self::Arity { .. } | Self::EmptyRow) => e,
            other => Self::Column {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The column index this failure points at, if any.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Column { index, .. } => Some(*index),
            Self::IndexOutOfBounds { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The innermost failure, with all column wrappers removed.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            Self::Column { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
