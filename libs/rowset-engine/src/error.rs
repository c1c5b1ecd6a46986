use rowset_api::{SchemaError, SourceError};
use rowset_decode::{DecodeError, TemporalKind};

/// Flat error category, for callers that branch on kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCursorState,
    IndexOutOfRange,
    UnknownColumn,
    TypeMismatch,
    MalformedTemporalLiteral,
    UpstreamFailure,
    Schema,
}

/// Error returned by cursor operations and typed accessors.
///
/// Decode errors are scoped to the single call: the cursor, the current row
/// and every other column stay usable afterwards.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("invalid cursor state: {0}")]
    InvalidCursorState(&'static str),

    #[error("invalid column index {ordinal}, expected 1..={count}")]
    IndexOutOfRange { ordinal: usize, count: usize },

    #[error("invalid column label '{name}'{}; valid column labels are: {}", query_suffix(.query_id), .known.join(", "))]
    UnknownColumn {
        query_id: Option<String>,
        name: String,
        known: Vec<String>,
    },

    #[error("value at column {ordinal} is not a valid {target}: '{text}'")]
    TypeMismatch {
        ordinal: usize,
        text: String,
        target: &'static str,
    },

    #[error("column {ordinal}: invalid {kind} '{text}': {reason}")]
    MalformedTemporalLiteral {
        ordinal: usize,
        kind: TemporalKind,
        text: String,
        reason: &'static str,
    },

    #[error("query failed (#{query_id}): {source}")]
    UpstreamFailure { query_id: String, source: SourceError },

    #[error("schema: {0}")]
    Schema(#[from] SchemaError),
}

fn query_suffix(query_id: &Option<String>) -> String {
    match query_id {
        Some(id) => format!(" (#{id})"),
        None => String::new(),
    }
}

impl CursorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CursorError::InvalidCursorState(_) => ErrorKind::InvalidCursorState,
            CursorError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            CursorError::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            CursorError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CursorError::MalformedTemporalLiteral { .. } => ErrorKind::MalformedTemporalLiteral,
            CursorError::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
            CursorError::Schema(_) => ErrorKind::Schema,
        }
    }

    /// Attach the column ordinal to a decode failure.
    pub(crate) fn decode(ordinal: usize, e: DecodeError) -> Self {
        match e {
            DecodeError::Mismatch { text, target } => CursorError::TypeMismatch { ordinal, text, target },
            DecodeError::MalformedTemporal { kind, text, reason } => {
                CursorError::MalformedTemporalLiteral { ordinal, kind, text, reason }
            }
            DecodeError::Precision { value, .. } => CursorError::TypeMismatch {
                ordinal,
                text: value.to_string(),
                target: "fractional second",
            },
        }
    }

    /// Present-but-inconvertible value, outside of any parser.
    pub(crate) fn mismatch(ordinal: usize, raw: &rowset_api::RawValue, target: &'static str) -> Self {
        CursorError::TypeMismatch { ordinal, text: raw.to_string(), target }
    }
}
