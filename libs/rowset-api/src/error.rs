use std::fmt;

/// Category of an upstream row-producer failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure while fetching the next page.
    Io,
    /// The server reported a query error.
    Query,
    /// The payload did not match the expected shape.
    Protocol,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceErrorKind::Io => f.write_str("io"),
            SourceErrorKind::Query => f.write_str("query"),
            SourceErrorKind::Protocol => f.write_str("protocol"),
        }
    }
}

/// Error surfaced by the row-producing sequence.
///
/// Carries a kind, the server error code when the server sent one, and a
/// human-readable message. `From` impls assign the kind automatically so
/// row producers can use `?`.
#[derive(Clone, PartialEq)]
pub struct SourceError {
    kind: SourceErrorKind,
    code: Option<i64>,
    message: String,
}

impl SourceError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: SourceErrorKind::Io, code: None, message: msg.into() }
    }

    /// Query error reported by the server, with its numeric code.
    pub fn query(code: i64, msg: impl Into<String>) -> Self {
        Self { kind: SourceErrorKind::Query, code: Some(code), message: msg.into() }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self { kind: SourceErrorKind::Protocol, code: None, message: msg.into() }
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{} {code}] {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<String> for SourceError {
    fn from(s: String) -> Self { Self::protocol(s) }
}

impl From<&str> for SourceError {
    fn from(s: &str) -> Self { Self::protocol(s) }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self { Self::io(e.to_string()) }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self { Self::protocol(e.to_string()) }
}

/// Schema description that cannot back a cursor. Fatal at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("column {ordinal}: empty column name")]
    EmptyName { ordinal: usize },

    #[error("column '{column}': malformed type '{type_text}': {reason}")]
    MalformedType {
        column: String,
        type_text: String,
        reason: &'static str,
    },
}
