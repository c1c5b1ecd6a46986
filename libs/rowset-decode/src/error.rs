use std::fmt;

/// Which temporal grammar rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    Time,
    Timestamp,
    TimeZone,
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalKind::Date => f.write_str("date"),
            TemporalKind::Time => f.write_str("time"),
            TemporalKind::Timestamp => f.write_str("timestamp"),
            TemporalKind::TimeZone => f.write_str("time zone"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Grammar mismatch or out-of-range field.
    #[error("invalid {kind} '{text}': {reason}")]
    MalformedTemporal {
        kind: TemporalKind,
        text: String,
        reason: &'static str,
    },

    /// Value present but not convertible to the requested type.
    #[error("'{text}' is not a valid {target}")]
    Mismatch { text: String, target: &'static str },

    /// `rescale` precondition violated.
    #[error("cannot rescale {value} from {from} to {to} digits")]
    Precision { value: i64, from: u32, to: u32 },
}

impl DecodeError {
    pub(crate) fn temporal(kind: TemporalKind, text: &str, reason: &'static str) -> Self {
        Self::MalformedTemporal { kind, text: text.to_string(), reason }
    }

    pub(crate) fn mismatch(text: impl Into<String>, target: &'static str) -> Self {
        Self::Mismatch { text: text.into(), target }
    }
}
