use rowset_api::RawValue;

use crate::error::DecodeError;

/// `Bool` direct, `Int64` 0/1, text `true|false|1|0` (any case).
/// `Null` yields `false`.
pub fn to_bool(raw: &RawValue) -> Result<bool, DecodeError> {
    match raw {
        RawValue::Null => Ok(false),
        RawValue::Bool(b) => Ok(*b),
        RawValue::Int64(0) => Ok(false),
        RawValue::Int64(1) => Ok(true),
        RawValue::Text(s) => {
            if s.eq_ignore_ascii_case("true") || s == "1" {
                Ok(true)
            } else if s.eq_ignore_ascii_case("false") || s == "0" {
                Ok(false)
            } else {
                Err(DecodeError::mismatch(s.as_str(), "Boolean"))
            }
        }
        other => Err(DecodeError::mismatch(other.to_string(), "Boolean")),
    }
}

/// Text form of a value. `Null` yields `None`; `Bytes` only when valid UTF-8.
pub fn to_text(raw: &RawValue) -> Result<Option<String>, DecodeError> {
    match raw {
        RawValue::Null => Ok(None),
        RawValue::Text(s) => Ok(Some(s.clone())),
        RawValue::Bytes(b) => String::from_utf8(b.clone())
            .map(Some)
            .map_err(|_| DecodeError::mismatch(raw.to_string(), "String")),
        other => Ok(Some(other.to_string())),
    }
}

/// Binary payload. Only `Bytes` qualifies: no implicit encoding of text.
pub fn to_bytes(raw: &RawValue) -> Result<Option<Vec<u8>>, DecodeError> {
    match raw {
        RawValue::Null => Ok(None),
        RawValue::Bytes(b) => Ok(Some(b.clone())),
        other => Err(DecodeError::mismatch(other.to_string(), "Binary")),
    }
}
