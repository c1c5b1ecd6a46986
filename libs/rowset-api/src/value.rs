use std::fmt;

/// As-received representation of one cell.
///
/// The tag reflects what the upstream protocol sent, not what the column
/// declares: a `Decimal(18,2)` column usually arrives as `Text`, a `Date`
/// always does.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Text(String),
    /// Opaque binary data. Never stringified implicitly.
    Bytes(Vec<u8>),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Map a JSON cell to its wire representation.
    ///
    /// - integral numbers → `Int64`, or `Text` when above `i64::MAX`
    /// - other numbers → `Float64`
    /// - arrays/objects → `Text` holding their JSON encoding
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int64(i)
                } else if n.is_u64() {
                    RawValue::Text(n.to_string())
                } else {
                    n.as_f64().map(RawValue::Float64).unwrap_or_else(|| RawValue::Text(n.to_string()))
                }
            }
            serde_json::Value::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(other.to_string()),
        }
    }
}

/// Renders the value the way it would be shown to a user; `Bytes` as hex.
impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("NULL"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int64(i) => write!(f, "{i}"),
            RawValue::Float64(v) => write!(f, "{v}"),
            RawValue::Text(s) => f.write_str(s),
            RawValue::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int64(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float64(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(v: Vec<u8>) -> Self {
        RawValue::Bytes(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Null, Into::into)
    }
}

/// Positional array of cells. Order matches the schema the cursor was built from.
///
/// Values only, no names or types: all metadata lives in the column catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(pub Vec<RawValue>);

impl Row {
    pub fn new(values: Vec<RawValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zero-based cell lookup.
    pub fn get(&self, index: usize) -> Option<&RawValue> {
        self.0.get(index)
    }

    /// Build a row from a JSON array (one element per column).
    pub fn from_json_array(cells: &[serde_json::Value]) -> Self {
        Self(cells.iter().map(RawValue::from_json).collect())
    }
}

impl From<Vec<RawValue>> for Row {
    fn from(values: Vec<RawValue>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_cells_map_to_wire_tags() {
        let cells = serde_json::json!([null, true, 42, 1.5, "2024-01-01", [1, 2]]);
        let row = Row::from_json_array(cells.as_array().unwrap());
        assert_eq!(
            row.0,
            vec![
                RawValue::Null,
                RawValue::Bool(true),
                RawValue::Int64(42),
                RawValue::Float64(1.5),
                RawValue::Text("2024-01-01".into()),
                RawValue::Text("[1,2]".into()),
            ]
        );
    }

    #[test]
    fn large_unsigned_keeps_every_digit() {
        let cell = serde_json::json!(18446744073709551615u64);
        assert_eq!(RawValue::from_json(&cell), RawValue::Text("18446744073709551615".into()));
        let cell = serde_json::json!(9223372036854775807i64);
        assert_eq!(RawValue::from_json(&cell), RawValue::Int64(i64::MAX));
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(RawValue::from(None::<i64>), RawValue::Null);
        assert_eq!(RawValue::from(Some("x")), RawValue::Text("x".into()));
    }

    #[test]
    fn bytes_display_as_hex() {
        assert_eq!(RawValue::Bytes(vec![0x0a, 0xff]).to_string(), "0x0aff");
    }
}
