use rowset_api::{MemorySource, Row, SourceError};
use rowset_engine::{CursorError, RowCursor};
use serde::Deserialize;

use crate::error::InspectError;

/// One captured query response page.
#[derive(Debug, Deserialize)]
pub struct ResultPage {
    #[serde(default)]
    pub id: String,
    pub schema: Vec<ColumnSpec>,
    #[serde(default)]
    pub data: Vec<Vec<serde_json::Value>>,
    /// Server error reported after the rows above.
    #[serde(default)]
    pub error: Option<PageError>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PageError {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

impl ResultPage {
    pub fn load(path: &str) -> Result<Self, InspectError> {
        let content = std::fs::read_to_string(path).map_err(|source| InspectError::Read {
            path: path.to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn into_cursor(self) -> Result<RowCursor<MemorySource>, CursorError> {
        let rows = self.data.iter().map(|cells| Row::from_json_array(cells)).collect();
        let mut source = MemorySource::new(rows);
        if let Some(error) = self.error {
            source = source.with_failure(match error.code {
                Some(code) => SourceError::query(code, error.message),
                None => SourceError::protocol(error.message),
            });
        }
        let schema = self.schema.into_iter().map(|c| (c.name, c.type_name));
        RowCursor::new(self.id, schema, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowset_engine::ErrorKind;

    const PAGE: &str = r#"{
        "id": "q-9",
        "schema": [{"name": "id", "type": "Int64"}, {"name": "tags", "type": "Array(String)"}],
        "data": [[1, ["a", "b"]], [2, null]],
        "error": {"code": 1002, "message": "memory limit exceeded"}
    }"#;

    #[test]
    fn page_becomes_cursor() {
        let page: ResultPage = serde_json::from_str(PAGE).unwrap();
        let mut cursor = page.into_cursor().unwrap();

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_i64(1).unwrap(), 1);
        assert_eq!(cursor.get_string(2).unwrap().as_deref(), Some(r#"["a","b"]"#));
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_string(2).unwrap(), None);

        let err = cursor.advance().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(err.to_string(), "query failed (#q-9): memory limit exceeded (code 1002)");
    }

    #[test]
    fn unsigned_beyond_i64_decodes_exactly() {
        let page: ResultPage = serde_json::from_str(
            r#"{"id": "q-u", "schema": [{"name": "n", "type": "UInt64"}], "data": [[18446744073709551615]]}"#,
        )
        .unwrap();
        let mut cursor = page.into_cursor().unwrap();
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.get_decoded(1).unwrap().to_string(), "18446744073709551615");
    }

    #[test]
    fn missing_data_is_empty() {
        let page: ResultPage = serde_json::from_str(r#"{"schema": [{"name": "x", "type": "String"}]}"#).unwrap();
        let mut cursor = page.into_cursor().unwrap();
        assert!(!cursor.advance().unwrap());
    }
}
