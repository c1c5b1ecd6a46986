use std::collections::HashMap;

use rowset_api::{ColumnDescriptor, DeclaredType, SchemaError};

use crate::error::CursorError;

/// Column metadata of a result set plus case-insensitive name lookup.
///
/// Ordinals are 1-based. When several columns share a name (ignoring
/// case) the first one owns it; later duplicates are reachable by ordinal
/// only.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    columns: Vec<ColumnDescriptor>,
    by_name: HashMap<String, usize>,
}

impl ColumnCatalog {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        let mut by_name = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            by_name.entry(column.name.to_lowercase()).or_insert(i + 1);
        }
        Self { columns, by_name }
    }

    /// Build from wire `(name, type)` pairs. Fails on the first malformed column.
    pub fn from_schema<I, N, T>(schema: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let columns = schema
            .into_iter()
            .enumerate()
            .map(|(i, (name, ty))| ColumnDescriptor::parse(i + 1, name.as_ref(), ty.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(columns))
    }

    /// Ordinal of `name`, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<usize, CursorError> {
        self.by_name
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| CursorError::UnknownColumn {
                query_id: None,
                name: name.to_string(),
                known: self.labels(),
            })
    }

    pub fn ordinal_count(&self) -> usize {
        self.columns.len()
    }

    pub fn descriptor(&self, ordinal: usize) -> Result<&ColumnDescriptor, CursorError> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or(CursorError::IndexOutOfRange { ordinal, count: self.columns.len() })
    }

    pub fn declared_type(&self, ordinal: usize) -> Result<&DeclaredType, CursorError> {
        self.descriptor(ordinal).map(|c| &c.declared_type)
    }

    /// Lower-cased labels that resolve, in ordinal order.
    fn labels(&self) -> Vec<String> {
        let mut labels: Vec<(&String, &usize)> = self.by_name.iter().collect();
        labels.sort_by_key(|(_, ordinal)| **ordinal);
        labels.into_iter().map(|(name, _)| name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> ColumnCatalog {
        ColumnCatalog::from_schema(names.iter().map(|n| (*n, "String"))).unwrap()
    }

    #[test]
    fn first_duplicate_wins() {
        let c = catalog(&["Name", "AGE", "name"]);
        assert_eq!(c.resolve("name").unwrap(), 1);
        assert_eq!(c.resolve("NAME").unwrap(), 1);
        assert_eq!(c.resolve("age").unwrap(), 2);
        assert_eq!(c.ordinal_count(), 3);
        assert_eq!(c.descriptor(3).unwrap().name, "name");
    }

    #[test]
    fn unknown_name_lists_known_labels() {
        let c = catalog(&["id", "Value"]);
        match c.resolve("missing") {
            Err(CursorError::UnknownColumn { name, known, .. }) => {
                assert_eq!(name, "missing");
                assert_eq!(known, vec!["id".to_string(), "value".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ordinals_are_one_based() {
        let c = catalog(&["a", "b"]);
        assert!(matches!(c.descriptor(0), Err(CursorError::IndexOutOfRange { ordinal: 0, count: 2 })));
        assert!(matches!(c.descriptor(3), Err(CursorError::IndexOutOfRange { ordinal: 3, count: 2 })));
        assert_eq!(c.declared_type(2).unwrap(), &DeclaredType::String);
    }

    #[test]
    fn malformed_schema_fails() {
        let err = ColumnCatalog::from_schema([("a", "Int32"), ("b", "Decimal(")]).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedType { ref column, .. } if column == "b"));
    }
}
