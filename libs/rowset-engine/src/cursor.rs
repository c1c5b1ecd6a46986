use std::sync::{Arc, Weak};

use rowset_api::{RawValue, Row, RowSource, SourceError};

use crate::catalog::ColumnCatalog;
use crate::config::CursorOptions;
use crate::error::CursorError;

/// The statement a cursor was produced by. Only used for lifecycle queries.
pub trait Statement: Send + Sync {
    fn sql(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    Forward,
}

// ═══════════════════════════════════════════════════════════════
//  RowCursor
// ═══════════════════════════════════════════════════════════════

/// Forward-only cursor over a row source.
///
/// Holds the current row and the sticky `was_null` flag as plain fields:
/// one cursor belongs to one thread of control. Wrap it in a `Mutex` to
/// share it.
pub struct RowCursor<S> {
    source: S,
    catalog: ColumnCatalog,
    pub(crate) options: CursorOptions,
    query_id: String,
    statement: Option<Weak<dyn Statement>>,
    row: Option<Row>,
    row_number: u64,
    was_null: bool,
    closed: bool,
}

impl<S: RowSource> RowCursor<S> {
    /// Build a cursor from wire `(name, type)` pairs. A malformed schema
    /// fails construction.
    pub fn new<I, N, T>(query_id: impl Into<String>, schema: I, source: S) -> Result<Self, CursorError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let catalog = ColumnCatalog::from_schema(schema)?;
        Ok(Self::with_catalog(query_id, catalog, source))
    }

    pub fn with_catalog(query_id: impl Into<String>, catalog: ColumnCatalog, source: S) -> Self {
        let query_id = query_id.into();
        tracing::debug!(query_id = %query_id, columns = catalog.ordinal_count(), "cursor opened");
        Self {
            source,
            catalog,
            options: CursorOptions::default(),
            query_id,
            statement: None,
            row: None,
            row_number: 0,
            was_null: false,
            closed: false,
        }
    }

    pub fn with_options(mut self, options: CursorOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach the owning statement without keeping it alive.
    pub fn with_statement(mut self, statement: &Arc<dyn Statement>) -> Self {
        self.statement = Some(Arc::downgrade(statement));
        self
    }

    // ---- Navigation ----

    /// Move to the next row. `Ok(false)` once the source is exhausted,
    /// after which no row is current.
    pub fn advance(&mut self) -> Result<bool, CursorError> {
        self.check_open()?;
        match self.source.next_row() {
            Ok(Some(row)) => {
                let expected = self.catalog.ordinal_count();
                if row.len() != expected {
                    self.clear_row();
                    return Err(self.upstream(SourceError::protocol(format!(
                        "row has {} values, schema declares {expected} columns",
                        row.len()
                    ))));
                }
                self.row = Some(row);
                self.row_number += 1;
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!(query_id = %self.query_id, rows = self.row_number, "cursor exhausted");
                self.clear_row();
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(query_id = %self.query_id, error = %e, "row source failed");
                self.clear_row();
                Err(self.upstream(e))
            }
        }
    }

    /// 1-based number of the current row; 0 when no row is current.
    pub fn current_row_number(&self) -> Result<u64, CursorError> {
        self.check_open()?;
        Ok(self.row_number)
    }

    /// Whether the most recent column access read a NULL.
    pub fn was_null(&self) -> Result<bool, CursorError> {
        self.check_open()?;
        Ok(self.was_null)
    }

    pub fn fetch_direction(&self) -> Result<FetchDirection, CursorError> {
        self.check_open()?;
        Ok(FetchDirection::Forward)
    }

    // ---- Lifecycle ----

    /// Release the current row. Idempotent; every later call fails.
    pub fn close(&mut self) {
        if !self.closed {
            tracing::debug!(query_id = %self.query_id, "cursor closed");
        }
        self.closed = true;
        self.clear_row();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn statement(&self) -> Result<Arc<dyn Statement>, CursorError> {
        self.statement
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(CursorError::InvalidCursorState("statement not available"))
    }

    // ---- Metadata ----

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn column_count(&self) -> usize {
        self.catalog.ordinal_count()
    }

    /// Ordinal of a column label, ignoring case.
    pub fn find_column(&self, name: &str) -> Result<usize, CursorError> {
        self.check_open()?;
        self.catalog.resolve(name).map_err(|e| match e {
            CursorError::UnknownColumn { name, known, .. } => CursorError::UnknownColumn {
                query_id: Some(self.query_id.clone()),
                name,
                known,
            },
            other => other,
        })
    }

    pub fn column_name(&self, ordinal: usize) -> Result<&str, CursorError> {
        self.catalog.descriptor(ordinal).map(|c| c.name.as_str())
    }

    /// Type text exactly as declared by the server.
    pub fn declared_type_name(&self, ordinal: usize) -> Result<&str, CursorError> {
        self.catalog.descriptor(ordinal).map(|c| c.type_name.as_str())
    }

    pub fn declared_type(&self, ordinal: usize) -> Result<&rowset_api::DeclaredType, CursorError> {
        self.catalog.declared_type(ordinal)
    }

    /// Whether the server declared the column `Nullable(..)`.
    pub fn is_nullable(&self, ordinal: usize) -> Result<bool, CursorError> {
        self.catalog.descriptor(ordinal).map(|c| c.nullable)
    }

    // ---- Cell access ----

    /// Bounds-checked cell of the current row. Overwrites `was_null`.
    pub(crate) fn column(&mut self, ordinal: usize) -> Result<&RawValue, CursorError> {
        self.check_open()?;
        let row = self
            .row
            .as_ref()
            .ok_or(CursorError::InvalidCursorState("not on a valid row"))?;
        let count = self.catalog.ordinal_count();
        let value = ordinal
            .checked_sub(1)
            .filter(|_| ordinal <= count)
            .and_then(|i| row.get(i))
            .ok_or(CursorError::IndexOutOfRange { ordinal, count })?;
        self.was_null = value.is_null();
        Ok(value)
    }

    pub(crate) fn set_was_null(&mut self, was_null: bool) {
        self.was_null = was_null;
    }

    fn check_open(&self) -> Result<(), CursorError> {
        if self.closed {
            return Err(CursorError::InvalidCursorState("cursor is closed"));
        }
        Ok(())
    }

    fn clear_row(&mut self) {
        self.row = None;
        self.row_number = 0;
    }

    fn upstream(&self, source: SourceError) -> CursorError {
        CursorError::UpstreamFailure {
            query_id: self.query_id.clone(),
            source,
        }
    }
}
