use std::collections::VecDeque;

use crate::error::SourceError;
use crate::value::Row;

/// Row-producing sequence behind a cursor.
///
/// One pull per call: `Ok(Some(row))` for the next row, `Ok(None)` once
/// exhausted, `Err` when the upstream query failed. May block (paged
/// network fetch); the cursor never calls it concurrently.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<Row>, SourceError>;
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn next_row(&mut self) -> Result<Option<Row>, SourceError> {
        (**self).next_row()
    }
}

// ═══════════════════════════════════════════════════════════════
//  IterSource
// ═══════════════════════════════════════════════════════════════

/// Adapter for any iterator of fallible rows.
pub struct IterSource<I>(pub I);

impl<I, E> RowSource for IterSource<I>
where
    I: Iterator<Item = Result<Row, E>>,
    E: Into<SourceError>,
{
    fn next_row(&mut self) -> Result<Option<Row>, SourceError> {
        self.0.next().transpose().map_err(Into::into)
    }
}

// ═══════════════════════════════════════════════════════════════
//  MemorySource
// ═══════════════════════════════════════════════════════════════

/// Fully materialized rows, optionally followed by an upstream failure
/// (a server that streamed some pages and then reported an error).
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: VecDeque<Row>,
    failure: Option<SourceError>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            failure: None,
        }
    }

    /// Report `error` once every buffered row has been pulled.
    pub fn with_failure(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl RowSource for MemorySource {
    fn next_row(&mut self) -> Result<Option<Row>, SourceError> {
        if let Some(row) = self.rows.pop_front() {
            return Ok(Some(row));
        }
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}
