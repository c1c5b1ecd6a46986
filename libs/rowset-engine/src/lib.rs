mod accessor;
pub mod catalog;
pub mod config;
pub mod cursor;
pub mod error;

pub use accessor::Decoded;
pub use catalog::ColumnCatalog;
pub use config::{ConfigError, CursorConfig, CursorOptions, EmbeddedZonePolicy};
pub use cursor::{FetchDirection, RowCursor, Statement};
pub use error::{CursorError, ErrorKind};

pub use rowset_api::{ColumnDescriptor, DeclaredType, MemorySource, RawValue, Row, RowSource, SourceError};
pub use rowset_decode::{DateValue, TimeValue, TimestampValue};
