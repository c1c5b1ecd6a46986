pub mod error;
pub mod schema;
pub mod source;
pub mod value;

pub use error::{SchemaError, SourceError, SourceErrorKind};
pub use schema::{ColumnDescriptor, DeclaredType};
pub use source::{IterSource, MemorySource, RowSource};
pub use value::{RawValue, Row};
