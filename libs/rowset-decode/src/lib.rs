//! Pure conversions from wire values to typed scalars.
//!
//! Nothing here holds state: every function is reentrant and may run on
//! any thread against already-materialized rows.

pub mod error;
pub mod numeric;
pub mod scalar;
pub mod temporal;

pub use error::{DecodeError, TemporalKind};
pub use numeric::{NumericTarget, parse_decimal, to_decimal, to_decimal_scaled, to_number};
pub use scalar::{to_bool, to_bytes, to_text};
pub use temporal::{
    CalendarPath, DateValue, ParsedTimestamp, TimeValue, TimestampValue, embedded_or, fixed_zone,
    parse_date, parse_offset, parse_time, parse_timestamp, parse_timestamp_in, rescale, to_timestamp,
};
