//! Typed accessors.
//!
//! Every accessor reads one cell through `RowCursor::column`, which
//! overwrites `was_null`. A NULL cell returns the type's zero value (or
//! `None`) and never fails. Native tags convert directly; text falls back
//! to the matching parser.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::TimeZone;
use rowset_api::{DeclaredType, RawValue, RowSource};
use rowset_decode::{
    DateValue, NumericTarget, TimeValue, TimestampValue, embedded_or, fixed_zone, parse_date, parse_time,
    parse_timestamp, to_timestamp,
};

use crate::config::EmbeddedZonePolicy;
use crate::cursor::RowCursor;
use crate::error::CursorError;

/// A cell decoded according to its column's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(DateValue),
    Time(TimeValue),
    Timestamp(TimestampValue),
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Null => f.write_str("NULL"),
            Decoded::Bool(b) => write!(f, "{b}"),
            Decoded::Int(i) => write!(f, "{i}"),
            Decoded::Float(v) => write!(f, "{v}"),
            Decoded::Decimal(d) => write!(f, "{d}"),
            Decoded::Text(s) => f.write_str(s),
            Decoded::Bytes(b) => write!(f, "{}", RawValue::Bytes(b.clone())),
            Decoded::Date(d) => write!(f, "{}", d.date),
            Decoded::Time(t) => match t.to_naive() {
                Some(time) => write!(f, "{time}"),
                None => write!(f, "{:02}:{:02}:{:02}", t.hour, t.minute, t.second),
            },
            Decoded::Timestamp(ts) => match ts.to_utc() {
                Some(dt) => write!(f, "{dt}"),
                None => write!(f, "@{}.{:09}", ts.epoch_seconds, ts.nanosecond),
            },
        }
    }
}

/// `get_x_by_name(name, ..)` → `get_x(find_column(name)?, ..)`.
macro_rules! by_name {
    ($( $by_name:ident => $by_ordinal:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty; )*) => {
        $(
            pub fn $by_name(&mut self, name: &str $(, $arg: $ty)*) -> Result<$ret, CursorError> {
                let ordinal = self.find_column(name)?;
                self.$by_ordinal(ordinal $(, $arg)*)
            }
        )*
    };
}

impl<S: RowSource> RowCursor<S> {
    // ---- Opaque ----

    /// The cell as received, without conversion.
    pub fn get_raw(&mut self, ordinal: usize) -> Result<RawValue, CursorError> {
        self.column(ordinal).cloned()
    }

    // ---- Text / boolean / binary ----

    pub fn get_string(&mut self, ordinal: usize) -> Result<Option<String>, CursorError> {
        let raw = self.column(ordinal)?;
        rowset_decode::to_text(raw).map_err(|e| CursorError::decode(ordinal, e))
    }

    pub fn get_bool(&mut self, ordinal: usize) -> Result<bool, CursorError> {
        let raw = self.column(ordinal)?;
        rowset_decode::to_bool(raw).map_err(|e| CursorError::decode(ordinal, e))
    }

    /// Only `Bytes` cells qualify; text is never encoded implicitly.
    pub fn get_bytes(&mut self, ordinal: usize) -> Result<Option<Vec<u8>>, CursorError> {
        let raw = self.column(ordinal)?;
        rowset_decode::to_bytes(raw).map_err(|e| CursorError::decode(ordinal, e))
    }

    // ---- Numbers ----

    fn get_number<T: NumericTarget>(&mut self, ordinal: usize) -> Result<T, CursorError> {
        let raw = self.column(ordinal)?;
        if let RawValue::Text(text) = raw {
            tracing::trace!(ordinal, ty = T::NAME, text = %text, "parsing text value");
        }
        rowset_decode::to_number(raw).map_err(|e| CursorError::decode(ordinal, e))
    }

    pub fn get_i8(&mut self, ordinal: usize) -> Result<i8, CursorError> {
        self.get_number(ordinal)
    }

    pub fn get_i16(&mut self, ordinal: usize) -> Result<i16, CursorError> {
        self.get_number(ordinal)
    }

    pub fn get_i32(&mut self, ordinal: usize) -> Result<i32, CursorError> {
        self.get_number(ordinal)
    }

    pub fn get_i64(&mut self, ordinal: usize) -> Result<i64, CursorError> {
        self.get_number(ordinal)
    }

    pub fn get_f32(&mut self, ordinal: usize) -> Result<f32, CursorError> {
        self.get_number(ordinal)
    }

    pub fn get_f64(&mut self, ordinal: usize) -> Result<f64, CursorError> {
        self.get_number(ordinal)
    }

    pub fn get_decimal(&mut self, ordinal: usize) -> Result<Option<BigDecimal>, CursorError> {
        let raw = self.column(ordinal)?;
        if raw.is_null() {
            return Ok(None);
        }
        rowset_decode::to_decimal(raw)
            .map(Some)
            .map_err(|e| CursorError::decode(ordinal, e))
    }

    /// Legacy: the decimal rounded half-up to `scale` fractional digits.
    /// Prefer [`get_decimal`](Self::get_decimal) and round at the call site.
    pub fn get_decimal_scaled(&mut self, ordinal: usize, scale: i64) -> Result<Option<BigDecimal>, CursorError> {
        let raw = self.column(ordinal)?;
        if raw.is_null() {
            return Ok(None);
        }
        rowset_decode::to_decimal_scaled(raw, scale)
            .map(Some)
            .map_err(|e| CursorError::decode(ordinal, e))
    }

    // ---- Temporal ----

    /// Text cell of a temporal column; `None` for NULL.
    fn temporal_text(&mut self, ordinal: usize, target: &'static str) -> Result<Option<String>, CursorError> {
        match self.column(ordinal)? {
            RawValue::Null => Ok(None),
            RawValue::Text(text) => Ok(Some(text.clone())),
            other => Err(CursorError::mismatch(ordinal, other, target)),
        }
    }

    pub fn get_date(&mut self, ordinal: usize) -> Result<Option<DateValue>, CursorError> {
        let zone = self.options.zone;
        self.get_date_in(ordinal, &zone)
    }

    pub fn get_date_in<Tz: TimeZone>(&mut self, ordinal: usize, tz: &Tz) -> Result<Option<DateValue>, CursorError> {
        let Some(text) = self.temporal_text(ordinal, "Date")? else {
            return Ok(None);
        };
        parse_date(&text, tz)
            .map(Some)
            .map_err(|e| CursorError::decode(ordinal, e))
    }

    pub fn get_time(&mut self, ordinal: usize) -> Result<Option<TimeValue>, CursorError> {
        let zone = self.options.zone;
        self.get_time_in(ordinal, &zone)
    }

    pub fn get_time_in<Tz: TimeZone>(&mut self, ordinal: usize, tz: &Tz) -> Result<Option<TimeValue>, CursorError> {
        let Some(text) = self.temporal_text(ordinal, "Time")? else {
            return Ok(None);
        };
        parse_time(&text, tz)
            .map(Some)
            .map_err(|e| CursorError::decode(ordinal, e))
    }

    pub fn get_timestamp(&mut self, ordinal: usize) -> Result<Option<TimestampValue>, CursorError> {
        let zone = self.options.zone;
        self.get_timestamp_in(ordinal, &zone)
    }

    /// Timestamp in `tz`. With [`EmbeddedZonePolicy::Honor`] a parseable
    /// offset suffix in the text takes precedence over `tz`.
    pub fn get_timestamp_in<Tz: TimeZone>(
        &mut self,
        ordinal: usize,
        tz: &Tz,
    ) -> Result<Option<TimestampValue>, CursorError> {
        let options = self.options;
        let Some(text) = self.temporal_text(ordinal, "Timestamp")? else {
            return Ok(None);
        };
        if options.null_text_is_null && text.eq_ignore_ascii_case("null") {
            self.set_was_null(true);
            return Ok(None);
        }

        let parsed = parse_timestamp(&text).map_err(|e| CursorError::decode(ordinal, e))?;
        let result = match (options.embedded_zone, parsed.timezone.is_some()) {
            (EmbeddedZonePolicy::Honor, true) => to_timestamp(&parsed, embedded_or(options.zone)),
            _ => to_timestamp(&parsed, fixed_zone(tz.clone())),
        };
        result.map(Some).map_err(|e| CursorError::decode(ordinal, e))
    }

    // ---- Declared-type dispatch ----

    /// Decode by the column's declared type. Undeclared shapes pass the
    /// wire tag through.
    pub fn get_decoded(&mut self, ordinal: usize) -> Result<Decoded, CursorError> {
        if self.column(ordinal)?.is_null() {
            return Ok(Decoded::Null);
        }
        let declared = self.catalog().declared_type(ordinal)?.clone();
        let decoded = match declared {
            DeclaredType::Boolean => Decoded::Bool(self.get_bool(ordinal)?),
            DeclaredType::UInt64 => self.get_decimal(ordinal)?.map_or(Decoded::Null, Decoded::Decimal),
            ty if ty.is_integer() => Decoded::Int(self.get_i64(ordinal)?),
            DeclaredType::Float32 | DeclaredType::Float64 => Decoded::Float(self.get_f64(ordinal)?),
            DeclaredType::Decimal { .. } => self.get_decimal(ordinal)?.map_or(Decoded::Null, Decoded::Decimal),
            DeclaredType::String => self.get_string(ordinal)?.map_or(Decoded::Null, Decoded::Text),
            DeclaredType::Binary => self.get_bytes(ordinal)?.map_or(Decoded::Null, Decoded::Bytes),
            DeclaredType::Date => self.get_date(ordinal)?.map_or(Decoded::Null, Decoded::Date),
            DeclaredType::Time => self.get_time(ordinal)?.map_or(Decoded::Null, Decoded::Time),
            DeclaredType::Timestamp => self.get_timestamp(ordinal)?.map_or(Decoded::Null, Decoded::Timestamp),
            _ => match self.get_raw(ordinal)? {
                RawValue::Null => Decoded::Null,
                RawValue::Bool(b) => Decoded::Bool(b),
                RawValue::Int64(i) => Decoded::Int(i),
                RawValue::Float64(v) => Decoded::Float(v),
                RawValue::Text(s) => Decoded::Text(s),
                RawValue::Bytes(b) => Decoded::Bytes(b),
            },
        };
        Ok(decoded)
    }

    // ---- By name ----

    by_name! {
        get_raw_by_name => get_raw() -> RawValue;
        get_string_by_name => get_string() -> Option<String>;
        get_bool_by_name => get_bool() -> bool;
        get_bytes_by_name => get_bytes() -> Option<Vec<u8>>;
        get_i8_by_name => get_i8() -> i8;
        get_i16_by_name => get_i16() -> i16;
        get_i32_by_name => get_i32() -> i32;
        get_i64_by_name => get_i64() -> i64;
        get_f32_by_name => get_f32() -> f32;
        get_f64_by_name => get_f64() -> f64;
        get_decimal_by_name => get_decimal() -> Option<BigDecimal>;
        get_decimal_scaled_by_name => get_decimal_scaled(scale: i64) -> Option<BigDecimal>;
        get_date_by_name => get_date() -> Option<DateValue>;
        get_time_by_name => get_time() -> Option<TimeValue>;
        get_timestamp_by_name => get_timestamp() -> Option<TimestampValue>;
        get_decoded_by_name => get_decoded() -> Decoded;
    }

    pub fn get_date_in_by_name<Tz: TimeZone>(&mut self, name: &str, tz: &Tz) -> Result<Option<DateValue>, CursorError> {
        let ordinal = self.find_column(name)?;
        self.get_date_in(ordinal, tz)
    }

    pub fn get_time_in_by_name<Tz: TimeZone>(&mut self, name: &str, tz: &Tz) -> Result<Option<TimeValue>, CursorError> {
        let ordinal = self.find_column(name)?;
        self.get_time_in(ordinal, tz)
    }

    pub fn get_timestamp_in_by_name<Tz: TimeZone>(
        &mut self,
        name: &str,
        tz: &Tz,
    ) -> Result<Option<TimestampValue>, CursorError> {
        let ordinal = self.find_column(name)?;
        self.get_timestamp_in(ordinal, tz)
    }
}
