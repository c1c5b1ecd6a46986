//! Date, time and timestamp literals.
//!
//! Wire grammar (numeric fields need no zero padding):
//!
//! ```text
//! date      := year "-" month "-" day
//! time      := hour ":" minute ":" second ["." fraction]
//! timestamp := date [" " hour ":" minute [":" second ["." fraction]]] [ws zone]
//! ```
//!
//! Fractions are normalized to picoseconds (12 digits) and then rounded
//! half-away-from-zero to nanoseconds. A fraction that rounds up to a full
//! second carries into the seconds field for both times and timestamps.

mod calendar;
mod scan;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};

use crate::error::{DecodeError, TemporalKind};
use calendar::{modern_era_threshold, proleptic_epoch_seconds, resolve_local};
use scan::Scanner;

pub const MAX_DATETIME_PRECISION: u32 = 12;
const NANOS_PRECISION: u32 = 9;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

const POWERS_OF_TEN: [i64; 13] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
];

// ═══════════════════════════════════════════════════════════════
//  Precision
// ═══════════════════════════════════════════════════════════════

/// Change the number of fractional digits `value` is expressed in.
///
/// Upscaling multiplies exactly; downscaling divides rounding half away from
/// zero. Fails for negative values, precisions above 12, or overflow.
pub fn rescale(value: i64, from: u32, to: u32) -> Result<i64, DecodeError> {
    let err = || DecodeError::Precision { value, from, to };
    if value < 0 || from > MAX_DATETIME_PRECISION || to > MAX_DATETIME_PRECISION {
        return Err(err());
    }
    if from <= to {
        value.checked_mul(POWERS_OF_TEN[(to - from) as usize]).ok_or_else(err)
    } else {
        let divisor = POWERS_OF_TEN[(from - to) as usize];
        Ok(value / divisor + i64::from(value % divisor >= divisor / 2))
    }
}

/// Picoseconds → `(carry_seconds, nanoseconds)`.
fn picos_to_nanos(picos: i64) -> Result<(i64, u32), DecodeError> {
    let nanos = rescale(picos, MAX_DATETIME_PRECISION, NANOS_PRECISION)?;
    if nanos >= NANOS_PER_SECOND {
        Ok((1, (nanos - NANOS_PER_SECOND) as u32))
    } else {
        Ok((0, nanos as u32))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Output values
// ═══════════════════════════════════════════════════════════════

/// Which calendar computation produced an epoch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPath {
    /// Zone-aware wall-clock resolution, on or after 1901-01-01.
    ModernEra,
    /// Explicit proleptic Gregorian construction, before 1901-01-01.
    Proleptic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue {
    pub date: NaiveDate,
    /// Midnight of `date` in the requested zone.
    pub epoch_millis: i64,
    pub calendar: CalendarPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
    /// The time of day on 1970-01-01 in the requested zone.
    pub epoch_millis: i64,
}

impl TimeValue {
    pub fn to_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_nano_opt(self.hour, self.minute, self.second, self.nanosecond)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampValue {
    pub epoch_seconds: i64,
    pub nanosecond: u32,
    pub calendar: CalendarPath,
}

impl TimestampValue {
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_seconds * 1000 + i64::from(self.nanosecond / 1_000_000)
    }

    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.epoch_seconds, self.nanosecond)
    }
}

/// Structured fields of a timestamp literal, before zone resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// `0..=999_999_999_999`.
    pub picos: i64,
    /// Raw zone suffix, whitespace-separated from the date-time.
    pub timezone: Option<String>,
}

impl std::fmt::Display for ParsedTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:012}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.picos
        )?;
        if let Some(tz) = &self.timezone {
            write!(f, " {tz}")?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Grammar
// ═══════════════════════════════════════════════════════════════

fn scan_date(s: &mut Scanner<'_>) -> Option<(i32, u32, u32)> {
    let negative = s.eat(b'-');
    if !negative {
        s.eat(b'+');
    }
    let year: i32 = s.digits(4, usize::MAX)?.parse().ok()?;
    let year = if negative { -year } else { year };
    if !s.eat(b'-') {
        return None;
    }
    let month = s.field()?;
    if !s.eat(b'-') {
        return None;
    }
    let day = s.field()?;
    Some((year, month, day))
}

/// `"." fraction` → picoseconds. `Err` when present but longer than 12 digits.
fn scan_fraction(s: &mut Scanner<'_>) -> Result<i64, &'static str> {
    let start = s.pos();
    if !s.eat(b'.') {
        return Ok(0);
    }
    let Some(digits) = s.digits(1, usize::MAX) else {
        s.reset(start);
        return Ok(0);
    };
    if digits.len() > MAX_DATETIME_PRECISION as usize {
        return Err("fractional second exceeds 12 digits");
    }
    let value: i64 = digits.parse().map_err(|_| "invalid fractional second")?;
    rescale(value, digits.len() as u32, MAX_DATETIME_PRECISION)
        .map_err(|_| "invalid fractional second")
}

fn date_from_fields(year: i32, month: u32, day: u32) -> Result<NaiveDate, &'static str> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or("day out of range")
}

fn time_from_fields(hour: u32, minute: u32, second: u32) -> Result<NaiveTime, &'static str> {
    if hour > 23 || minute > 59 || second > 59 {
        return Err("field out of range");
    }
    NaiveTime::from_hms_opt(hour, minute, second).ok_or("field out of range")
}

// ═══════════════════════════════════════════════════════════════
//  Time
// ═══════════════════════════════════════════════════════════════

/// Parse `HH:MM:SS[.fraction]` and place it on 1970-01-01 in `tz`.
pub fn parse_time<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<TimeValue, DecodeError> {
    let malformed = |reason| DecodeError::temporal(TemporalKind::Time, text, reason);

    let mut s = Scanner::new(text);
    let hour = s.field().ok_or_else(|| malformed("expected hour"))?;
    let minute = (s.eat(b':').then(|| s.field()).flatten()).ok_or_else(|| malformed("expected minute"))?;
    let second = (s.eat(b':').then(|| s.field()).flatten()).ok_or_else(|| malformed("expected second"))?;
    let picos = scan_fraction(&mut s).map_err(malformed)?;
    if !s.is_done() {
        return Err(malformed("trailing characters"));
    }

    let time = time_from_fields(hour, minute, second).map_err(malformed)?;
    let (carry, nanosecond) = picos_to_nanos(picos)?;
    let (time, _) = time.overflowing_add_signed(TimeDelta::seconds(carry));
    let time = time.with_nanosecond(nanosecond).ok_or_else(|| malformed("field out of range"))?;

    let local = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| malformed("field out of range"))?
        .and_time(time);
    let epoch_millis = resolve_local(tz, &local) * 1000 + i64::from(nanosecond / 1_000_000);

    Ok(TimeValue {
        hour: time.hour(),
        minute: time.minute(),
        second: time.second(),
        nanosecond,
        epoch_millis,
    })
}

// ═══════════════════════════════════════════════════════════════
//  Date
// ═══════════════════════════════════════════════════════════════

/// Parse `YYYY-MM-DD` to midnight in `tz`.
///
/// Dates before 1901-01-01 are rebuilt field by field on the proleptic
/// Gregorian calendar so day numbering never depends on a historical
/// calendar switch.
pub fn parse_date<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<DateValue, DecodeError> {
    let malformed = |reason| DecodeError::temporal(TemporalKind::Date, text, reason);

    let mut s = Scanner::new(text);
    let (year, month, day) = scan_date(&mut s).ok_or_else(|| malformed("expected YYYY-MM-DD"))?;
    if !s.is_done() {
        return Err(malformed("trailing characters"));
    }
    let date = date_from_fields(year, month, day).map_err(malformed)?;
    let midnight = date.and_time(NaiveTime::MIN);

    let fast = resolve_local(tz, &midnight);
    let (seconds, calendar) = if fast >= modern_era_threshold(tz) {
        (fast, CalendarPath::ModernEra)
    } else {
        (proleptic_epoch_seconds(tz, &midnight), CalendarPath::Proleptic)
    };

    Ok(DateValue {
        date,
        epoch_millis: seconds * 1000,
        calendar,
    })
}

// ═══════════════════════════════════════════════════════════════
//  Timestamp
// ═══════════════════════════════════════════════════════════════

/// Grammar-only parse: no zone resolution, no calendar validation.
pub fn parse_timestamp(text: &str) -> Result<ParsedTimestamp, DecodeError> {
    let malformed = |reason| DecodeError::temporal(TemporalKind::Timestamp, text, reason);

    let mut s = Scanner::new(text);
    let (year, month, day) = scan_date(&mut s).ok_or_else(|| malformed("expected YYYY-MM-DD"))?;

    let mut hour = 0;
    let mut minute = 0;
    let mut second = 0;
    let mut picos = 0;

    let after_date = s.pos();
    if let Some((h, m)) = scan_hour_minute(&mut s) {
        hour = h;
        minute = m;
        let before_second = s.pos();
        match s.eat(b':').then(|| s.field()).flatten() {
            Some(sec) => {
                second = sec;
                picos = scan_fraction(&mut s).map_err(malformed)?;
            }
            None => s.reset(before_second),
        }
    } else {
        s.reset(after_date);
    }

    s.skip_whitespace();
    let timezone = (!s.is_done()).then(|| s.rest().to_string());

    Ok(ParsedTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
        picos,
        timezone,
    })
}

fn scan_hour_minute(s: &mut Scanner<'_>) -> Option<(u32, u32)> {
    if !s.eat(b' ') {
        return None;
    }
    let hour = s.field()?;
    if !s.eat(b':') {
        return None;
    }
    Some((hour, s.field()?))
}

/// Resolve parsed fields to an instant.
///
/// `resolve_zone` receives the embedded zone text (if any) and picks the
/// effective zone: see [`fixed_zone`] and [`embedded_or`].
pub fn to_timestamp<Tz, F>(parsed: &ParsedTimestamp, resolve_zone: F) -> Result<TimestampValue, DecodeError>
where
    Tz: TimeZone,
    F: FnOnce(Option<&str>) -> Result<Tz, DecodeError>,
{
    let malformed = |reason| DecodeError::temporal(TemporalKind::Timestamp, &parsed.to_string(), reason);

    let date = date_from_fields(parsed.year, parsed.month, parsed.day).map_err(malformed)?;
    let time = time_from_fields(parsed.hour, parsed.minute, parsed.second).map_err(malformed)?;
    let tz = resolve_zone(parsed.timezone.as_deref())?;
    let local = NaiveDateTime::new(date, time);

    let mut epoch_seconds = resolve_local(&tz, &local);
    let mut calendar = CalendarPath::ModernEra;
    if epoch_seconds < modern_era_threshold(&tz) {
        epoch_seconds = proleptic_epoch_seconds(&tz, &local);
        calendar = CalendarPath::Proleptic;
    }

    let (carry, nanosecond) = picos_to_nanos(parsed.picos)?;
    Ok(TimestampValue {
        epoch_seconds: epoch_seconds + carry,
        nanosecond,
        calendar,
    })
}

/// Parse a timestamp in a fixed zone; an embedded zone suffix is malformed.
pub fn parse_timestamp_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<TimestampValue, DecodeError> {
    let parsed = parse_timestamp(text)?;
    to_timestamp(&parsed, fixed_zone(tz.clone()))
}

// ═══════════════════════════════════════════════════════════════
//  Zone resolvers
// ═══════════════════════════════════════════════════════════════

/// Always `tz`; rejects literals that carry their own zone.
pub fn fixed_zone<Tz: TimeZone>(tz: Tz) -> impl FnOnce(Option<&str>) -> Result<Tz, DecodeError> {
    move |embedded| match embedded {
        Some(text) => Err(DecodeError::temporal(TemporalKind::Timestamp, text, "unexpected time zone")),
        None => Ok(tz),
    }
}

/// The embedded offset when present, `default` otherwise.
pub fn embedded_or(default: FixedOffset) -> impl FnOnce(Option<&str>) -> Result<FixedOffset, DecodeError> {
    move |embedded| match embedded {
        Some(text) => parse_offset(text)
            .ok_or_else(|| DecodeError::temporal(TemporalKind::TimeZone, text, "unrecognized offset")),
        None => Ok(default),
    }
}

/// Parse `Z`, `UTC`, `GMT`, `±HH`, `±HHMM`, `±HH:MM`, optionally prefixed by
/// `UTC`/`GMT` (e.g. `UTC+08:00`).
pub fn parse_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    let upper = text.to_ascii_uppercase();
    let body = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);
    if body.is_empty() || body == "Z" {
        return FixedOffset::east_opt(0);
    }

    let mut s = Scanner::new(body);
    let sign = if s.eat(b'+') {
        1
    } else if s.eat(b'-') {
        -1
    } else {
        return None;
    };
    let hours: i32 = s.digits(2, 2)?.parse().ok()?;
    s.eat(b':');
    let minutes: i32 = match s.digits(2, 2) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if !s.is_done() || hours > 18 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_seconds(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
            .and_utc()
            .timestamp()
    }

    #[test]
    fn rescale_up_and_down() {
        assert_eq!(rescale(5, 1, 3).unwrap(), 500);
        assert_eq!(rescale(650, 3, 1).unwrap(), 7);
        assert_eq!(rescale(649, 3, 1).unwrap(), 6);
        assert_eq!(rescale(42, 4, 4).unwrap(), 42);
        assert_eq!(rescale(i64::MAX, 12, 0).unwrap(), 9_223_372);
        assert_eq!(rescale(i64::MAX - 1, 1, 0).unwrap(), i64::MAX / 10 + 1);
    }

    #[test]
    fn rescale_round_trips_without_rounding() {
        for v in [0i64, 1, 7, 123, 999_999] {
            for a in 0..=6u32 {
                for b in a..=12u32 {
                    let up = rescale(v, a, b).unwrap();
                    assert_eq!(rescale(up, b, a).unwrap(), v, "v={v} a={a} b={b}");
                }
            }
        }
    }

    #[test]
    fn rescale_rejects_preconditions() {
        assert!(matches!(rescale(-1, 0, 3), Err(DecodeError::Precision { .. })));
        assert!(matches!(rescale(1, 0, 13), Err(DecodeError::Precision { .. })));
        assert!(matches!(rescale(1, 13, 0), Err(DecodeError::Precision { .. })));
        assert!(matches!(rescale(i64::MAX, 0, 12), Err(DecodeError::Precision { .. })));
    }

    #[test]
    fn time_with_fraction() {
        let t = parse_time("13:05:07.123", &Utc).unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.nanosecond), (13, 5, 7, 123_000_000));
        assert_eq!(t.epoch_millis, (13 * 3600 + 5 * 60 + 7) * 1000 + 123);
    }

    #[test]
    fn time_unpadded_fields_and_zone() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let t = parse_time("1:2:3", &tz).unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.nanosecond), (1, 2, 3, 0));
        assert_eq!(t.epoch_millis, (3600 + 120 + 3 - 3600) * 1000);
    }

    #[test]
    fn time_fraction_rounds_and_carries() {
        let t = parse_time("10:00:00.0000000005", &Utc).unwrap();
        assert_eq!(t.nanosecond, 1);
        let t = parse_time("10:00:59.9999999996", &Utc).unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.nanosecond), (10, 1, 0, 0));
        let t = parse_time("23:59:59.9999999999", &Utc).unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.nanosecond), (0, 0, 0, 0));
    }

    #[test]
    fn time_rejects_out_of_range_and_garbage() {
        for bad in ["24:00:00", "12:60:00", "12:00:60", "12:00", "12:00:00x", "ab:cd:ef", "12:00:00.1234567890123"] {
            assert!(
                matches!(parse_time(bad, &Utc), Err(DecodeError::MalformedTemporal { kind: TemporalKind::Time, .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn date_modern_era() {
        let d = parse_date("2024-03-05", &Utc).unwrap();
        assert_eq!(d.calendar, CalendarPath::ModernEra);
        assert_eq!(d.epoch_millis, utc_seconds(2024, 3, 5, 0, 0, 0) * 1000);
        assert_eq!(parse_date("2024-3-5", &Utc).unwrap().date, d.date);
    }

    #[test]
    fn date_before_1901_takes_proleptic_path() {
        let d = parse_date("1899-12-31", &Utc).unwrap();
        assert_eq!(d.calendar, CalendarPath::Proleptic);
        assert_eq!(d.epoch_millis, -2_209_075_200_000);
        let expected = calendar::days_from_civil(1899, 12, 31) * calendar::SECONDS_PER_DAY * 1000;
        assert_eq!(d.epoch_millis, expected);
    }

    #[test]
    fn date_in_offset_zone() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let d = parse_date("1970-01-02", &tz).unwrap();
        assert_eq!(d.epoch_millis, (86_400 - 8 * 3600) * 1000);
        let d = parse_date("1500-06-01", &tz).unwrap();
        assert_eq!(d.calendar, CalendarPath::Proleptic);
        assert_eq!(d.epoch_millis, (utc_seconds(1500, 6, 1, 0, 0, 0) - 8 * 3600) * 1000);
    }

    #[test]
    fn date_rejects_malformed() {
        for bad in ["2024-02-30", "24-01-01", "2024/01/01", "2024-01-01 00:00:00", ""] {
            assert!(parse_date(bad, &Utc).is_err(), "{bad}");
        }
    }

    #[test]
    fn timestamp_with_fraction_in_utc() {
        let parsed = parse_timestamp("2024-03-05 10:00:00.5").unwrap();
        assert_eq!(parsed.picos, 500_000_000_000);
        assert_eq!(parsed.timezone, None);
        let ts = to_timestamp(&parsed, fixed_zone(Utc)).unwrap();
        assert_eq!(ts.epoch_seconds, utc_seconds(2024, 3, 5, 10, 0, 0));
        assert_eq!(ts.nanosecond, 500_000_000);
        assert_eq!(ts.epoch_millis(), utc_seconds(2024, 3, 5, 10, 0, 0) * 1000 + 500);
    }

    #[test]
    fn timestamp_optional_parts() {
        let p = parse_timestamp("2024-03-05").unwrap();
        assert_eq!((p.hour, p.minute, p.second, p.picos), (0, 0, 0, 0));
        let p = parse_timestamp("2024-03-05 7:8").unwrap();
        assert_eq!((p.hour, p.minute, p.second), (7, 8, 0));
        assert_eq!(p.timezone, None);
    }

    #[test]
    fn timestamp_zone_suffix() {
        let p = parse_timestamp("2024-03-05 10:00:00 +08:00").unwrap();
        assert_eq!(p.timezone.as_deref(), Some("+08:00"));
        assert!(to_timestamp(&p, fixed_zone(Utc)).is_err());

        let ts = to_timestamp(&p, embedded_or(FixedOffset::east_opt(0).unwrap())).unwrap();
        assert_eq!(ts.epoch_seconds, utc_seconds(2024, 3, 5, 2, 0, 0));

        let p = parse_timestamp("2024-03-05Z").unwrap();
        assert_eq!(p.timezone.as_deref(), Some("Z"));
    }

    #[test]
    fn timestamp_rounding_carries_into_seconds() {
        let p = parse_timestamp("2024-03-05 10:00:00.9999999996").unwrap();
        let ts = to_timestamp(&p, fixed_zone(Utc)).unwrap();
        assert_eq!(ts.epoch_seconds, utc_seconds(2024, 3, 5, 10, 0, 1));
        assert_eq!(ts.nanosecond, 0);
    }

    #[test]
    fn timestamp_before_1901_takes_proleptic_path() {
        let ts = parse_timestamp_in("1800-07-04 12:30:00", &Utc).unwrap();
        assert_eq!(ts.calendar, CalendarPath::Proleptic);
        assert_eq!(ts.epoch_seconds, utc_seconds(1800, 7, 4, 12, 30, 0));
        let ts = parse_timestamp_in("1901-01-01 00:00:00", &Utc).unwrap();
        assert_eq!(ts.calendar, CalendarPath::ModernEra);
    }

    #[test]
    fn timestamp_validation_happens_on_conversion() {
        let p = parse_timestamp("2024-13-01 00:00:00").unwrap();
        assert!(matches!(
            to_timestamp(&p, fixed_zone(Utc)),
            Err(DecodeError::MalformedTemporal { kind: TemporalKind::Timestamp, .. })
        ));
        assert!(parse_timestamp("not a timestamp").is_err());
        assert!(parse_timestamp("2024-01-01 00:00:00.1234567890123").is_err());
    }

    #[test]
    fn offsets() {
        assert_eq!(parse_offset("Z"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("utc"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("+08:00"), FixedOffset::east_opt(8 * 3600));
        assert_eq!(parse_offset("-0530"), FixedOffset::west_opt(5 * 3600 + 30 * 60));
        assert_eq!(parse_offset("GMT+03"), FixedOffset::east_opt(3 * 3600));
        assert_eq!(parse_offset("Europe/Paris"), None);
        assert_eq!(parse_offset("+25:00"), None);
    }
}
