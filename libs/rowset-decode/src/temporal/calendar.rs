use chrono::{LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone};

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Days since 1970-01-01 in the proleptic Gregorian calendar.
///
/// Howard Hinnant's `days_from_civil`: valid for every year representable
/// in `i64` arithmetic, no 1582 cutover.
pub(crate) fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Epoch seconds of a local wall-clock time in `tz`.
///
/// Overlaps take the earlier instant. Gaps are read with the offset in force
/// before the transition, which pushes the wall time forward by the gap.
pub(crate) fn resolve_local<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> i64 {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        LocalResult::None => {
            let before = local.checked_sub_signed(TimeDelta::days(1)).unwrap_or(*local);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            local.and_utc().timestamp() - i64::from(offset.local_minus_utc())
        }
    }
}

/// Epoch seconds of 1901-01-01T00:00 local time in `tz`. Values below it take
/// the proleptic construction path.
pub(crate) fn modern_era_threshold<Tz: TimeZone>(tz: &Tz) -> i64 {
    match NaiveDate::from_ymd_opt(1901, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(start) => resolve_local(tz, &start),
        None => days_from_civil(1901, 1, 1) * SECONDS_PER_DAY,
    }
}

/// Explicit year/month/day construction for pre-modern dates.
///
/// Day numbering comes from `days_from_civil`; only the zone offset is looked
/// up, at the (historical) instant itself.
pub(crate) fn proleptic_epoch_seconds<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> i64 {
    use chrono::{Datelike, Timelike};

    let days = days_from_civil(i64::from(local.year()), local.month(), local.day());
    let wall = days * SECONDS_PER_DAY
        + i64::from(local.hour()) * 3600
        + i64::from(local.minute()) * 60
        + i64::from(local.second());
    let offset = tz.offset_from_utc_datetime(local).fix();
    wall - i64::from(offset.local_minus_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn days_from_civil_known_points() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2000, 3, 1), 11_017);
        assert_eq!(days_from_civil(1900, 1, 1), -25_567);
        // 1582-10-10 exists in the proleptic calendar (inside the Julian gap).
        assert_eq!(days_from_civil(1582, 10, 15) - days_from_civil(1582, 10, 10), 5);
    }

    #[test]
    fn days_from_civil_agrees_with_chrono() {
        for (y, m, d) in [(1, 1, 1), (1600, 2, 29), (1899, 12, 31), (2024, 2, 29), (-44, 3, 15)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            assert_eq!(days_from_civil(i64::from(y), m, d), (date - epoch).num_days());
        }
    }

    #[test]
    fn threshold_is_zone_relative() {
        let utc = modern_era_threshold(&Utc);
        assert_eq!(utc, -2_177_452_800);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(modern_era_threshold(&plus_two), utc - 7200);
    }

    #[test]
    fn fixed_offset_resolves_single_mapping() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(resolve_local(&tz, &local), local.and_utc().timestamp() + 5 * 3600);
    }
}
