use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use rowset_api::RawValue;

use crate::error::DecodeError;

// ═══════════════════════════════════════════════════════════════
//  Fixed-width numbers
// ═══════════════════════════════════════════════════════════════

/// A fixed-width numeric accessor target.
///
/// Native numeric tags narrow with `as` semantics (truncation, no overflow
/// check); text is parsed in the target's own lexical grammar, so `"300"`
/// is rejected for `i8` while `Int64(300)` wraps.
pub trait NumericTarget: Sized + Copy + Default + FromStr {
    const NAME: &'static str;

    fn from_i64(v: i64) -> Self;
    fn from_f64(v: f64) -> Self;
}

macro_rules! numeric_target {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl NumericTarget for $ty {
                const NAME: &'static str = $name;

                fn from_i64(v: i64) -> Self {
                    v as $ty
                }

                fn from_f64(v: f64) -> Self {
                    v as $ty
                }
            }
        )*
    };
}

numeric_target! {
    i8 => "Int8",
    i16 => "Int16",
    i32 => "Int32",
    i64 => "Int64",
    f32 => "Float32",
    f64 => "Float64",
}

/// Convert a wire value to `T`. `Null` yields `T::default()`.
pub fn to_number<T: NumericTarget>(raw: &RawValue) -> Result<T, DecodeError> {
    match raw {
        RawValue::Null => Ok(T::default()),
        RawValue::Int64(v) => Ok(T::from_i64(*v)),
        RawValue::Float64(v) => Ok(T::from_f64(*v)),
        RawValue::Text(s) => s.parse().map_err(|_| DecodeError::mismatch(s.as_str(), T::NAME)),
        other => Err(DecodeError::mismatch(other.to_string(), T::NAME)),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Arbitrary precision
// ═══════════════════════════════════════════════════════════════

/// `[+-]? (digits ["." digits*] | "." digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(text: &str) -> bool {
    let b = text.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < b.len() && matches!(b[i], b'e' | b'E') {
        i += 1;
        if i < b.len() && matches!(b[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}

/// Parse a decimal literal (optional sign, fraction and exponent).
pub fn parse_decimal(text: &str) -> Result<BigDecimal, DecodeError> {
    if !is_decimal_literal(text) {
        return Err(DecodeError::mismatch(text, "Decimal"));
    }
    BigDecimal::from_str(text).map_err(|_| DecodeError::mismatch(text, "Decimal"))
}

/// Convert a wire value to an unscaled decimal. `Null` yields zero.
///
/// Floats go through their shortest round-trip text form, so `0.1` stays
/// `0.1` instead of its binary expansion.
pub fn to_decimal(raw: &RawValue) -> Result<BigDecimal, DecodeError> {
    match raw {
        RawValue::Null => Ok(BigDecimal::default()),
        RawValue::Int64(v) => Ok(BigDecimal::from(*v)),
        RawValue::Float64(v) if v.is_finite() => parse_decimal(&v.to_string()),
        RawValue::Text(s) => parse_decimal(s),
        other => Err(DecodeError::mismatch(other.to_string(), "Decimal")),
    }
}

/// Upper bound on the digits a rescaled decimal may expand to.
pub const MAX_SCALED_DIGITS: i64 = 1_000;

/// Legacy fixed-scale variant: `to_decimal` then round half-up to `scale`
/// fractional digits. Prefer `to_decimal` and round at the call site.
///
/// A value that would need more than [`MAX_SCALED_DIGITS`] digits at the
/// requested scale (e.g. `1e2000000000` at scale 2) is rejected.
/// Magnitudes far below the requested scale collapse to zero directly.
pub fn to_decimal_scaled(raw: &RawValue, scale: i64) -> Result<BigDecimal, DecodeError> {
    let d = to_decimal(raw)?;
    let (_, current) = d.as_bigint_and_exponent();
    let digits = i64::try_from(d.digits()).unwrap_or(i64::MAX);
    if digits.saturating_add(scale.saturating_sub(current)) > MAX_SCALED_DIGITS {
        return Err(DecodeError::mismatch(raw.to_string(), "Decimal"));
    }
    // Below a tenth of the last kept digit: rounds to zero.
    if current.saturating_sub(scale) > digits {
        return Ok(BigDecimal::new(Default::default(), scale));
    }
    Ok(d.with_scale_round(scale, RoundingMode::HalfUp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_tags_narrow_without_parsing() {
        assert_eq!(to_number::<i64>(&RawValue::Int64(42)).unwrap(), 42);
        assert_eq!(to_number::<i8>(&RawValue::Int64(300)).unwrap(), 44);
        assert_eq!(to_number::<i32>(&RawValue::Float64(3.99)).unwrap(), 3);
        assert_eq!(to_number::<f32>(&RawValue::Int64(7)).unwrap(), 7.0);
    }

    #[test]
    fn text_falls_back_to_parse() {
        assert_eq!(to_number::<i32>(&RawValue::from("-17")).unwrap(), -17);
        assert_eq!(to_number::<f64>(&RawValue::from("2.5e3")).unwrap(), 2500.0);
        assert_eq!(to_number::<i16>(&RawValue::from("32767")).unwrap(), i16::MAX);
    }

    #[test]
    fn text_parse_failure_is_mismatch() {
        let err = to_number::<i64>(&RawValue::from("abc")).unwrap_err();
        assert_eq!(err, DecodeError::Mismatch { text: "abc".into(), target: "Int64" });
        assert!(to_number::<i8>(&RawValue::from("300")).is_err());
        assert!(to_number::<i32>(&RawValue::from("1.5")).is_err());
    }

    #[test]
    fn bool_and_bytes_are_not_numbers() {
        assert!(to_number::<i32>(&RawValue::Bool(true)).is_err());
        assert!(to_number::<f64>(&RawValue::Bytes(vec![1])).is_err());
    }

    #[test]
    fn null_is_zero() {
        assert_eq!(to_number::<i64>(&RawValue::Null).unwrap(), 0);
        assert_eq!(to_decimal(&RawValue::Null).unwrap(), BigDecimal::from(0));
    }

    #[test]
    fn decimal_literals() {
        for ok in ["0", "-1.50", "+3", ".5", "5.", "1e10", "1.5E-3", "123456789012345678901234567890.123"] {
            assert!(parse_decimal(ok).is_ok(), "{ok}");
        }
        for bad in ["", "-", ".", "1e", "1_000", "1.2.3", " 1", "abc", "NaN", "1e+"] {
            assert!(parse_decimal(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn decimal_from_each_tag() {
        assert_eq!(to_decimal(&RawValue::Int64(-5)).unwrap(), BigDecimal::from(-5));
        assert_eq!(to_decimal(&RawValue::Float64(0.1)).unwrap(), BigDecimal::from_str("0.1").unwrap());
        assert!(to_decimal(&RawValue::Float64(f64::NAN)).is_err());
        assert!(to_decimal(&RawValue::Bool(false)).is_err());
    }

    #[test]
    fn scaled_decimal_rounds_half_up() {
        let d = to_decimal_scaled(&RawValue::from("2.345"), 2).unwrap();
        assert_eq!(d.to_string(), "2.35");
        let d = to_decimal_scaled(&RawValue::from("-2.345"), 2).unwrap();
        assert_eq!(d.to_string(), "-2.35");
        let d = to_decimal_scaled(&RawValue::from("7"), 3).unwrap();
        assert_eq!(d.to_string(), "7.000");
    }

    #[test]
    fn scaled_decimal_bounds_expansion() {
        let huge = RawValue::from("1e2000000000");
        assert!(to_decimal(&huge).is_ok());
        assert!(matches!(
            to_decimal_scaled(&huge, 2),
            Err(DecodeError::Mismatch { target: "Decimal", .. })
        ));
        assert!(to_decimal_scaled(&RawValue::from("1"), i64::MAX).is_err());
        let d = to_decimal_scaled(&RawValue::from("1e-2000000000"), 2).unwrap();
        assert_eq!(d.to_string(), "0.00");
    }
}
