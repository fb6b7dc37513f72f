//! Missing-value sentinels and floating-point tolerances.
//!
//! In memory a missing value is always `None`; the sentinels below only
//! appear at the serialization boundary.

/// Missing value for floating-point variables.
pub const FP_MISSING_VALUE: f64 = -1.0E+34;

/// Missing value for integer variables.
pub const INT_MISSING_VALUE: i32 = -99;

/// Missing value for string variables.
pub const STRING_MISSING_VALUE: &str = "";

/// Missing value for single-character variables.
pub const CHAR_MISSING_VALUE: char = ' ';

/// Default relative tolerance for floating-point comparisons.
pub const MAX_RELATIVE_ERROR: f64 = 1.0E-6;

/// Default absolute tolerance for floating-point comparisons.
pub const MAX_ABSOLUTE_ERROR: f64 = 1.0E-6;

/// Returns true if two values are close enough to be considered equal.
///
/// NaN only matches NaN and an infinity only matches the same infinity.
/// Otherwise `|a - b| < |(a + b) / 2| * rtol + atol`.
pub fn close_to(first: f64, second: f64, rtol: f64, atol: f64) -> bool {
    if first.is_nan() {
        return second.is_nan();
    }
    if second.is_nan() {
        return false;
    }
    if first.is_infinite() || second.is_infinite() {
        return first == second;
    }
    if first == second {
        return true;
    }
    let allowed = ((first + second) * 0.5).abs() * rtol + atol;
    (first - second).abs() < allowed
}

/// Like [`close_to`], but also matches longitudes that differ by 360 degrees.
pub fn longitude_close_to(first: f64, second: f64, rtol: f64, atol: f64) -> bool {
    close_to(first, second, rtol, atol)
        || close_to(first + 360.0, second, rtol, atol)
        || close_to(first, second + 360.0, rtol, atol)
}

/// Returns true if a serialized double represents a missing value.
pub fn is_fp_missing(value: f64) -> bool {
    !value.is_finite() || close_to(value, FP_MISSING_VALUE, MAX_RELATIVE_ERROR, MAX_ABSOLUTE_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_and_infinity() {
        assert!(close_to(f64::NAN, f64::NAN, 0.0, 0.0));
        assert!(!close_to(f64::NAN, 1.0, 1.0, 1.0));
        assert!(!close_to(1.0, f64::NAN, 1.0, 1.0));
        assert!(close_to(f64::INFINITY, f64::INFINITY, 0.0, 0.0));
        assert!(!close_to(f64::INFINITY, f64::NEG_INFINITY, 1.0, 1.0));
        assert!(!close_to(f64::INFINITY, 1.0e300, 1.0, 1.0));
    }

    #[test]
    fn tolerances() {
        assert!(close_to(1000.0, 1000.0005, MAX_RELATIVE_ERROR, MAX_ABSOLUTE_ERROR));
        assert!(!close_to(1000.0, 1000.01, MAX_RELATIVE_ERROR, MAX_ABSOLUTE_ERROR));
        assert!(close_to(0.0, 5.0e-7, 0.0, MAX_ABSOLUTE_ERROR));
    }

    #[test]
    fn longitude_wraps() {
        assert!(longitude_close_to(-179.9995, 180.0005, 0.0, 0.001));
        assert!(longitude_close_to(359.0, -1.0, 0.0, 1.0e-6));
        assert!(!longitude_close_to(10.0, 11.0, 0.0, 0.001));
    }

    #[test]
    fn fp_missing() {
        assert!(is_fp_missing(FP_MISSING_VALUE));
        assert!(is_fp_missing(f64::NAN));
        assert!(!is_fp_missing(-99.0));
    }
}
