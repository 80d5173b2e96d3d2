//! Numeric conversion helpers centralizing safe numeric casts and guarded division.

use num_traits::cast::cast;

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert u64 to i64, saturating at `i64::MAX`.
#[must_use]
pub fn u64_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Convert an integral, non-negative f64 to u64. Returns `None` for
/// fractional, negative, non-finite or out-of-range values.
#[must_use]
pub fn integral_f64_to_u64(value: f64) -> Option<u64> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 {
        return None;
    }
    cast::<f64, u64>(value)
}

/// Replace NaN and infinities with 0.0.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
#[must_use]
pub fn per(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    u64_to_f64(numerator) / u64_to_f64(denominator)
}

/// `numerator / denominator * 100`, or 0.0 when the denominator is zero.
#[must_use]
pub fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    u64_to_f64(numerator) / u64_to_f64(denominator) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_guards_zero_denominator() {
        assert!(per(10, 0).abs() < f64::EPSILON);
        assert!((per(12, 10) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn percent_guards_zero_denominator() {
        assert!(percent(700, 0).abs() < f64::EPSILON);
        assert!((percent(700, 1000) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn integral_conversion_rejects_fractions_and_negatives() {
        assert_eq!(integral_f64_to_u64(12.0), Some(12));
        assert_eq!(integral_f64_to_u64(12.5), None);
        assert_eq!(integral_f64_to_u64(-1.0), None);
        assert_eq!(integral_f64_to_u64(f64::NAN), None);
    }

    #[test]
    fn saturating_conversions_cover_ranges() {
        assert_eq!(u64_to_i64(u64::MAX), i64::MAX);
        assert_eq!(u64_to_i64(42), 42);
        assert!(finite_or_zero(f64::INFINITY).abs() < f64::EPSILON);
        assert!((i64_to_f64(-3) + 3.0).abs() < f64::EPSILON);
    }
}
