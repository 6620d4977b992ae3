//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Clamp a parsed i64 into the u32 range.
#[must_use]
pub fn clamp_i64_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Mean of `total` over `count`, rounded to one decimal place. Zero when `count` is zero.
#[must_use]
pub fn average_to_tenth(total: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let count = cast::<usize, f64>(count).unwrap_or(1.0);
    (u64_to_f64(total) / count * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i64_clamp_covers_ranges() {
        assert_eq!(clamp_i64_to_u32(-7), 0);
        assert_eq!(clamp_i64_to_u32(12), 12);
        assert_eq!(clamp_i64_to_u32(i64::MAX), u32::MAX);
    }

    #[test]
    fn averages_round_to_one_decimal() {
        assert!((average_to_tenth(10, 3) - 3.3).abs() < f64::EPSILON);
        assert!((average_to_tenth(5, 2) - 2.5).abs() < f64::EPSILON);
        assert!(average_to_tenth(9, 0).abs() < f64::EPSILON);
    }
}
