//! Format conversions between float and fixed-point representations.
//!
//! All conversions honor the active rounding mode and report IEEE flags.
//! Out-of-range and NaN sources raise invalid and clamp to the fixed-point
//! range boundary (the maximum for NaN and positive overflow, the minimum
//! for negative overflow) rather than wrapping.

use crate::core::arch::fcsr::{fp_flags, RoundingMode};

use super::rounding::{double, single};

/// Smallest value strictly above the i64 range (2^63 is exact in f64).
const LONG_OVERFLOW: f64 = 9_223_372_036_854_775_808.0;

/// Rounds to an integral value under the given mode.
fn round_integral(x: f64, rm: RoundingMode) -> f64 {
    match rm {
        RoundingMode::Nearest => x.round_ties_even(),
        RoundingMode::TowardZero => x.trunc(),
        RoundingMode::TowardPositive => x.ceil(),
        RoundingMode::TowardNegative => x.floor(),
    }
}

/// Converts a double to a 32-bit fixed-point word.
pub fn double_to_word(x: f64, rm: RoundingMode) -> (i32, u8) {
    if x.is_nan() {
        return (i32::MAX, fp_flags::INVALID);
    }
    let rounded = round_integral(x, rm);
    if rounded > f64::from(i32::MAX) {
        return (i32::MAX, fp_flags::INVALID);
    }
    if rounded < f64::from(i32::MIN) {
        return (i32::MIN, fp_flags::INVALID);
    }
    let flags = if rounded == x { 0 } else { fp_flags::INEXACT };
    (rounded as i32, flags)
}

/// Converts a double to a 64-bit fixed-point long.
pub fn double_to_long(x: f64, rm: RoundingMode) -> (i64, u8) {
    if x.is_nan() {
        return (i64::MAX, fp_flags::INVALID);
    }
    let rounded = round_integral(x, rm);
    if rounded >= LONG_OVERFLOW {
        return (i64::MAX, fp_flags::INVALID);
    }
    if rounded < -LONG_OVERFLOW {
        return (i64::MIN, fp_flags::INVALID);
    }
    let flags = if rounded == x { 0 } else { fp_flags::INEXACT };
    (rounded as i64, flags)
}

/// Converts a single to a 32-bit fixed-point word.
#[inline]
pub fn single_to_word(x: f32, rm: RoundingMode) -> (i32, u8) {
    double_to_word(f64::from(x), rm)
}

/// Converts a single to a 64-bit fixed-point long.
#[inline]
pub fn single_to_long(x: f32, rm: RoundingMode) -> (i64, u8) {
    double_to_long(f64::from(x), rm)
}

/// Widens a single to a double. Exact apart from NaN screening.
pub fn single_to_double(x: f32) -> (f64, u8) {
    if single::is_snan(x) {
        return (double::qnan(), fp_flags::INVALID);
    }
    if x.is_nan() {
        return (double::qnan(), 0);
    }
    (f64::from(x), 0)
}

/// Narrows a double to a single under the given mode.
pub fn double_to_single(x: f64, rm: RoundingMode) -> (f32, u8) {
    if double::is_snan(x) {
        return (single::qnan(), fp_flags::INVALID);
    }
    if x.is_nan() {
        return (single::qnan(), 0);
    }
    let s = x as f32;
    if s.is_infinite() && x.is_finite() {
        // Nearest overflowed; directed modes saturate instead.
        let positive = x > 0.0;
        let value = match (rm, positive) {
            (RoundingMode::Nearest, true) => f32::INFINITY,
            (RoundingMode::Nearest, false) => f32::NEG_INFINITY,
            (RoundingMode::TowardZero, true) => f32::MAX,
            (RoundingMode::TowardZero, false) => f32::MIN,
            (RoundingMode::TowardPositive, true) => f32::INFINITY,
            (RoundingMode::TowardPositive, false) => f32::MIN,
            (RoundingMode::TowardNegative, true) => f32::MAX,
            (RoundingMode::TowardNegative, false) => f32::NEG_INFINITY,
        };
        return (value, fp_flags::OVERFLOW | fp_flags::INEXACT);
    }
    let err = {
        let back = f64::from(s);
        if x > back {
            1
        } else if x < back {
            -1
        } else {
            0
        }
    };
    single::finish(s, err, rm)
}

/// Converts a 32-bit fixed-point word to a single.
pub fn word_to_single(i: i32, rm: RoundingMode) -> (f32, u8) {
    // Exact in double; one rounding on the narrow step.
    double_to_single(f64::from(i), rm)
}

/// Converts a 32-bit fixed-point word to a double. Always exact.
pub fn word_to_double(i: i32) -> (f64, u8) {
    (f64::from(i), 0)
}

/// Converts a 64-bit fixed-point long to a double.
pub fn long_to_double(i: i64, rm: RoundingMode) -> (f64, u8) {
    let v = i as f64;
    let err = long_error_sign(i, v);
    double::finish(v, err, rm)
}

/// Converts a 64-bit fixed-point long to a single.
pub fn long_to_single(i: i64, rm: RoundingMode) -> (f32, u8) {
    let v = i as f64;
    let err = long_error_sign(i, v);
    // Nudging one double ulp in the error direction resolves any
    // narrow-step tie the same way the exact value would.
    let v = match err {
        1 => v.next_up(),
        -1 => v.next_down(),
        _ => v,
    };
    let (out, mut flags) = double_to_single(v, rm);
    if err != 0 {
        flags |= fp_flags::INEXACT;
    }
    (out, flags)
}

/// Sign of `i - round_to_nearest_double(i)` without widening past 64 bits.
fn long_error_sign(i: i64, v: f64) -> i8 {
    if v >= LONG_OVERFLOW {
        // i64::MAX rounded up to 2^63, which exceeds every i64.
        return -1;
    }
    let back = v as i64;
    if i > back {
        1
    } else if i < back {
        -1
    } else {
        0
    }
}
