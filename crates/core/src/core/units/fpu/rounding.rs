//! Correctly rounded scalar arithmetic under all four rounding modes.
//!
//! The host rounds to nearest-even only, so each operation is computed in
//! round-to-nearest first and then nudged by one representable step when the
//! active mode disagrees. The nudge direction comes from the sign of the
//! exact residual:
//! 1. **Add/sub:** Knuth two-sum recovers the error term exactly.
//! 2. **Mul:** `fma(a, b, -p)` is the product error exactly.
//! 3. **Div/sqrt:** `fma(q, b, -a)` and `fma(s, s, -a)` give sign-faithful
//!    residuals, which is all the adjustment needs.
//!
//! The round-to-nearest result is always within half an ulp of the exact
//! value, so every directed mode lands on the same float or an adjacent one.
//!
//! Each function returns the result together with raised IEEE exception
//! flags in [`fp_flags`] encoding. Signaling NaN operands raise invalid and
//! produce the canonical quiet NaN; quiet NaNs propagate canonically.

use crate::core::arch::fcsr::{fp_flags, RoundingMode};

macro_rules! define_float_ops {
    ($modname:ident, $f:ty, $u:ty, $quiet_bit:expr, $canonical:expr) => {
        pub mod $modname {
            use super::*;

            /// Canonical quiet NaN for this width.
            pub const CANONICAL_QNAN: $u = $canonical;

            /// Returns the canonical quiet NaN.
            #[inline]
            pub fn qnan() -> $f {
                <$f>::from_bits(CANONICAL_QNAN)
            }

            /// True for a signaling NaN (quiet bit clear).
            #[inline]
            pub fn is_snan(x: $f) -> bool {
                x.is_nan() && x.to_bits() & $quiet_bit == 0
            }

            /// Sign of an error term as -1, 0, or +1.
            #[inline]
            fn err_sign(err: $f) -> i8 {
                if err > 0.0 {
                    1
                } else if err < 0.0 {
                    -1
                } else {
                    0
                }
            }

            /// NaN screening shared by the two-operand entry points.
            fn nan_case(a: $f, b: $f) -> Option<($f, u8)> {
                if is_snan(a) || is_snan(b) {
                    Some((qnan(), fp_flags::INVALID))
                } else if a.is_nan() || b.is_nan() {
                    Some((qnan(), 0))
                } else {
                    None
                }
            }

            /// Invalid-operation result.
            #[inline]
            fn invalid() -> ($f, u8) {
                (qnan(), fp_flags::INVALID)
            }

            /// Result substituted when round-to-nearest overflows: the
            /// directed modes saturate at the largest finite value instead
            /// of producing an infinity in the clamped direction.
            fn overflowed(sign_positive: bool, rm: RoundingMode) -> ($f, u8) {
                let flags = fp_flags::OVERFLOW | fp_flags::INEXACT;
                let value = match (rm, sign_positive) {
                    (RoundingMode::Nearest, true) => <$f>::INFINITY,
                    (RoundingMode::Nearest, false) => <$f>::NEG_INFINITY,
                    (RoundingMode::TowardZero, true) => <$f>::MAX,
                    (RoundingMode::TowardZero, false) => <$f>::MIN,
                    (RoundingMode::TowardPositive, true) => <$f>::INFINITY,
                    (RoundingMode::TowardPositive, false) => <$f>::MIN,
                    (RoundingMode::TowardNegative, true) => <$f>::MAX,
                    (RoundingMode::TowardNegative, false) => <$f>::NEG_INFINITY,
                };
                (value, flags)
            }

            /// Moves a nearest-rounded result to the value the active mode
            /// would have produced, given the sign of `exact - rounded`.
            pub(crate) fn adjust(s: $f, err: i8, rm: RoundingMode) -> $f {
                if err == 0 {
                    return s;
                }
                match rm {
                    RoundingMode::Nearest => s,
                    RoundingMode::TowardPositive => {
                        if err > 0 {
                            s.next_up()
                        } else {
                            s
                        }
                    }
                    RoundingMode::TowardNegative => {
                        if err < 0 {
                            s.next_down()
                        } else {
                            s
                        }
                    }
                    RoundingMode::TowardZero => {
                        if err > 0 && s.is_sign_negative() {
                            s.next_up()
                        } else if err < 0 && s.is_sign_positive() {
                            s.next_down()
                        } else {
                            s
                        }
                    }
                }
            }

            /// Applies the rounding adjustment and derives the flag set.
            pub(crate) fn finish(s: $f, err: i8, rm: RoundingMode) -> ($f, u8) {
                let value = adjust(s, err, rm);
                let mut flags = 0;
                if err != 0 {
                    flags |= fp_flags::INEXACT;
                    if value.is_infinite() {
                        // Adjustment stepped off the end of the finite range.
                        flags |= fp_flags::OVERFLOW;
                    } else if value.is_subnormal() || value == 0.0 {
                        flags |= fp_flags::UNDERFLOW;
                    }
                }
                (value, flags)
            }

            /// Correctly rounded addition.
            pub fn add(a: $f, b: $f, rm: RoundingMode) -> ($f, u8) {
                if let Some(r) = nan_case(a, b) {
                    return r;
                }
                if a.is_infinite() || b.is_infinite() {
                    let s = a + b;
                    if s.is_nan() {
                        return invalid();
                    }
                    return (s, 0);
                }
                let s = a + b;
                if s.is_infinite() {
                    return overflowed(s > 0.0, rm);
                }
                let bb = s - a;
                let err = (a - (s - bb)) + (b - bb);
                finish(s, err_sign(err), rm)
            }

            /// Correctly rounded subtraction.
            #[inline]
            pub fn sub(a: $f, b: $f, rm: RoundingMode) -> ($f, u8) {
                add(a, -b, rm)
            }

            /// Correctly rounded multiplication.
            pub fn mul(a: $f, b: $f, rm: RoundingMode) -> ($f, u8) {
                if let Some(r) = nan_case(a, b) {
                    return r;
                }
                if a.is_infinite() || b.is_infinite() {
                    let p = a * b;
                    if p.is_nan() {
                        return invalid();
                    }
                    return (p, 0);
                }
                let p = a * b;
                if p.is_infinite() {
                    return overflowed(p > 0.0, rm);
                }
                let err = a.mul_add(b, -p);
                finish(p, err_sign(err), rm)
            }

            /// Correctly rounded division.
            pub fn div(a: $f, b: $f, rm: RoundingMode) -> ($f, u8) {
                if let Some(r) = nan_case(a, b) {
                    return r;
                }
                if b == 0.0 {
                    if a == 0.0 {
                        return invalid();
                    }
                    if a.is_infinite() {
                        return (a / b, 0);
                    }
                    return (a / b, fp_flags::DIV_BY_ZERO);
                }
                if a.is_infinite() {
                    if b.is_infinite() {
                        return invalid();
                    }
                    return (a / b, 0);
                }
                if b.is_infinite() {
                    return (a / b, 0);
                }
                let q = a / b;
                if q.is_infinite() {
                    return overflowed(q > 0.0, rm);
                }
                // Sign of the true error (a - q*b) / b, via one fused step.
                let t = q.mul_add(b, -a);
                let mut err = -err_sign(t);
                if b < 0.0 {
                    err = -err;
                }
                finish(q, err, rm)
            }

            /// Correctly rounded square root.
            pub fn sqrt(a: $f, rm: RoundingMode) -> ($f, u8) {
                if is_snan(a) {
                    return invalid();
                }
                if a.is_nan() {
                    return (qnan(), 0);
                }
                if a < 0.0 {
                    return invalid();
                }
                if a == 0.0 || a.is_infinite() {
                    return (a, 0);
                }
                let s = a.sqrt();
                let t = s.mul_add(s, -a);
                finish(s, -err_sign(t), rm)
            }
        }
    };
}

define_float_ops!(single, f32, u32, 0x0040_0000_u32, 0x7FC0_0000_u32);
define_float_ops!(
    double,
    f64,
    u64,
    0x0008_0000_0000_0000_u64,
    0x7FF8_0000_0000_0000_u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_modes_bracket_nearest() {
        // 1 + 2^-60 is inexact in f64; the modes must split around it.
        let tiny = (2.0_f64).powi(-60);
        let (rn, f) = double::add(1.0, tiny, RoundingMode::Nearest);
        assert_eq!(rn, 1.0);
        assert_eq!(f, fp_flags::INEXACT);
        let (rz, _) = double::add(1.0, tiny, RoundingMode::TowardZero);
        assert_eq!(rz, 1.0);
        let (ru, _) = double::add(1.0, tiny, RoundingMode::TowardPositive);
        assert_eq!(ru, 1.0_f64.next_up());
        let (rd, _) = double::add(1.0, tiny, RoundingMode::TowardNegative);
        assert_eq!(rd, 1.0);
        let (rd_neg, _) = double::add(-1.0, -tiny, RoundingMode::TowardNegative);
        assert_eq!(rd_neg, (-1.0_f64).next_down());
    }

    #[test]
    fn overflow_saturates_in_directed_modes() {
        let (v, f) = single::mul(f32::MAX, 2.0, RoundingMode::TowardZero);
        assert_eq!(v, f32::MAX);
        assert_eq!(f, fp_flags::OVERFLOW | fp_flags::INEXACT);
        let (v, _) = single::mul(f32::MAX, 2.0, RoundingMode::Nearest);
        assert!(v.is_infinite());
    }

    #[test]
    fn divide_by_zero_flags_and_invalid_combos() {
        let (v, f) = double::div(1.0, 0.0, RoundingMode::Nearest);
        assert!(v.is_infinite());
        assert_eq!(f, fp_flags::DIV_BY_ZERO);
        let (v, f) = double::div(0.0, 0.0, RoundingMode::Nearest);
        assert!(v.is_nan());
        assert_eq!(f, fp_flags::INVALID);
        let (v, f) = double::add(f64::INFINITY, f64::NEG_INFINITY, RoundingMode::Nearest);
        assert!(v.is_nan());
        assert_eq!(f, fp_flags::INVALID);
    }

    #[test]
    fn signaling_nan_raises_invalid() {
        let snan = f32::from_bits(0x7F80_0001);
        let (v, f) = single::add(snan, 1.0, RoundingMode::Nearest);
        assert_eq!(v.to_bits(), single::CANONICAL_QNAN);
        assert_eq!(f, fp_flags::INVALID);
        // Quiet NaN propagates without flags.
        let (_, f) = single::add(f32::NAN, 1.0, RoundingMode::Nearest);
        assert_eq!(f, 0);
    }

    #[test]
    fn sqrt_of_negative_is_invalid() {
        let (v, f) = double::sqrt(-4.0, RoundingMode::Nearest);
        assert!(v.is_nan());
        assert_eq!(f, fp_flags::INVALID);
        let (v, f) = double::sqrt(4.0, RoundingMode::Nearest);
        assert_eq!(v, 2.0);
        assert_eq!(f, 0);
    }
}
