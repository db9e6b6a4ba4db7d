//! IEEE floating-point coprocessor operations.
//!
//! This module is the FPU's public surface:
//! 1. **Scalar arithmetic:** Add through square root in single and double
//!    precision, correctly rounded under the active mode, with optional
//!    flush-to-zero on subnormal inputs and outputs.
//! 2. **Multiply-add family:** The fused ops round the intermediate product
//!    to the destination format before the additive step (two roundings, not
//!    one extended-precision rounding). The reciprocal-refine steps are the
//!    same negated-multiply-subtract against 1.0 and 0.5.
//! 3. **Compares:** Sixteen-predicate ordered/unordered comparison.
//! 4. **Paired single:** Lane-wise application over packed 32-bit halves.
//!
//! Every operation is a pure function returning `(value, flags)`; merging
//! flags into the FCSR and trapping on enabled causes is the caller's job.

use crate::core::arch::fcsr::fp_flags;
use crate::core::arch::RoundingMode;

/// Format conversions.
pub mod convert;

/// Correctly rounded arithmetic kernels.
pub mod rounding;

/// Ambient parameters of an FPU operation, drawn from the FCSR.
#[derive(Debug, Clone, Copy)]
pub struct FpEnv {
    /// Active rounding mode.
    pub rm: RoundingMode,
    /// Flush subnormal inputs and outputs to signed zero.
    pub flush_to_zero: bool,
}

/// Comparison predicate bits (the four-bit cond field).
pub mod cond {
    /// Predicate is true on unordered operands.
    pub const UNORDERED: u8 = 1 << 0;
    /// Predicate is true on equality.
    pub const EQUAL: u8 = 1 << 1;
    /// Predicate is true on less-than.
    pub const LESS: u8 = 1 << 2;
    /// Unordered operands raise invalid even when quiet.
    pub const SIGNALING: u8 = 1 << 3;
}

macro_rules! define_fpu_format {
    ($modname:ident, $f:ty, $kernel:path) => {
        pub mod $modname {
            use $kernel as kernel;

            use super::{cond, fp_flags, FpEnv};

            const ONE: $f = 1.0;
            const HALF: $f = 0.5;

            /// Flush-to-zero applied to an operand.
            #[inline]
            fn flush_in(x: $f, env: FpEnv) -> $f {
                if env.flush_to_zero && x.is_subnormal() {
                    if x.is_sign_negative() {
                        -0.0
                    } else {
                        0.0
                    }
                } else {
                    x
                }
            }

            /// Flush-to-zero applied to a result.
            fn flush_out(r: ($f, u8), env: FpEnv) -> ($f, u8) {
                let (v, flags) = r;
                if env.flush_to_zero && v.is_subnormal() {
                    let zero = if v.is_sign_negative() { -0.0 } else { 0.0 };
                    (zero, flags | fp_flags::UNDERFLOW | fp_flags::INEXACT)
                } else {
                    (v, flags)
                }
            }

            /// Addition.
            pub fn add(a: $f, b: $f, env: FpEnv) -> ($f, u8) {
                flush_out(kernel::add(flush_in(a, env), flush_in(b, env), env.rm), env)
            }

            /// Subtraction.
            pub fn sub(a: $f, b: $f, env: FpEnv) -> ($f, u8) {
                flush_out(kernel::sub(flush_in(a, env), flush_in(b, env), env.rm), env)
            }

            /// Multiplication.
            pub fn mul(a: $f, b: $f, env: FpEnv) -> ($f, u8) {
                flush_out(kernel::mul(flush_in(a, env), flush_in(b, env), env.rm), env)
            }

            /// Division.
            pub fn div(a: $f, b: $f, env: FpEnv) -> ($f, u8) {
                flush_out(kernel::div(flush_in(a, env), flush_in(b, env), env.rm), env)
            }

            /// Square root.
            pub fn sqrt(a: $f, env: FpEnv) -> ($f, u8) {
                flush_out(kernel::sqrt(flush_in(a, env), env.rm), env)
            }

            /// Absolute value. Non-arithmetic apart from NaN screening.
            pub fn abs(a: $f) -> ($f, u8) {
                if kernel::is_snan(a) {
                    return (kernel::qnan(), fp_flags::INVALID);
                }
                (a.abs(), 0)
            }

            /// Negation. Non-arithmetic apart from NaN screening.
            pub fn neg(a: $f) -> ($f, u8) {
                if kernel::is_snan(a) {
                    return (kernel::qnan(), fp_flags::INVALID);
                }
                (-a, 0)
            }

            /// Reciprocal, computed as a full-precision division.
            pub fn recip(a: $f, env: FpEnv) -> ($f, u8) {
                div(ONE, a, env)
            }

            /// Reciprocal square root, as a square root followed by a
            /// reciprocal (two roundings).
            pub fn rsqrt(a: $f, env: FpEnv) -> ($f, u8) {
                let (s, f1) = sqrt(a, env);
                let (r, f2) = div(ONE, s, env);
                (r, f1 | f2)
            }

            /// `round(round(a*b) + c)`. The product is rounded to this
            /// format before the addition.
            pub fn madd(a: $f, b: $f, c: $f, env: FpEnv) -> ($f, u8) {
                let (p, f1) = mul(a, b, env);
                let (s, f2) = add(p, c, env);
                (s, f1 | f2)
            }

            /// `round(round(a*b) - c)`.
            pub fn msub(a: $f, b: $f, c: $f, env: FpEnv) -> ($f, u8) {
                let (p, f1) = mul(a, b, env);
                let (s, f2) = sub(p, c, env);
                (s, f1 | f2)
            }

            /// `-(round(round(a*b) + c))`.
            pub fn nmadd(a: $f, b: $f, c: $f, env: FpEnv) -> ($f, u8) {
                let (s, f) = madd(a, b, c, env);
                (-s, f)
            }

            /// `-(round(round(a*b) - c))`.
            pub fn nmsub(a: $f, b: $f, c: $f, env: FpEnv) -> ($f, u8) {
                let (s, f) = msub(a, b, c, env);
                (-s, f)
            }

            /// Reciprocal refinement step: `1.0 - round(a*b)`, rounded.
            pub fn recip2(a: $f, b: $f, env: FpEnv) -> ($f, u8) {
                let (p, f1) = mul(a, b, env);
                let (s, f2) = sub(ONE, p, env);
                (s, f1 | f2)
            }

            /// Reciprocal-square-root refinement step: `0.5 - round(a*b)/2`.
            ///
            /// The product's exponent is scaled by -1 before the subtraction,
            /// an implicit halving of the refinement term.
            pub fn rsqrt2(a: $f, b: $f, env: FpEnv) -> ($f, u8) {
                let (p, f1) = mul(a, b, env);
                let (ph, f2) = mul(p, HALF, env);
                let (s, f3) = sub(HALF, ph, env);
                (s, f1 | f2 | f3)
            }

            /// Evaluates a four-bit comparison predicate.
            ///
            /// Any NaN operand makes the pair unordered, forcing the less and
            /// equal terms false. Signaling NaNs, or quiet NaNs under a
            /// signaling predicate, raise invalid.
            pub fn compare(a: $f, b: $f, predicate: u8) -> (bool, u8) {
                let unordered = a.is_nan() || b.is_nan();
                let mut flags = 0;
                if kernel::is_snan(a)
                    || kernel::is_snan(b)
                    || (predicate & cond::SIGNALING != 0 && unordered)
                {
                    flags |= fp_flags::INVALID;
                }
                let result = if unordered {
                    predicate & cond::UNORDERED != 0
                } else {
                    (predicate & cond::LESS != 0 && a < b)
                        || (predicate & cond::EQUAL != 0 && a == b)
                };
                (result, flags)
            }
        }
    };
}

define_fpu_format!(single, f32, crate::core::units::fpu::rounding::single);
define_fpu_format!(double, f64, crate::core::units::fpu::rounding::double);

/// Paired-single combinators: apply a scalar single-precision operation to
/// both 32-bit lanes and merge the raised flags.
pub mod paired {
    use super::FpEnv;

    /// Packed pair as (lower lane, upper lane).
    pub type Pair = (f32, f32);

    /// Lane-wise unary application.
    pub fn map1(op: impl Fn(f32) -> (f32, u8), a: Pair) -> (Pair, u8) {
        let (lo, f0) = op(a.0);
        let (hi, f1) = op(a.1);
        ((lo, hi), f0 | f1)
    }

    /// Lane-wise binary application.
    pub fn map2(op: impl Fn(f32, f32, FpEnv) -> (f32, u8), a: Pair, b: Pair, env: FpEnv) -> (Pair, u8) {
        let (lo, f0) = op(a.0, b.0, env);
        let (hi, f1) = op(a.1, b.1, env);
        ((lo, hi), f0 | f1)
    }

    /// Lane-wise ternary application.
    pub fn map3(
        op: impl Fn(f32, f32, f32, FpEnv) -> (f32, u8),
        a: Pair,
        b: Pair,
        c: Pair,
        env: FpEnv,
    ) -> (Pair, u8) {
        let (lo, f0) = op(a.0, b.0, c.0, env);
        let (hi, f1) = op(a.1, b.1, c.1, env);
        ((lo, hi), f0 | f1)
    }
}
