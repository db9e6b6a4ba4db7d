//! Per-lane wide accumulator bank.
//!
//! Multiply-accumulate destinations wider than any single product: 24 bits
//! per lane in the OB domain, 48 bits in the QH domain. Lanes live in 64-bit
//! containers; bits above the architectural width are ignored on reduction,
//! never on accumulation. The bank is only written by explicit accumulator
//! operations and never cleared between instructions.

use crate::common::constants::ACC_LANES;

/// Architectural accumulator width per format.
const OB_ACC_BITS: u32 = 24;
const QH_ACC_BITS: u32 = 48;

/// How a multiply result combines with the current accumulator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccOp {
    /// Replace the lane with the product.
    Load,
    /// Replace the lane with the negated product.
    NegLoad,
    /// Add the product to the lane.
    Add,
    /// Subtract the product from the lane.
    Sub,
}

/// Reduction rounding policy applied when reading the accumulator back as a
/// packed narrow vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceRounding {
    /// Round to nearest, ties away from zero; clamp to the signed range.
    NearestAwaySigned,
    /// Round to nearest, ties away from zero; clamp to the unsigned range.
    NearestAwayUnsigned,
    /// Round to nearest, ties to even; clamp to the signed range.
    NearestEvenSigned,
    /// Round to nearest, ties to even; clamp to the unsigned range.
    NearestEvenUnsigned,
    /// Round toward zero; clamp to the signed range.
    ZeroSigned,
    /// Round toward zero; clamp to the unsigned range.
    ZeroUnsigned,
}

impl ReduceRounding {
    fn is_signed(self) -> bool {
        matches!(
            self,
            Self::NearestAwaySigned | Self::NearestEvenSigned | Self::ZeroSigned
        )
    }
}

/// The accumulator bank: eight lanes for OB, of which QH uses the first
/// four.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    lanes: [i64; ACC_LANES],
}

/// Sign-extends the low `bits` of a lane container.
#[inline]
fn sign_extend(v: i64, bits: u32) -> i64 {
    let shift = 64 - bits;
    (v << shift) >> shift
}

/// Rounds `v / 2^shift` under the policy, at full lane-container width.
///
/// `shift` has been validated non-negative and capped by the caller.
fn round_shifted(v: i64, shift: u32, policy: ReduceRounding) -> i64 {
    if shift == 0 {
        return v;
    }
    let floor = v >> shift;
    let rem = v - (floor << shift);
    let half = 1_i64 << (shift - 1);
    match policy {
        ReduceRounding::ZeroSigned | ReduceRounding::ZeroUnsigned => {
            // Truncation toward zero, not toward negative infinity.
            if v < 0 && rem != 0 {
                floor + 1
            } else {
                floor
            }
        }
        ReduceRounding::NearestAwaySigned | ReduceRounding::NearestAwayUnsigned => {
            // A negative tie stays at the floor: away from zero is downward.
            if rem > half || (rem == half && v >= 0) {
                floor + 1
            } else {
                floor
            }
        }
        ReduceRounding::NearestEvenSigned | ReduceRounding::NearestEvenUnsigned => {
            if rem > half || (rem == half && floor & 1 != 0) {
                floor + 1
            } else {
                floor
            }
        }
    }
}

impl Accumulator {
    /// Applies `op` with the lane-wise OB product `a[i] * b[i]`.
    pub fn multiply_ob(&mut self, op: AccOp, a: [u8; 8], b: [u8; 8]) {
        for i in 0..8 {
            let p = i64::from(a[i]) * i64::from(b[i]);
            self.apply(i, op, p);
        }
    }

    /// Applies `op` with the lane-wise QH product `a[i] * b[i]`.
    pub fn multiply_qh(&mut self, op: AccOp, a: [i16; 4], b: [i16; 4]) {
        for i in 0..4 {
            let p = i64::from(a[i]) * i64::from(b[i]);
            self.apply(i, op, p);
        }
    }

    fn apply(&mut self, lane: usize, op: AccOp, product: i64) {
        let cur = self.lanes[lane];
        self.lanes[lane] = match op {
            AccOp::Load => product,
            AccOp::NegLoad => -product,
            AccOp::Add => cur.wrapping_add(product),
            AccOp::Sub => cur.wrapping_sub(product),
        };
    }

    /// Loads the low bits of each OB lane from a vector.
    pub fn load_low_ob(&mut self, v: [u8; 8]) {
        for i in 0..8 {
            self.lanes[i] = i64::from(v[i]);
        }
    }

    /// Loads the high byte (bits 23:16) of each OB lane from a vector,
    /// keeping the low bits.
    pub fn load_high_ob(&mut self, v: [u8; 8]) {
        for i in 0..8 {
            let low = self.lanes[i] & 0xFFFF;
            self.lanes[i] = (i64::from(v[i]) << 16) | low;
        }
    }

    /// Loads the low halfword of each QH lane from a vector, sign-extended.
    pub fn load_low_qh(&mut self, v: [i16; 4]) {
        for i in 0..4 {
            self.lanes[i] = i64::from(v[i]);
        }
    }

    /// Loads the high halfword (bits 47:32) of each QH lane, keeping the
    /// low bits.
    pub fn load_high_qh(&mut self, v: [i16; 4]) {
        for i in 0..4 {
            let low = self.lanes[i] & 0xFFFF_FFFF;
            self.lanes[i] = (i64::from(v[i]) << 32) | low;
        }
    }

    /// Raw lane values, for context save/restore.
    pub fn lanes(&self) -> [i64; ACC_LANES] {
        self.lanes
    }

    /// Replaces the raw lane values.
    pub fn set_lanes(&mut self, lanes: [i64; ACC_LANES]) {
        self.lanes = lanes;
    }

    /// Reduces the OB lanes to a packed byte vector.
    ///
    /// Each lane is narrowed to its architectural 24 bits, shifted right by
    /// `shift` with the policy's rounding, and clamped to the lane range.
    pub fn reduce_ob(&self, policy: ReduceRounding, shift: u32) -> [u8; 8] {
        let shift = shift.min(OB_ACC_BITS);
        let mut out = [0_u8; 8];
        for i in 0..8 {
            let v = sign_extend(self.lanes[i], OB_ACC_BITS);
            let r = round_shifted(v, shift, policy);
            out[i] = if policy.is_signed() {
                // Signed clamp, reinterpreted as the unsigned lane pattern.
                r.clamp(i64::from(i8::MIN), i64::from(i8::MAX)) as i8 as u8
            } else {
                r.clamp(0, i64::from(u8::MAX)) as u8
            };
        }
        out
    }

    /// Reduces the QH lanes to a packed halfword vector.
    ///
    /// Negative shifts are an unpredictable-result condition for the signed
    /// policies; the engine deterministically produces an all-zero vector
    /// and must never crash. The caller passes the shift as `i32` so that
    /// the condition is representable.
    pub fn reduce_qh(&self, policy: ReduceRounding, shift: i32) -> [i16; 4] {
        if shift < 0 {
            return [0; 4];
        }
        let shift = (shift as u32).min(QH_ACC_BITS);
        let mut out = [0_i16; 4];
        for i in 0..4 {
            let v = sign_extend(self.lanes[i], QH_ACC_BITS);
            let r = round_shifted(v, shift, policy);
            out[i] = if policy.is_signed() {
                r.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
            } else {
                r.clamp(0, i64::from(u16::MAX)) as u16 as i16
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_survives_across_operations() {
        let mut acc = Accumulator::default();
        acc.multiply_ob(AccOp::Load, [10; 8], [10; 8]);
        acc.multiply_ob(AccOp::Add, [20; 8], [5; 8]);
        assert_eq!(acc.lanes()[0], 200);
        acc.multiply_ob(AccOp::Sub, [10; 8], [10; 8]);
        assert_eq!(acc.lanes()[3], 100);
    }

    #[test]
    fn reduction_ignores_bits_above_the_architectural_width() {
        let mut acc = Accumulator::default();
        let mut lanes = [0_i64; ACC_LANES];
        lanes[0] = (1 << 30) | 40; // bits above 24 are not architectural
        acc.set_lanes(lanes);
        assert_eq!(acc.reduce_ob(ReduceRounding::ZeroUnsigned, 0)[0], 40);
    }

    #[test]
    fn rounding_policies_differ_on_ties() {
        let mut acc = Accumulator::default();
        let mut lanes = [0_i64; ACC_LANES];
        lanes[0] = 5; // 5 / 2 = 2.5
        lanes[1] = 7; // 7 / 2 = 3.5
        lanes[2] = -5;
        acc.set_lanes(lanes);
        let away = acc.reduce_qh(ReduceRounding::NearestAwaySigned, 1);
        assert_eq!(away[0], 3);
        assert_eq!(away[1], 4);
        assert_eq!(away[2], -3);
        let even = acc.reduce_qh(ReduceRounding::NearestEvenSigned, 1);
        assert_eq!(even[0], 2);
        assert_eq!(even[1], 4);
        assert_eq!(even[2], -2);
        let zero = acc.reduce_qh(ReduceRounding::ZeroSigned, 1);
        assert_eq!(zero[0], 2);
        assert_eq!(zero[2], -2);
    }

    #[test]
    fn unsigned_reduction_clamps_negative_lanes_to_zero() {
        let mut acc = Accumulator::default();
        acc.multiply_qh(AccOp::NegLoad, [100; 4], [100; 4]);
        assert_eq!(acc.reduce_qh(ReduceRounding::ZeroUnsigned, 0), [0; 4]);
        assert_eq!(acc.reduce_qh(ReduceRounding::ZeroSigned, 0), [-10000; 4]);
    }

    #[test]
    fn negative_shift_yields_packed_zero() {
        let mut acc = Accumulator::default();
        acc.multiply_qh(AccOp::Load, [3; 4], [3; 4]);
        assert_eq!(acc.reduce_qh(ReduceRounding::NearestEvenSigned, -1), [0; 4]);
    }
}
