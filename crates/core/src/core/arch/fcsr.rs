//! Floating-point control and status register (FCSR).
//!
//! Single 32-bit register holding the FPU's global state:
//! 1. **RM (bits 1:0):** Active rounding mode.
//! 2. **Flags (bits 6:2):** Sticky accrued-exception flags.
//! 3. **Enables (bits 11:7):** Per-cause trap enables.
//! 4. **Cause (bits 17:12):** Causes raised by the current operation, with
//!    bit 17 (E, unimplemented operation) fatal regardless of enables.
//! 5. **FCC (bit 23, bits 31:25):** Eight condition-code bits.
//! 6. **FS (bit 24):** Flush-to-zero mode for subnormal results.

use crate::common::constants::FCC_COUNT;

/// IEEE rounding mode, encoded in FCSR bits 1:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Round to nearest, ties to even (encoding 0).
    #[default]
    Nearest,
    /// Round toward zero (encoding 1).
    TowardZero,
    /// Round toward positive infinity (encoding 2).
    TowardPositive,
    /// Round toward negative infinity (encoding 3).
    TowardNegative,
}

impl RoundingMode {
    /// Decodes the two-bit RM field.
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Nearest,
            1 => Self::TowardZero,
            2 => Self::TowardPositive,
            _ => Self::TowardNegative,
        }
    }
}

/// Exception cause/flag bit positions within their five-bit fields.
///
/// The same ordering is used by the flag, enable, and cause fields: inexact
/// in the least significant bit through invalid in the most significant.
pub mod fp_flags {
    /// Inexact result.
    pub const INEXACT: u8 = 1 << 0;
    /// Underflow (tininess with loss of accuracy).
    pub const UNDERFLOW: u8 = 1 << 1;
    /// Overflow.
    pub const OVERFLOW: u8 = 1 << 2;
    /// Division by zero.
    pub const DIV_BY_ZERO: u8 = 1 << 3;
    /// Invalid operation.
    pub const INVALID: u8 = 1 << 4;
    /// All five IEEE flags.
    pub const ALL: u8 = 0b1_1111;
}

const RM_MASK: u32 = 0b11;
const FLAGS_SHIFT: u32 = 2;
const ENABLES_SHIFT: u32 = 7;
const CAUSE_SHIFT: u32 = 12;
const FIELD_MASK: u32 = 0b1_1111;

/// Unimplemented-operation cause bit (E). Fatal regardless of enables.
const CAUSE_E_BIT: u32 = 1 << 17;

/// Condition-code bit 0 sits at bit 23; bits 1-7 are contiguous from bit 25.
const FCC0_BIT: u32 = 23;
const FCC_HIGH_SHIFT: u32 = 25;

/// Flush-to-zero mode bit.
const FS_BIT: u32 = 1 << 24;

/// The floating-point control and status register.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcsr {
    bits: u32,
}

impl Fcsr {
    /// Returns the raw 32-bit register value (CFC1).
    #[inline]
    pub fn read(&self) -> u32 {
        self.bits
    }

    /// Replaces the raw register value (CTC1).
    #[inline]
    pub fn write(&mut self, value: u32) {
        self.bits = value;
    }

    /// Active rounding mode.
    #[inline]
    pub fn rounding_mode(&self) -> RoundingMode {
        RoundingMode::from_bits(self.bits & RM_MASK)
    }

    /// True when subnormal results are flushed to signed zero.
    #[inline]
    pub fn flush_to_zero(&self) -> bool {
        self.bits & FS_BIT != 0
    }

    /// Sticky accrued-exception flags, in [`fp_flags`] order.
    #[inline]
    pub fn flags(&self) -> u8 {
        ((self.bits >> FLAGS_SHIFT) & FIELD_MASK) as u8
    }

    /// Per-cause trap enables, in [`fp_flags`] order.
    #[inline]
    pub fn enables(&self) -> u8 {
        ((self.bits >> ENABLES_SHIFT) & FIELD_MASK) as u8
    }

    /// Cause bits raised by the most recent operation (excluding E).
    #[inline]
    pub fn cause(&self) -> u8 {
        ((self.bits >> CAUSE_SHIFT) & FIELD_MASK) as u8
    }

    /// Clears the cause field, including the E bit. Performed at the start of
    /// every FPU operation so causes reflect only the current one.
    #[inline]
    pub fn clear_cause(&mut self) {
        self.bits &= !((FIELD_MASK << CAUSE_SHIFT) | CAUSE_E_BIT);
    }

    /// Records the causes raised by the current operation.
    ///
    /// Returns true if any raised cause is trap-enabled, in which case the
    /// caller must suppress the result and raise a floating-point exception.
    /// Causes that do not trap accrue into the sticky flag field.
    #[must_use]
    pub fn raise(&mut self, causes: u8) -> bool {
        let causes = causes & fp_flags::ALL;
        self.bits |= u32::from(causes) << CAUSE_SHIFT;
        if causes & self.enables() != 0 {
            true
        } else {
            self.bits |= u32::from(causes) << FLAGS_SHIFT;
            false
        }
    }

    /// Records an unimplemented-operation cause (E bit). Always traps.
    pub fn raise_unimplemented(&mut self) {
        self.bits |= CAUSE_E_BIT;
    }

    /// Reads condition-code bit `cc` (0-7).
    #[inline]
    pub fn condition(&self, cc: u8) -> bool {
        debug_assert!(cc < FCC_COUNT);
        let bit = if cc == 0 {
            FCC0_BIT
        } else {
            FCC_HIGH_SHIFT + u32::from(cc) - 1
        };
        self.bits & (1 << bit) != 0
    }

    /// Writes condition-code bit `cc` (0-7).
    #[inline]
    pub fn set_condition(&mut self, cc: u8, value: bool) {
        debug_assert!(cc < FCC_COUNT);
        let bit = if cc == 0 {
            FCC0_BIT
        } else {
            FCC_HIGH_SHIFT + u32::from(cc) - 1
        };
        if value {
            self.bits |= 1 << bit;
        } else {
            self.bits &= !(1 << bit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_mode_field_decodes_all_encodings() {
        let mut fcsr = Fcsr::default();
        fcsr.write(0);
        assert_eq!(fcsr.rounding_mode(), RoundingMode::Nearest);
        fcsr.write(1);
        assert_eq!(fcsr.rounding_mode(), RoundingMode::TowardZero);
        fcsr.write(2);
        assert_eq!(fcsr.rounding_mode(), RoundingMode::TowardPositive);
        fcsr.write(3);
        assert_eq!(fcsr.rounding_mode(), RoundingMode::TowardNegative);
    }

    #[test]
    fn disabled_cause_accrues_into_flags() {
        let mut fcsr = Fcsr::default();
        assert!(!fcsr.raise(fp_flags::INEXACT));
        assert_eq!(fcsr.flags(), fp_flags::INEXACT);
        assert_eq!(fcsr.cause(), fp_flags::INEXACT);
    }

    #[test]
    fn enabled_cause_traps_without_accruing() {
        let mut fcsr = Fcsr::default();
        fcsr.write(u32::from(fp_flags::INVALID) << 7);
        assert!(fcsr.raise(fp_flags::INVALID));
        assert_eq!(fcsr.flags(), 0);
        assert_eq!(fcsr.cause(), fp_flags::INVALID);
    }

    #[test]
    fn condition_codes_map_to_split_bit_positions() {
        let mut fcsr = Fcsr::default();
        fcsr.set_condition(0, true);
        assert_eq!(fcsr.read(), 1 << 23);
        fcsr.set_condition(0, false);
        fcsr.set_condition(7, true);
        assert_eq!(fcsr.read(), 1 << 31);
        assert!(fcsr.condition(7));
        assert!(!fcsr.condition(0));
    }
}
