//! Flagged integer arithmetic at 8, 16, 32, and 64 bits.
//!
//! Each width gets an accumulator type with the same shape:
//! 1. **Seeding:** [`Alu64::begin`] loads a value and clears both flags.
//! 2. **Arithmetic:** add-with-carry plus two subtraction conventions, one
//!    built on a negated add (carry means no borrow) and one computing the
//!    difference directly (flag is a true borrow). The two flags are logical
//!    complements for the same inputs; instruction sets disagree on which
//!    convention they expose, so both are first class.
//! 3. **Flags:** carry-or-borrow and signed overflow, computed at operand
//!    width. The 64-bit width must not lean on 128-bit host arithmetic, so
//!    overflow uses the XOR identity `msb(a ^ b ^ r) ^ carry_out` instead of
//!    widening.
//!
//! Every operation is total; flags are reported, never raised.

macro_rules! define_alu {
    ($(#[$meta:meta])* $name:ident, $uint:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name {
            acc: $uint,
            carry: bool,
            overflow: bool,
        }

        impl $name {
            const MSB: $uint = 1 << (<$uint>::BITS - 1);

            /// Seeds the accumulator and clears both flags.
            #[inline]
            pub fn begin(value: $uint) -> Self {
                Self {
                    acc: value,
                    carry: false,
                    overflow: false,
                }
            }

            /// Current accumulator value.
            #[inline]
            pub fn value(&self) -> $uint {
                self.acc
            }

            /// Carry-or-borrow flag of the last arithmetic operation.
            ///
            /// After an add or negated-add subtract this is a carry (set when
            /// the unsigned result does not fit the width); after
            /// [`subtract_direct`](Self::subtract_direct) it is a borrow.
            #[inline]
            pub fn carry(&self) -> bool {
                self.carry
            }

            /// Signed-overflow flag of the last arithmetic operation.
            #[inline]
            pub fn overflow(&self) -> bool {
                self.overflow
            }

            /// Computes `acc + value + carry_in`, replacing the accumulator.
            ///
            /// Carry is set when the unsigned sum does not fit; overflow when
            /// the signed sum falls outside the representable range.
            pub fn add_with_carry_in(&mut self, value: $uint, carry_in: bool) -> $uint {
                let a = self.acc;
                let (t, c1) = a.overflowing_add(value);
                let (r, c2) = t.overflowing_add(<$uint>::from(carry_in));
                let carry_out = c1 | c2;
                self.acc = r;
                self.carry = carry_out;
                self.overflow = (((a ^ value ^ r) & Self::MSB) != 0) != carry_out;
                r
            }

            /// Computes `acc - value - borrow_in` as a negated add.
            ///
            /// Implemented as `acc + !value + !borrow_in`, so the carry flag
            /// follows the add convention: set means the subtraction did NOT
            /// borrow.
            #[inline]
            pub fn subtract_via_negated_add(&mut self, value: $uint, borrow_in: bool) -> $uint {
                self.add_with_carry_in(!value, !borrow_in)
            }

            /// Computes `acc - value - borrow_in` directly.
            ///
            /// The flag reported through [`carry`](Self::carry) is a true
            /// borrow here, the complement of the negated-add carry for the
            /// same inputs.
            pub fn subtract_direct(&mut self, value: $uint, borrow_in: bool) -> $uint {
                let a = self.acc;
                let (t, b1) = a.overflowing_sub(value);
                let (r, b2) = t.overflowing_sub(<$uint>::from(borrow_in));
                self.acc = r;
                self.carry = b1 | b2;
                self.overflow = ((a ^ value) & (a ^ r)) & Self::MSB != 0;
                r
            }

            /// Computes `0 - acc` via the negated-add convention.
            pub fn negate(&mut self) -> $uint {
                let value = self.acc;
                self.acc = 0;
                self.subtract_via_negated_add(value, false)
            }

            /// Bitwise AND; clears both flags.
            pub fn and(&mut self, value: $uint) -> $uint {
                self.acc &= value;
                self.carry = false;
                self.overflow = false;
                self.acc
            }

            /// Bitwise OR; clears both flags.
            pub fn or(&mut self, value: $uint) -> $uint {
                self.acc |= value;
                self.carry = false;
                self.overflow = false;
                self.acc
            }

            /// Bitwise XOR; clears both flags.
            pub fn xor(&mut self, value: $uint) -> $uint {
                self.acc ^= value;
                self.carry = false;
                self.overflow = false;
                self.acc
            }

            /// Bitwise complement; clears both flags.
            pub fn not(&mut self) -> $uint {
                self.acc = !self.acc;
                self.carry = false;
                self.overflow = false;
                self.acc
            }
        }
    };
}

define_alu!(
    /// Flagged 8-bit integer accumulator.
    Alu8,
    u8
);
define_alu!(
    /// Flagged 16-bit integer accumulator.
    Alu16,
    u16
);
define_alu!(
    /// Flagged 32-bit integer accumulator.
    Alu32,
    u32
);
define_alu!(
    /// Flagged 64-bit integer accumulator.
    Alu64,
    u64
);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn add_matches_a_widened_reference(
        #[values(0_u8, 1, 0x7E, 0x7F, 0x80, 0x81, 0xFF)] a: u8,
        #[values(0_u8, 1, 0x7E, 0x7F, 0x80, 0x81, 0xFF)] b: u8,
        #[values(false, true)] carry_in: bool,
    ) {
        let mut alu = Alu8::begin(a);
        let r = alu.add_with_carry_in(b, carry_in);
        let wide = u32::from(a) + u32::from(b) + u32::from(carry_in);
        assert_eq!(u32::from(r), wide & 0xFF);
        assert_eq!(alu.carry(), wide > 0xFF, "a={a:#x} b={b:#x} cin={carry_in}");
        let signed = i32::from(a as i8) + i32::from(b as i8) + i32::from(carry_in);
        assert_eq!(
            alu.overflow(),
            !(i32::from(i8::MIN)..=i32::from(i8::MAX)).contains(&signed),
            "a={a:#x} b={b:#x} cin={carry_in}"
        );
    }

    #[rstest]
    fn negated_add_subtract_matches_a_widened_reference(
        #[values(0_u8, 1, 0x7E, 0x7F, 0x80, 0x81, 0xFF)] a: u8,
        #[values(0_u8, 1, 0x7E, 0x7F, 0x80, 0x81, 0xFF)] b: u8,
        #[values(false, true)] borrow_in: bool,
    ) {
        let mut alu = Alu8::begin(a);
        let r = alu.subtract_via_negated_add(b, borrow_in);
        let wide = i32::from(a) - i32::from(b) - i32::from(borrow_in);
        assert_eq!(i32::from(r), wide & 0xFF);
        // Carry follows the add convention: set means no borrow happened.
        assert_eq!(alu.carry(), wide >= 0, "a={a:#x} b={b:#x} bin={borrow_in}");
        let signed = i32::from(a as i8) - i32::from(b as i8) - i32::from(borrow_in);
        assert_eq!(
            alu.overflow(),
            !(i32::from(i8::MIN)..=i32::from(i8::MAX)).contains(&signed),
            "a={a:#x} b={b:#x} bin={borrow_in}"
        );
    }

    #[test]
    fn min_plus_min_wraps_with_carry_and_overflow() {
        let mut alu = Alu8::begin(i8::MIN as u8);
        let r = alu.add_with_carry_in(i8::MIN as u8, false);
        assert_eq!(r, 0);
        assert!(alu.carry());
        assert!(alu.overflow());
    }

    #[test]
    fn max_plus_min_is_all_ones_with_no_flags() {
        let mut alu = Alu64::begin(i64::MAX as u64);
        let r = alu.add_with_carry_in(i64::MIN as u64, false);
        assert_eq!(r, u64::MAX);
        assert!(!alu.carry());
        assert!(!alu.overflow());
    }

    #[test]
    fn negate_of_minimum_is_minimum_with_overflow() {
        let mut alu = Alu32::begin(i32::MIN as u32);
        let r = alu.negate();
        assert_eq!(r, i32::MIN as u32);
        assert!(alu.overflow());
    }

    #[test]
    fn subtraction_conventions_are_complementary() {
        let pairs: [(u16, u16); 6] = [
            (0, 0),
            (0, 1),
            (1, 0),
            (u16::MAX, 1),
            (i16::MIN as u16, i16::MAX as u16),
            (0x8000, 0x8000),
        ];
        for (a, b) in pairs {
            let mut neg = Alu16::begin(a);
            let rn = neg.subtract_via_negated_add(b, false);
            let mut dir = Alu16::begin(a);
            let rd = dir.subtract_direct(b, false);
            assert_eq!(rn, rd);
            assert_eq!(neg.carry(), !dir.carry(), "a={a:#x} b={b:#x}");
            assert_eq!(neg.overflow(), dir.overflow());
        }
    }

    #[test]
    fn logic_ops_clear_flags() {
        let mut alu = Alu8::begin(0xFF);
        let _ = alu.add_with_carry_in(1, false);
        assert!(alu.carry());
        let _ = alu.or(0x0F);
        assert!(!alu.carry());
        assert!(!alu.overflow());
    }
}
