//! Floating-point register file with value-format tagging.
//!
//! Each of the 32 registers carries a tag naming the format of the value last
//! written to it. Reading a register under a different format than its tag is
//! a guest-software bug the hardware would silently misinterpret; the model
//! instead logs a warning, demotes the tag to [`FpFormat::Unknown`], and
//! returns a canonical quiet NaN in the requested format so the corruption is
//! deterministic and visible.
//!
//! In 32-bit FPR mode (Status.FR = 0) each register holds 32 bits and 64-bit
//! formats occupy an even/odd pair, low half in the even register. Naming an
//! odd register for a 64-bit format raises reserved-instruction.

use crate::common::constants::FPR_COUNT;
use crate::common::Exception;

/// Canonical quiet NaN bit patterns substituted on a format-mismatched read.
const CANONICAL_QNAN_32: u32 = 0x7FC0_0000;
const CANONICAL_QNAN_64: u64 = 0x7FF8_0000_0000_0000;

/// Value format last written to a floating-point register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FpFormat {
    /// IEEE binary32.
    Single,
    /// IEEE binary64.
    Double,
    /// 32-bit fixed point (integer).
    Word,
    /// 64-bit fixed point (integer).
    Long,
    /// Two packed IEEE binary32 values.
    PairedSingle,
    /// Raw bits of no particular format; any read reinterprets them.
    #[default]
    Unknown,
}

impl FpFormat {
    /// True for formats occupying 64 bits.
    #[inline]
    fn is_wide(self) -> bool {
        matches!(self, Self::Double | Self::Long | Self::PairedSingle)
    }
}

/// The format-tagged floating-point register file.
#[derive(Debug, Clone)]
pub struct FprFile {
    regs: [u64; FPR_COUNT],
    tags: [FpFormat; FPR_COUNT],
    fr32: bool,
}

impl FprFile {
    /// Creates a zeroed register file. `fr32` selects 32-bit FPR mode.
    pub fn new(fr32: bool) -> Self {
        Self {
            regs: [0; FPR_COUNT],
            tags: [FpFormat::Unknown; FPR_COUNT],
            fr32,
        }
    }

    /// Rejects odd register numbers for 64-bit formats in 32-bit FPR mode.
    fn check_pairing(&self, idx: usize, fmt: FpFormat) -> Result<(), Exception> {
        if self.fr32 && fmt.is_wide() && idx % 2 != 0 {
            return Err(Exception::ReservedInstruction(0));
        }
        Ok(())
    }

    /// Raw 64-bit read, honoring even/odd pairing in 32-bit FPR mode.
    fn raw64(&self, idx: usize) -> u64 {
        if self.fr32 {
            let lo = self.regs[idx] & 0xFFFF_FFFF;
            let hi = self.regs[(idx + 1) % FPR_COUNT] & 0xFFFF_FFFF;
            (hi << 32) | lo
        } else {
            self.regs[idx]
        }
    }

    /// Raw 64-bit write, honoring even/odd pairing in 32-bit FPR mode.
    fn set_raw64(&mut self, idx: usize, value: u64) {
        if self.fr32 {
            self.regs[idx] = value & 0xFFFF_FFFF;
            self.regs[(idx + 1) % FPR_COUNT] = value >> 32;
        } else {
            self.regs[idx] = value;
        }
    }

    /// Checks the register's tag against the format being read.
    ///
    /// Returns true when the stored bits may be handed out. On a mismatch the
    /// tag is demoted to `Unknown` and the caller substitutes a canonical NaN.
    fn tag_check(&mut self, idx: usize, fmt: FpFormat) -> bool {
        let tag = self.tags[idx];
        if tag == fmt || tag == FpFormat::Unknown {
            return true;
        }
        tracing::warn!(
            register = idx,
            tagged = ?tag,
            read_as = ?fmt,
            "floating-point register read under mismatched format"
        );
        self.tags[idx] = FpFormat::Unknown;
        false
    }

    /// Reads register `idx` as a single.
    pub fn read_single(&mut self, idx: usize) -> f32 {
        if self.tag_check(idx, FpFormat::Single) {
            f32::from_bits(self.regs[idx] as u32)
        } else {
            f32::from_bits(CANONICAL_QNAN_32)
        }
    }

    /// Writes a single to register `idx` and tags it.
    pub fn write_single(&mut self, idx: usize, value: f32) {
        self.regs[idx] = u64::from(value.to_bits());
        self.tags[idx] = FpFormat::Single;
    }

    /// Reads register `idx` as a 32-bit fixed-point word.
    pub fn read_word(&mut self, idx: usize) -> i32 {
        if self.tag_check(idx, FpFormat::Word) {
            self.regs[idx] as u32 as i32
        } else {
            CANONICAL_QNAN_32 as i32
        }
    }

    /// Writes a 32-bit fixed-point word to register `idx` and tags it.
    pub fn write_word(&mut self, idx: usize, value: i32) {
        self.regs[idx] = u64::from(value as u32);
        self.tags[idx] = FpFormat::Word;
    }

    /// Reads register `idx` as a double.
    ///
    /// # Errors
    ///
    /// Reserved-instruction for an odd register number in 32-bit FPR mode.
    pub fn read_double(&mut self, idx: usize) -> Result<f64, Exception> {
        self.check_pairing(idx, FpFormat::Double)?;
        if self.tag_check(idx, FpFormat::Double) {
            Ok(f64::from_bits(self.raw64(idx)))
        } else {
            Ok(f64::from_bits(CANONICAL_QNAN_64))
        }
    }

    /// Writes a double to register `idx` and tags it.
    ///
    /// # Errors
    ///
    /// Reserved-instruction for an odd register number in 32-bit FPR mode.
    pub fn write_double(&mut self, idx: usize, value: f64) -> Result<(), Exception> {
        self.check_pairing(idx, FpFormat::Double)?;
        self.set_raw64(idx, value.to_bits());
        self.tags[idx] = FpFormat::Double;
        Ok(())
    }

    /// Reads register `idx` as a 64-bit fixed-point long.
    ///
    /// # Errors
    ///
    /// Reserved-instruction for an odd register number in 32-bit FPR mode.
    pub fn read_long(&mut self, idx: usize) -> Result<i64, Exception> {
        self.check_pairing(idx, FpFormat::Long)?;
        if self.tag_check(idx, FpFormat::Long) {
            Ok(self.raw64(idx) as i64)
        } else {
            Ok(CANONICAL_QNAN_64 as i64)
        }
    }

    /// Writes a 64-bit fixed-point long to register `idx` and tags it.
    ///
    /// # Errors
    ///
    /// Reserved-instruction for an odd register number in 32-bit FPR mode.
    pub fn write_long(&mut self, idx: usize, value: i64) -> Result<(), Exception> {
        self.check_pairing(idx, FpFormat::Long)?;
        self.set_raw64(idx, value as u64);
        self.tags[idx] = FpFormat::Long;
        Ok(())
    }

    /// Reads register `idx` as a paired single, returned as (lower, upper).
    ///
    /// # Errors
    ///
    /// Reserved-instruction for an odd register number in 32-bit FPR mode.
    pub fn read_paired(&mut self, idx: usize) -> Result<(f32, f32), Exception> {
        self.check_pairing(idx, FpFormat::PairedSingle)?;
        let bits = if self.tag_check(idx, FpFormat::PairedSingle) {
            self.raw64(idx)
        } else {
            (u64::from(CANONICAL_QNAN_32) << 32) | u64::from(CANONICAL_QNAN_32)
        };
        Ok((
            f32::from_bits(bits as u32),
            f32::from_bits((bits >> 32) as u32),
        ))
    }

    /// Writes a (lower, upper) paired single to register `idx` and tags it.
    ///
    /// # Errors
    ///
    /// Reserved-instruction for an odd register number in 32-bit FPR mode.
    pub fn write_paired(&mut self, idx: usize, lo: f32, hi: f32) -> Result<(), Exception> {
        self.check_pairing(idx, FpFormat::PairedSingle)?;
        let bits = (u64::from(hi.to_bits()) << 32) | u64::from(lo.to_bits());
        self.set_raw64(idx, bits);
        self.tags[idx] = FpFormat::PairedSingle;
        Ok(())
    }

    /// Raw 32-bit read for register moves and word stores. Never tag-checked.
    pub fn read_raw32(&self, idx: usize) -> u32 {
        self.regs[idx] as u32
    }

    /// Raw 32-bit write for register moves and word loads. Tags `Unknown`.
    pub fn write_raw32(&mut self, idx: usize, value: u32) {
        self.regs[idx] = u64::from(value);
        self.tags[idx] = FpFormat::Unknown;
    }

    /// Raw 64-bit read for register moves and doubleword stores.
    pub fn read_raw64(&self, idx: usize) -> u64 {
        self.raw64(idx)
    }

    /// Raw 64-bit write for register moves and doubleword loads. Tags
    /// `Unknown`.
    pub fn write_raw64(&mut self, idx: usize, value: u64) {
        self.set_raw64(idx, value);
        self.tags[idx] = FpFormat::Unknown;
    }

    /// Format tag currently carried by register `idx`.
    pub fn tag(&self, idx: usize) -> FpFormat {
        self.tags[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_read_returns_canonical_nan_and_demotes_tag() {
        let mut fpr = FprFile::new(false);
        fpr.write_single(4, 1.5);
        let got = fpr.read_double(4).unwrap();
        assert_eq!(got.to_bits(), CANONICAL_QNAN_64);
        assert_eq!(fpr.tag(4), FpFormat::Unknown);
        // Unknown tags reinterpret silently afterward.
        assert_eq!(fpr.read_single(4), 1.5);
    }

    #[test]
    fn raw_writes_are_untyped() {
        let mut fpr = FprFile::new(false);
        fpr.write_raw64(2, 0x3FF0_0000_0000_0000);
        assert_eq!(fpr.read_double(2).unwrap(), 1.0);
    }

    #[test]
    fn fr32_mode_splits_doubles_across_a_pair() {
        let mut fpr = FprFile::new(true);
        fpr.write_double(6, 2.0).unwrap();
        assert_eq!(fpr.read_double(6).unwrap(), 2.0);
        let bits = 2.0_f64.to_bits();
        assert_eq!(fpr.read_raw32(6), bits as u32);
        assert_eq!(fpr.read_raw32(7), (bits >> 32) as u32);
    }

    #[test]
    fn fr32_mode_rejects_odd_double_registers() {
        let mut fpr = FprFile::new(true);
        assert!(matches!(
            fpr.write_double(7, 1.0),
            Err(Exception::ReservedInstruction(_))
        ));
    }
}
