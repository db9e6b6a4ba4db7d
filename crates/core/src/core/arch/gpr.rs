//! General-purpose register file.

use crate::common::constants::GPR_COUNT;

/// Index of the hardwired zero register.
const REG_ZERO: usize = 0;

/// The 32-entry general-purpose register file.
///
/// Register 0 reads as zero and ignores writes, matching the architectural
/// contract; no caller needs to special-case it.
#[derive(Debug, Clone)]
pub struct GprFile {
    regs: [u64; GPR_COUNT],
}

impl Default for GprFile {
    fn default() -> Self {
        Self {
            regs: [0; GPR_COUNT],
        }
    }
}

impl GprFile {
    /// Reads register `idx`.
    #[inline(always)]
    pub fn read(&self, idx: usize) -> u64 {
        self.regs[idx]
    }

    /// Writes `value` to register `idx`. Writes to register 0 are discarded.
    #[inline(always)]
    pub fn write(&mut self, idx: usize, value: u64) {
        if idx != REG_ZERO {
            self.regs[idx] = value;
        }
    }
}
