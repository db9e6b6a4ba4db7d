//! System coprocessor (CP0) state.
//!
//! A reduced CP0 carrying the registers the execution loop needs:
//! 1. **Status:** Interrupt enable, exception level, interrupt masks, and the
//!    reverse-endian and FPU-width mode bits.
//! 2. **Cause:** Exception code, pending-interrupt lines, branch-delay flag.
//! 3. **EPC / BadVAddr:** Exception return address and faulting address.
//! 4. **Count / Compare:** Free-running counter and its match register.

use crate::common::constants::GENERAL_VECTOR_OFFSET;
use crate::common::Exception;

/// CP0 register numbers accepted by MFC0/MTC0.
pub mod reg {
    /// BadVAddr: faulting virtual address.
    pub const BADVADDR: u8 = 8;
    /// Count: free-running counter.
    pub const COUNT: u8 = 9;
    /// Compare: counter match register.
    pub const COMPARE: u8 = 11;
    /// Status: processor mode bits.
    pub const STATUS: u8 = 12;
    /// Cause: last exception description.
    pub const CAUSE: u8 = 13;
    /// EPC: exception return address.
    pub const EPC: u8 = 14;
    /// PRId: processor identification (read-only).
    pub const PRID: u8 = 15;
}

/// Status register bit assignments.
pub mod status {
    pub const IE: u64 = 1 << 0;
    pub const EXL: u64 = 1 << 1;
    pub const IM_SHIFT: u32 = 8;
    pub const IM_MASK: u64 = 0xFF << IM_SHIFT;
    pub const RE: u64 = 1 << 25;
    pub const FR: u64 = 1 << 26;
}

/// Cause register bit assignments.
pub mod cause {
    pub const EXC_CODE_SHIFT: u32 = 2;
    pub const EXC_CODE_MASK: u64 = 0x1F << EXC_CODE_SHIFT;
    pub const IP_SHIFT: u32 = 8;
    pub const IP_MASK: u64 = 0xFF << IP_SHIFT;
    pub const BD: u64 = 1 << 31;
}

/// Identification word reported by PRId reads.
const PRID_VALUE: u64 = 0x0001_8000;

/// Number of external interrupt lines (IP0/IP1 are software interrupts).
pub const INTERRUPT_LINES: u8 = 8;

/// The system coprocessor register file.
#[derive(Debug, Clone)]
pub struct Cp0 {
    status: u64,
    cause: u64,
    epc: u64,
    badvaddr: u64,
    count: u64,
    compare: u64,
    vector_base: u64,
}

impl Cp0 {
    /// Creates the reset-state coprocessor. `fr` selects 64-bit FPR mode and
    /// `vector_base` anchors the exception vector region.
    pub fn new(fr: bool, vector_base: u64) -> Self {
        let mut st = status::EXL;
        if fr {
            st |= status::FR;
        }
        Self {
            status: st,
            cause: 0,
            epc: 0,
            badvaddr: 0,
            count: 0,
            compare: 0,
            vector_base,
        }
    }

    /// Reads CP0 register `num`; unknown numbers read as zero.
    pub fn read(&self, num: u8) -> u64 {
        match num {
            reg::BADVADDR => self.badvaddr,
            reg::COUNT => self.count,
            reg::COMPARE => self.compare,
            reg::STATUS => self.status,
            reg::CAUSE => self.cause,
            reg::EPC => self.epc,
            reg::PRID => PRID_VALUE,
            _ => 0,
        }
    }

    /// Writes CP0 register `num`; read-only and unknown numbers are ignored.
    pub fn write(&mut self, num: u8, value: u64) {
        match num {
            reg::BADVADDR | reg::PRID => {}
            reg::COUNT => self.count = value,
            reg::COMPARE => self.compare = value,
            reg::STATUS => self.status = value,
            reg::CAUSE => {
                // Only the software-interrupt bits (IP0/IP1) are writable.
                let writable = 0b11 << cause::IP_SHIFT;
                self.cause = (self.cause & !writable) | (value & writable);
            }
            reg::EPC => self.epc = value,
            _ => {}
        }
    }

    /// Advances the Count register by one tick.
    #[inline]
    pub fn tick(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    /// True when the Status.RE bit requests reversed-endian data accesses.
    #[inline]
    pub fn reverse_endian(&self) -> bool {
        self.status & status::RE != 0
    }

    /// Asserts external interrupt line `line` (0-7).
    pub fn assert_interrupt(&mut self, line: u8) {
        debug_assert!(line < INTERRUPT_LINES);
        self.cause |= 1 << (cause::IP_SHIFT + u32::from(line));
    }

    /// Deasserts external interrupt line `line` (0-7).
    pub fn clear_interrupt(&mut self, line: u8) {
        debug_assert!(line < INTERRUPT_LINES);
        self.cause &= !(1 << (cause::IP_SHIFT + u32::from(line)));
    }

    /// True when an unmasked interrupt is pending and interrupts are
    /// globally enabled.
    pub fn interrupt_pending(&self) -> bool {
        if self.status & status::IE == 0 || self.status & status::EXL != 0 {
            return false;
        }
        let pending = (self.cause & cause::IP_MASK) >> cause::IP_SHIFT;
        let mask = (self.status & status::IM_MASK) >> status::IM_SHIFT;
        pending & mask != 0
    }

    /// Records exception state and returns the handler address.
    ///
    /// `epc` is the restart address (the branch itself when the faulting
    /// instruction sat in a delay slot, signaled by `in_delay_slot`).
    pub fn enter_exception(&mut self, exc: &Exception, epc: u64, in_delay_slot: bool) -> u64 {
        self.cause = (self.cause & !cause::EXC_CODE_MASK)
            | (u64::from(exc.code()) << cause::EXC_CODE_SHIFT);
        if in_delay_slot {
            self.cause |= cause::BD;
        } else {
            self.cause &= !cause::BD;
        }
        match exc {
            Exception::AddressErrorLoad(addr) | Exception::AddressErrorStore(addr) => {
                self.badvaddr = *addr;
            }
            _ => {}
        }
        self.epc = epc;
        self.status |= status::EXL;
        self.vector_base.wrapping_add(GENERAL_VECTOR_OFFSET)
    }

    /// Returns from exception level, yielding the restart address.
    pub fn eret(&mut self) -> u64 {
        self.status &= !status::EXL;
        self.epc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupts_masked_while_exl_set() {
        let mut cp0 = Cp0::new(true, 0x8000_0000);
        cp0.write(reg::STATUS, status::IE | status::EXL | status::IM_MASK);
        cp0.assert_interrupt(2);
        assert!(!cp0.interrupt_pending());
        cp0.write(reg::STATUS, status::IE | status::IM_MASK);
        assert!(cp0.interrupt_pending());
    }

    #[test]
    fn exception_entry_records_bd_and_epc() {
        let mut cp0 = Cp0::new(true, 0x8000_0000);
        let vector = cp0.enter_exception(&Exception::Syscall, 0x1000, true);
        assert_eq!(vector, 0x8000_0180);
        assert_eq!(cp0.read(reg::EPC), 0x1000);
        assert_ne!(cp0.read(reg::CAUSE) & cause::BD, 0);
        assert_eq!(
            (cp0.read(reg::CAUSE) & cause::EXC_CODE_MASK) >> cause::EXC_CODE_SHIFT,
            8
        );
    }

    #[test]
    fn address_error_latches_badvaddr() {
        let mut cp0 = Cp0::new(true, 0x8000_0000);
        let _ = cp0.enter_exception(&Exception::AddressErrorLoad(0xDEAD), 0, false);
        assert_eq!(cp0.read(reg::BADVADDR), 0xDEAD);
    }
}
