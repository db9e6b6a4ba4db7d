//! The execution core.
//!
//! [`Cpu`] owns the architectural register state and the execution units,
//! and advances one instruction per [`Cpu::step`] call. Memory stays
//! outside the core and is borrowed per step.

use crate::common::{Exception, SimFault};
use crate::config::Config;
use crate::core::arch::{Cp0, Fcsr, FprFile, GprFile};
use crate::core::units::lsu::Lsu;
use crate::core::units::vu::Accumulator;

use pending::PendingQueue;

mod dispatch;
mod execution;
pub mod pending;

pub use execution::StepOutcome;

/// A failure raised during instruction execution.
///
/// Architectural exceptions redirect the guest to its handler; simulator
/// faults abort the run.
#[derive(Debug)]
pub(crate) enum ExecFault {
    Arch(Exception),
    Sim(SimFault),
}

impl From<Exception> for ExecFault {
    fn from(e: Exception) -> Self {
        Self::Arch(e)
    }
}

impl From<SimFault> for ExecFault {
    fn from(f: SimFault) -> Self {
        Self::Sim(f)
    }
}

/// One emulated processor core.
#[derive(Debug)]
pub struct Cpu {
    /// Program counter of the next instruction to execute.
    pub pc: u64,
    /// General-purpose registers.
    pub gpr: GprFile,
    /// Floating-point registers with format tags.
    pub fpr: FprFile,
    /// Floating-point control and status.
    pub fcsr: Fcsr,
    /// System control coprocessor.
    pub cp0: Cp0,
    /// Vector-unit wide accumulator.
    pub acc: Accumulator,
    /// Load/store unit, including the LL/SC reservation.
    pub lsu: Lsu,
    pending: PendingQueue,
    hi: u64,
    lo: u64,
    /// Target of a taken branch, applied after its delay slot retires.
    delayed_branch: Option<u64>,
    halted: bool,
    /// Compact-encoding fetch mode; such pages decode as reserved.
    isa16: bool,
}

impl Cpu {
    /// Builds a core in its reset state for the given configuration.
    pub fn new(config: &Config) -> Self {
        let fr32 = config.machine.fpr32;
        Self {
            pc: config.general.start_pc,
            gpr: GprFile::default(),
            fpr: FprFile::new(fr32),
            fcsr: Fcsr::default(),
            cp0: Cp0::new(!fr32, config.machine.vector_base),
            acc: Accumulator::default(),
            lsu: Lsu::new(config.machine.endianness),
            pending: PendingQueue::default(),
            hi: 0,
            lo: 0,
            delayed_branch: None,
            halted: false,
            isa16: false,
        }
    }

    /// HI multiply/divide result register.
    pub fn hi(&self) -> u64 {
        self.hi
    }

    /// LO multiply/divide result register.
    pub fn lo(&self) -> u64 {
        self.lo
    }

    /// True once the halt encoding has retired.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Switches the fetch unit to the compact instruction page mode.
    pub fn set_isa16(&mut self, enabled: bool) {
        self.isa16 = enabled;
    }
}
