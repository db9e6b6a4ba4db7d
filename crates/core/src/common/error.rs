//! Architectural exceptions and simulator faults.
//!
//! This module defines the two error families of the engine:
//! 1. **Architectural Exceptions:** Synchronous, precise events that redirect the
//!    program counter to a handler vector. To guest software these are normal
//!    control flow, not errors.
//! 2. **Simulator Faults:** Internal invariant violations, such as a
//!    pending-queue overflow. These are fatal to the simulation run and are
//!    never visible to guest software.

use std::fmt;

/// Architectural exception causes.
///
/// Each variant corresponds to an ExcCode value written into the Cause register
/// when the processor transfers control to the exception vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exception {
    /// Asynchronous interrupt accepted at an instruction boundary.
    Interrupt,

    /// Address error on a load or instruction fetch.
    ///
    /// Raised when a load or fetch is misaligned for its access length, or
    /// falls outside the physical memory image. The associated value is the
    /// faulting virtual address.
    AddressErrorLoad(u64),

    /// Address error on a store.
    ///
    /// The associated value is the faulting virtual address.
    AddressErrorStore(u64),

    /// Syscall instruction executed.
    Syscall,

    /// Breakpoint instruction executed.
    ///
    /// The associated value is the code field of the BREAK encoding.
    Breakpoint(u32),

    /// Reserved or unimplemented instruction encoding.
    ///
    /// Also raised for odd double-precision register numbers in 32-bit FPR
    /// mode. The associated value is the instruction word.
    ReservedInstruction(u32),

    /// Coprocessor-unusable exception.
    ///
    /// The associated value is the coprocessor number (0-3).
    CoprocessorUnusable(u8),

    /// Two's-complement overflow from a trapping add or subtract.
    IntegerOverflow,

    /// Conditional trap instruction (TEQ and friends) fired.
    Trap,

    /// Floating-point exception: an enabled (or always-fatal) cause bit was
    /// raised by an FPU operation before its result committed.
    FloatingPoint,
}

impl Exception {
    /// Returns the ExcCode value stored in the Cause register for this
    /// exception, per the MIPS privileged-architecture encoding.
    pub fn code(&self) -> u32 {
        match self {
            Self::Interrupt => 0,
            Self::AddressErrorLoad(_) => 4,
            Self::AddressErrorStore(_) => 5,
            Self::Syscall => 8,
            Self::Breakpoint(_) => 9,
            Self::ReservedInstruction(_) => 10,
            Self::CoprocessorUnusable(_) => 11,
            Self::IntegerOverflow => 12,
            Self::Trap => 13,
            Self::FloatingPoint => 15,
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "Interrupt"),
            Self::AddressErrorLoad(addr) => write!(f, "AddressErrorLoad({:#x})", addr),
            Self::AddressErrorStore(addr) => write!(f, "AddressErrorStore({:#x})", addr),
            Self::Syscall => write!(f, "Syscall"),
            Self::Breakpoint(code) => write!(f, "Breakpoint({})", code),
            Self::ReservedInstruction(inst) => write!(f, "ReservedInstruction({:#010x})", inst),
            Self::CoprocessorUnusable(cp) => write!(f, "CoprocessorUnusable(cp{})", cp),
            Self::IntegerOverflow => write!(f, "IntegerOverflow"),
            Self::Trap => write!(f, "Trap"),
            Self::FloatingPoint => write!(f, "FloatingPoint"),
        }
    }
}

impl std::error::Error for Exception {}

/// Internal simulator faults.
///
/// These indicate a broken engine invariant, not a guest-program error. They
/// propagate to the top-level harness and terminate the run with a diagnostic
/// clearly distinct from any guest-visible behavior.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SimFault {
    /// The pending-write queue was asked to hold more entries than its fixed
    /// capacity. The queue drains fully between instruction slots and is
    /// sized for the widest producer, so this can only happen if drain
    /// bookkeeping is broken.
    #[error("pending-write queue overflow (capacity {capacity})")]
    PendingQueueOverflow {
        /// Fixed capacity of the queue.
        capacity: usize,
    },

}
