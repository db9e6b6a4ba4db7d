//! The emulated processor.
//!
//! Architectural register state, the execution units, and the execution
//! core that drives them one instruction slot at a time.

/// Architectural register state (GPR, FPR, FCSR, CP0).
pub mod arch;

/// The execution core and its fetch/decode/execute loop.
pub mod cpu;

/// Execution units (ALU, FPU, LSU, vector unit).
pub mod units;

pub use self::cpu::Cpu;
