//! MIPS64-class instruction-set simulation engine.
//!
//! This crate implements a bit-exact interpreter for a 64-bit MIPS-like
//! machine with the following:
//! 1. **Core:** Fetch/decode/execute loop with delay slots, precise
//!    exceptions, interrupts, and a pending-write queue for delayed results.
//! 2. **Units:** Flagged integer ALU, IEEE-754 FPU with MIPS rounding modes
//!    and two-step-rounded fused operations, packed-integer vector unit with
//!    wide accumulators, and an endianness-aware load/store unit.
//! 3. **ISA:** Decoding for the integer, COP0, COP1/COP1X, and vector
//!    instruction pages.
//! 4. **Simulation:** ELF/flat loading, configuration, and statistics.

/// Common types and constants (addresses, exceptions, machine constants).
pub mod common;
/// Simulator configuration (defaults, byte order, hierarchical structures).
pub mod config;
/// CPU core (register state, execution units, the step loop).
pub mod core;
/// Instruction set (encoding constants, decoded forms, the decoder).
pub mod isa;
/// Physical memory image.
pub mod mem;
/// Program loading and the top-level simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The processor core.
pub use crate::core::Cpu;
/// The physical memory image.
pub use crate::mem::Memory;
/// The top-level machine: core, memory, and statistics.
pub use crate::sim::Simulator;
