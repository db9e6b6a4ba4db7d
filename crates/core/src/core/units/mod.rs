//! Execution units.
//!
//! The four computational subsystems the instruction semantics combine:
//! 1. **ALU:** Flagged integer arithmetic at four widths.
//! 2. **FPU:** IEEE floating point with explicit rounding control.
//! 3. **VU:** Packed-SIMD lanes and wide accumulators.
//! 4. **LSU:** Endianness-aware loads and stores with atomics.

/// Flagged integer arithmetic.
pub mod alu;

/// Floating-point coprocessor operations.
pub mod fpu;

/// Load/store unit.
pub mod lsu;

/// Packed-SIMD vector unit.
pub mod vu;
