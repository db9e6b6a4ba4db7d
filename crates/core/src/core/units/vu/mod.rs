//! Packed-SIMD vector unit.
//!
//! Element-wise integer SIMD over 64-bit registers in two lane
//! configurations, with a per-lane wide accumulator bank:
//! 1. **Lanes:** Packing, unpacking, and second-operand addressing modes.
//! 2. **Ops:** Saturating arithmetic, logic, shifts, compares, pick,
//!    and fixed shuffles.
//! 3. **Accumulator:** Multiply-accumulate lanes wider than any product,
//!    read back through six rounding-reduction policies.

/// Wide accumulator bank and rounding reduction.
pub mod accumulator;

/// Lane packing and operand selection.
pub mod lanes;

/// Lane-wise operations.
pub mod ops;

pub use accumulator::{AccOp, Accumulator, ReduceRounding};
pub use lanes::{OperandSelect, VecFormat};
pub use ops::Shuffle;
