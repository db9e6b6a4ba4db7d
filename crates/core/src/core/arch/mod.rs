//! Architectural register state.
//!
//! The register files of the machine:
//! 1. **GPR:** 32 general-purpose registers with a hardwired zero.
//! 2. **FPR:** 32 format-tagged floating-point registers.
//! 3. **FCSR:** Floating-point control and status register.
//! 4. **CP0:** Reduced system coprocessor (Status, Cause, EPC, BadVAddr).

/// System coprocessor registers.
pub mod cp0;

/// Floating-point control and status register.
pub mod fcsr;

/// Format-tagged floating-point register file.
pub mod fpr;

/// General-purpose register file.
pub mod gpr;

pub use cp0::Cp0;
pub use fcsr::{Fcsr, RoundingMode};
pub use fpr::{FpFormat, FprFile};
pub use gpr::GprFile;
