//! Common types and constants shared by every subsystem.
//!
//! This module collects the vocabulary types of the engine:
//! 1. **Addresses:** Strongly typed virtual and physical addresses.
//! 2. **Constants:** Register counts, instruction sizes, vector layout.
//! 3. **Errors:** Architectural exceptions and internal simulator faults.

/// Virtual and physical address types.
pub mod addr;

/// Global machine constants.
pub mod constants;

/// Architectural exceptions and simulator faults.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use error::{Exception, SimFault};
