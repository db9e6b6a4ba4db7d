//! Global machine constants.
//!
//! System-wide constants used across the engine: instruction sizes, register
//! counts, and the exception vector layout.

/// Size of a standard (32-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_32: u64 = 4;

/// Size of a compressed (16-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_16: u64 = 2;

/// Number of general-purpose registers.
pub const GPR_COUNT: usize = 32;

/// Number of floating-point registers.
pub const FPR_COUNT: usize = 32;

/// Number of per-lane wide accumulators in the vector unit (OB format uses
/// all eight; QH format uses the first four).
pub const ACC_LANES: usize = 8;

/// Number of floating-point condition-code bits in the FCSR.
pub const FCC_COUNT: u8 = 8;

/// Fixed capacity of the pending-write queue.
///
/// The queue drains fully between instruction slots, and the widest producer
/// (an eight-lane vector compare) schedules one write per lane; overflow is
/// an engine fault.
pub const PENDING_QUEUE_CAPACITY: usize = 8;

/// Default exception vector base.
///
/// Sits at the bottom of the default memory image so a default-config
/// machine can fetch its handler. The architectural boot-time base
/// (`0xFFFF_FFFF_8000_0000` in kseg0) lies outside the default 16 MiB
/// image; embedders modeling that layout must configure the vector base
/// and the memory geometry together.
pub const DEFAULT_VECTOR_BASE: u64 = 0;

/// Offset of the general exception vector from the vector base.
pub const GENERAL_VECTOR_OFFSET: u64 = 0x180;

/// Link-register index written by JAL/JALR/BLTZAL/BGEZAL.
pub const REG_RA: usize = 31;
