//! Instruction set definition.
//!
//! Encoding constants, the decoded instruction sum type, and the decoder.

/// Instruction word decoder.
pub mod decode;

/// Decoded instruction representation.
pub mod instruction;

/// Field extraction and encoding constants.
pub mod opcodes;

pub use decode::decode;
pub use instruction::Instruction;
