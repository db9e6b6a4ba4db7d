//! Shared test infrastructure.

/// Machine harness: a configured simulator with an in-memory exception
/// handler, plus program loading helpers.
pub mod harness;

/// Raw instruction word builders.
pub mod asm;
