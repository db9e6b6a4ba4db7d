//! Simulation orchestration and program loading.

/// ELF and flat-binary loading.
pub mod loader;

/// Top-level simulator loop.
pub mod simulator;

pub use loader::LoadError;
pub use simulator::{RunExit, Simulator};
