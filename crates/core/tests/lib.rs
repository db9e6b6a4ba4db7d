//! # Engine Testing Library
//!
//! Entry point for the whole-machine test suite. Scenarios here drive the
//! public simulator API end to end: programs are assembled as raw
//! instruction words, loaded through the loader, and run to the halt
//! encoding, with assertions against architectural state afterward.

/// Shared test infrastructure: machine harness and instruction builders.
pub mod common;

/// Whole-machine scenario tests.
pub mod unit;
