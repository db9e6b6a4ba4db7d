//! # Unit Components
//!
//! Scenario tests grouped by the architectural behavior they exercise.
//! Everything here runs whole programs through the public simulator API;
//! the fine-grained per-unit tests live next to their modules in `src/`.

/// Whole-machine scenarios: traps, control flow, the floating-point and
/// vector pipelines, atomics, and byte-order behavior.
pub mod machine;
