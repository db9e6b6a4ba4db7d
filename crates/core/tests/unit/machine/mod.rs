//! Whole-machine scenario tests.

/// Load-linked / store-conditional sequences.
pub mod atomics;

/// Jumps, branches, and delay-slot interplay.
pub mod control_flow;

/// Status.RE reversed byte order.
pub mod endianness;

/// FPU operations driven through the instruction pipeline.
pub mod float_pipeline;

/// Exception entry, return, and interrupt delivery.
pub mod traps;

/// Left/right merge loads and stores at unaligned addresses.
pub mod unaligned;

/// Vector operations driven through the instruction pipeline.
pub mod vector_pipeline;
