//! Simulation statistics collection and reporting.
//!
//! This module tracks execution metrics for the simulator:
//! 1. **Progress:** Retired instruction count and elapsed host time.
//! 2. **Instruction mix:** Counts by category (ALU, load, store, branch, FP, vector).
//! 3. **Exceptions:** Architectural exceptions and interrupts taken.

use std::time::Instant;

/// Simulation statistics structure tracking all execution metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Count of integer ALU instructions retired.
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of branch/jump instructions retired.
    pub inst_branch: u64,
    /// Count of floating-point instructions retired.
    pub inst_fp: u64,
    /// Count of vector (MDMX) instructions retired.
    pub inst_vector: u64,
    /// Count of system (coprocessor-0, trap, syscall) instructions retired.
    pub inst_system: u64,

    /// Number of architectural exceptions taken (including interrupts).
    pub exceptions_taken: u64,
    /// Number of interrupts accepted.
    pub interrupts_taken: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_fp: 0,
            inst_vector: 0,
            inst_system: 0,
            exceptions_taken: 0,
            interrupts_taken: 0,
        }
    }
}

impl SimStats {
    /// Prints all statistics to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let instr = if self.instructions_retired == 0 {
            1
        } else {
            self.instructions_retired
        };
        let mips = (self.instructions_retired as f64 / seconds) / 1_000_000.0;

        println!("\n==========================================================");
        println!("MIPS64 SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_mips                 {:.2}", mips);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        let pct = |n: u64| (n as f64 / instr as f64) * 100.0;
        println!("  op.alu                 {} ({:.2}%)", self.inst_alu, pct(self.inst_alu));
        println!("  op.load                {} ({:.2}%)", self.inst_load, pct(self.inst_load));
        println!("  op.store               {} ({:.2}%)", self.inst_store, pct(self.inst_store));
        println!("  op.branch              {} ({:.2}%)", self.inst_branch, pct(self.inst_branch));
        println!("  op.fp                  {} ({:.2}%)", self.inst_fp, pct(self.inst_fp));
        println!("  op.vector              {} ({:.2}%)", self.inst_vector, pct(self.inst_vector));
        println!("  op.system              {} ({:.2}%)", self.inst_system, pct(self.inst_system));
        println!("----------------------------------------------------------");
        println!("  exceptions             {}", self.exceptions_taken);
        println!("  interrupts             {}", self.interrupts_taken);
        println!("==========================================================");
    }
}
