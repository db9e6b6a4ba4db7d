//! Whole-machine test harness.
//!
//! Builds a simulator whose exception vector lands inside the memory image
//! and holds a breakpoint, so any trap runs the machine to a clean halt the
//! scenarios can assert against.

use mipsim_core::config::MachineConfig;
use mipsim_core::sim::{loader, RunExit, Simulator};
use mipsim_core::Config;

use super::asm;

/// Where scenario programs are placed.
pub const PROGRAM_BASE: u64 = 0x1000;

/// Exception vector region base, relocated clear of the program region.
pub const VECTOR_BASE: u64 = 0x4000;

/// The general exception entry point (vector base + 0x180).
pub const HANDLER: u64 = VECTOR_BASE + 0x180;

/// Scratch data region the load/store scenarios use.
pub const DATA_BASE: u64 = 0x8000;

/// Step budget; every scenario program halts well inside this.
const STEP_BUDGET: u64 = 10_000;

/// A machine instance prepared for scenario programs.
pub struct TestMachine {
    /// The machine under test.
    pub sim: Simulator,
}

/// Installs the trace subscriber once, honoring `RUST_LOG`.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl TestMachine {
    /// Boots a big-endian machine with a halting exception handler.
    pub fn new() -> Self {
        init_tracing();
        let config = Config {
            machine: MachineConfig {
                vector_base: VECTOR_BASE,
                ..MachineConfig::default()
            },
            ..Config::default()
        };
        let mut sim = Simulator::new(&config);
        loader::load_flat(&mut sim.mem, &asm::break_().to_be_bytes(), HANDLER).unwrap();
        Self { sim }
    }

    /// Places a program at [`PROGRAM_BASE`] and points the core at it.
    pub fn load(&mut self, words: &[u32]) {
        let mut image = Vec::with_capacity(words.len() * 4);
        for w in words {
            image.extend_from_slice(&w.to_be_bytes());
        }
        self.sim.load_flat(&image, PROGRAM_BASE).unwrap();
    }

    /// Runs to the halt encoding, failing the test if the budget runs out.
    pub fn run_to_halt(&mut self) {
        assert_eq!(self.sim.run(STEP_BUDGET).unwrap(), RunExit::Halted);
    }

    /// Loads a program and runs it to the halt encoding.
    pub fn execute(&mut self, words: &[u32]) {
        self.load(words);
        self.run_to_halt();
    }

    /// General-purpose register value.
    pub fn gpr(&self, idx: usize) -> u64 {
        self.sim.cpu.gpr.read(idx)
    }

    /// System coprocessor register value.
    pub fn cp0(&self, num: u8) -> u64 {
        self.sim.cpu.cp0.read(num)
    }

    /// True if the machine halted inside the exception handler.
    pub fn halted_in_handler(&self) -> bool {
        self.sim.cpu.is_halted() && self.sim.cpu.pc == HANDLER
    }

    /// ExcCode field of the Cause register.
    pub fn exc_code(&self) -> u32 {
        use mipsim_core::core::arch::cp0::{cause, reg};
        ((self.cp0(reg::CAUSE) & cause::EXC_CODE_MASK) >> cause::EXC_CODE_SHIFT) as u32
    }
}

impl Default for TestMachine {
    fn default() -> Self {
        Self::new()
    }
}
