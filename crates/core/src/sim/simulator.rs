//! Simulator: owns the core and the memory image side by side.
//!
//! Keeping memory outside [`Cpu`] lets the execution core borrow it per
//! step without interior mutability.

use crate::common::SimFault;
use crate::config::Config;
use crate::core::cpu::StepOutcome;
use crate::core::Cpu;
use crate::mem::Memory;
use crate::stats::SimStats;

use super::loader::{self, LoadError};

/// Why a [`Simulator::run`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The guest executed the halt encoding.
    Halted,
    /// The step budget ran out first.
    StepLimit,
}

/// Top-level simulator: core, memory image, and statistics.
#[derive(Debug)]
pub struct Simulator {
    /// The processor core.
    pub cpu: Cpu,
    /// The physical memory image.
    pub mem: Memory,
    /// Execution statistics.
    pub stats: SimStats,
    trace: bool,
}

impl Simulator {
    /// Creates a machine in its reset state for the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            cpu: Cpu::new(config),
            mem: Memory::new(config.memory.base, config.memory.size),
            stats: SimStats::default(),
            trace: config.general.trace,
        }
    }

    /// Loads an ELF64 executable and points the core at its entry.
    ///
    /// # Errors
    ///
    /// Propagates loader failures; the core is left untouched on error.
    pub fn load_elf(&mut self, data: &[u8]) -> Result<(), LoadError> {
        let entry = loader::load_elf(&mut self.mem, data)?;
        self.cpu.pc = entry;
        Ok(())
    }

    /// Loads a flat binary at `addr` and points the core at it.
    ///
    /// # Errors
    ///
    /// Propagates loader failures; the core is left untouched on error.
    pub fn load_flat(&mut self, data: &[u8], addr: u64) -> Result<(), LoadError> {
        loader::load_flat(&mut self.mem, data, addr)?;
        self.cpu.pc = addr;
        Ok(())
    }

    /// Advances the machine by one instruction slot.
    ///
    /// # Errors
    ///
    /// A [`SimFault`] reports an internal engine failure.
    pub fn step(&mut self) -> Result<StepOutcome, SimFault> {
        if self.trace {
            tracing::debug!(pc = format_args!("{:#x}", self.cpu.pc), "step");
        }
        self.cpu.step(&mut self.mem, &mut self.stats)
    }

    /// Runs until the guest halts or `max_steps` slots have elapsed.
    ///
    /// # Errors
    ///
    /// A [`SimFault`] reports an internal engine failure.
    pub fn run(&mut self, max_steps: u64) -> Result<RunExit, SimFault> {
        for _ in 0..max_steps {
            if self.step()? == StepOutcome::Halted {
                return Ok(RunExit::Halted);
            }
        }
        Ok(RunExit::StepLimit)
    }
}
