//! The fetch/decode/execute loop.
//!
//! One [`Cpu::step`] call retires at most one instruction:
//! 1. **Interrupt poll:** an enabled, pending interrupt preempts the fetch.
//! 2. **Fetch and decode:** the instruction word at `pc`.
//! 3. **Dispatch:** the semantic `match` in the dispatch module.
//! 4. **Advance:** sequential, through a delay slot, or into a handler.
//! 5. **Tick:** the pending-write queue drains and CP0 counters advance.

use crate::common::constants::{INSTRUCTION_SIZE_16, INSTRUCTION_SIZE_32};
use crate::common::{Exception, SimFault, VirtAddr};
use crate::core::units::lsu::AccessLength;
use crate::isa::{decode, Instruction};
use crate::mem::Memory;
use crate::stats::SimStats;

use super::dispatch::Action;
use super::pending::{PendingTarget, PendingWrite};
use super::{Cpu, ExecFault};

/// What a single step left the core doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The core can keep stepping.
    Continue,
    /// The halt encoding retired (or had already retired).
    Halted,
}

impl Cpu {
    /// Advances the core by one instruction slot.
    ///
    /// Architectural exceptions are handled internally by redirecting to
    /// the configured vector; they never surface to the caller.
    ///
    /// # Errors
    ///
    /// A [`SimFault`] reports an internal engine failure and leaves the
    /// machine state unfit for further stepping.
    pub fn step(&mut self, mem: &mut Memory, stats: &mut SimStats) -> Result<StepOutcome, SimFault> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        if self.cp0.interrupt_pending() {
            let in_slot = self.delayed_branch.take().is_some();
            self.take_exception(&Exception::Interrupt, in_slot);
            stats.interrupts_taken += 1;
            stats.exceptions_taken += 1;
            self.finish_tick();
            return Ok(StepOutcome::Continue);
        }

        // A branch retired last slot leaves its target here; this
        // instruction is then its delay slot.
        let slot_target = self.delayed_branch.take();
        let in_slot = slot_target.is_some();

        let outcome = match self.execute_one(mem, stats) {
            Ok(Action::Next) => {
                self.pc = slot_target.unwrap_or_else(|| self.pc.wrapping_add(INSTRUCTION_SIZE_32));
                StepOutcome::Continue
            }
            Ok(Action::Branch(target)) => {
                if in_slot {
                    // A branch inside a delay slot is architecturally
                    // unpredictable; this engine lets the newer branch win.
                    tracing::warn!(pc = format_args!("{:#x}", self.pc), "branch in delay slot");
                }
                self.delayed_branch = Some(target);
                self.pc = self.pc.wrapping_add(INSTRUCTION_SIZE_32);
                StepOutcome::Continue
            }
            Ok(Action::Redirect(target)) => {
                self.pc = target;
                StepOutcome::Continue
            }
            Ok(Action::Halt) => {
                self.halted = true;
                StepOutcome::Halted
            }
            Err(ExecFault::Arch(exc)) => {
                self.take_exception(&exc, in_slot);
                stats.exceptions_taken += 1;
                StepOutcome::Continue
            }
            Err(ExecFault::Sim(fault)) => return Err(fault),
        };

        self.finish_tick();
        Ok(outcome)
    }

    /// Fetches, decodes, and dispatches the instruction at `pc`.
    fn execute_one(&mut self, mem: &mut Memory, stats: &mut SimStats) -> Result<Action, ExecFault> {
        let word = self.fetch(mem)?;
        let inst = decode(word)?;
        tracing::trace!(
            pc = format_args!("{:#x}", self.pc),
            word = format_args!("{word:#010x}"),
            ?inst,
            "execute"
        );
        record_mix(stats, &inst);
        stats.instructions_retired += 1;
        self.dispatch(inst, mem)
    }

    /// Reads the next instruction word. Compact-encoding pages fetch at
    /// halfword granularity but carry no implemented encodings.
    fn fetch(&self, mem: &Memory) -> Result<u32, Exception> {
        let addr = VirtAddr::new(self.pc);
        if self.isa16 {
            debug_assert_eq!(AccessLength::Half.bytes(), INSTRUCTION_SIZE_16);
            let half = self.lsu.load(mem, addr, AccessLength::Half, false)?;
            return Err(Exception::ReservedInstruction(half as u32));
        }
        let word = self.lsu.load(mem, addr, AccessLength::Word, false)?;
        Ok(word as u32)
    }

    /// Redirects into the general exception handler.
    ///
    /// A faulting delay slot reports the branch as its restart point.
    /// In-flight delayed writes are squashed and the reservation drops.
    fn take_exception(&mut self, exc: &Exception, in_slot: bool) {
        let epc = if in_slot {
            self.pc.wrapping_sub(INSTRUCTION_SIZE_32)
        } else {
            self.pc
        };
        tracing::debug!(
            %exc,
            epc = format_args!("{epc:#x}"),
            in_slot,
            "exception taken"
        );
        let vector = self.cp0.enter_exception(exc, epc, in_slot);
        self.pending.clear();
        self.lsu.reservation.clear();
        self.delayed_branch = None;
        self.pc = vector;
    }

    /// End-of-slot bookkeeping: delayed writes land and counters advance.
    fn finish_tick(&mut self) {
        let mut queue = std::mem::take(&mut self.pending);
        queue.drain_tick(|w| self.apply_pending(w));
        self.pending = queue;
        self.cp0.tick();
    }

    fn apply_pending(&mut self, write: &PendingWrite) {
        match write.target {
            PendingTarget::Hi => self.hi = write.value,
            PendingTarget::Lo => self.lo = write.value,
            PendingTarget::Fcc { index } => {
                self.fcsr.set_condition(index, write.value & 1 != 0);
            }
        }
    }
}

/// Buckets one retired instruction into the mix counters.
fn record_mix(stats: &mut SimStats, inst: &Instruction) {
    match inst {
        Instruction::Shift { .. }
        | Instruction::AluReg { .. }
        | Instruction::AluImm { .. }
        | Instruction::MulDiv { .. }
        | Instruction::HiLo { .. } => stats.inst_alu += 1,
        Instruction::Load { .. } => stats.inst_load += 1,
        Instruction::Store { .. } => stats.inst_store += 1,
        Instruction::Jump { .. }
        | Instruction::JumpReg { .. }
        | Instruction::Branch { .. }
        | Instruction::Bc1 { .. } => stats.inst_branch += 1,
        Instruction::FpArith { .. }
        | Instruction::FpCompare { .. }
        | Instruction::FpFused { .. }
        | Instruction::Cp1Move { .. } => stats.inst_fp += 1,
        Instruction::Vector(_) => stats.inst_vector += 1,
        Instruction::Teq { .. }
        | Instruction::Syscall
        | Instruction::Break { .. }
        | Instruction::Mfc0 { .. }
        | Instruction::Mtc0 { .. }
        | Instruction::Eret => stats.inst_system += 1,
    }
}
