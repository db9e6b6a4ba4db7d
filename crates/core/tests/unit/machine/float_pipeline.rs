//! FPU operations driven through the instruction pipeline.
//!
//! The arithmetic itself is unit-tested next to the FPU; these scenarios
//! check what the pipeline wraps around it: trap-before-commit on enabled
//! causes, sticky flags on disabled ones, and the one-slot latency of
//! compare results.

use mipsim_core::core::arch::cp0::reg;
use mipsim_core::core::arch::fcsr::fp_flags;
use mipsim_core::core::units::fpu::cond;
use mipsim_core::isa::opcodes::fpfunc;

use crate::common::asm;
use crate::common::harness::{TestMachine, PROGRAM_BASE};

#[test]
fn single_addition_commits_through_the_pipeline() {
    let mut m = TestMachine::new();
    m.sim.cpu.fpr.write_single(1, 1.5);
    m.sim.cpu.fpr.write_single(2, 2.25);

    m.execute(&[asm::fp_s(fpfunc::ADD, 0, 1, 2), asm::break_()]);

    assert_eq!(m.sim.cpu.fpr.read_single(0), 3.75);
}

#[test]
fn enabled_invalid_cause_traps_before_commit() {
    let mut m = TestMachine::new();
    m.sim.cpu.fcsr.write(u32::from(fp_flags::INVALID) << 7);
    m.sim.cpu.fpr.write_single(1, -4.0);

    m.execute(&[
        asm::fp_s(fpfunc::SQRT, 0, 1, 0),
        asm::ori(9, 0, 1), // must never run
        asm::break_(),
    ]);

    assert!(m.halted_in_handler());
    assert_eq!(m.exc_code(), 15);
    assert_eq!(m.cp0(reg::EPC), PROGRAM_BASE);
    assert_eq!(m.gpr(9), 0);
    assert_eq!(
        m.sim.cpu.fpr.read_raw32(0),
        0,
        "trapping operation must not write its destination"
    );
    assert_ne!(m.sim.cpu.fcsr.cause() & fp_flags::INVALID, 0);
}

#[test]
fn disabled_invalid_cause_commits_a_nan_and_sticks_the_flag() {
    let mut m = TestMachine::new();
    m.sim.cpu.fpr.write_single(1, -1.0);

    m.execute(&[asm::fp_s(fpfunc::SQRT, 0, 1, 0), asm::break_()]);

    assert!(!m.halted_in_handler());
    assert!(m.sim.cpu.fpr.read_single(0).is_nan());
    assert_ne!(m.sim.cpu.fcsr.flags() & fp_flags::INVALID, 0);
}

#[test]
fn paired_compare_writes_both_condition_bits() {
    let mut m = TestMachine::new();
    m.sim.cpu.fpr.write_paired(1, 1.0, 2.0).unwrap();
    m.sim.cpu.fpr.write_paired(2, 1.0, 3.0).unwrap();

    m.execute(&[
        asm::c_cond_ps(u32::from(cond::EQUAL), 4, 1, 2),
        asm::nop(),
        asm::break_(),
    ]);

    assert!(m.sim.cpu.fcsr.condition(4), "low lane compares equal");
    assert!(!m.sim.cpu.fcsr.condition(5), "high lane differs");
}

#[test]
fn paired_compare_with_an_odd_condition_bit_is_reserved() {
    let mut m = TestMachine::new();
    m.sim.cpu.fpr.write_paired(1, 1.0, 1.0).unwrap();
    m.sim.cpu.fpr.write_paired(2, 1.0, 1.0).unwrap();

    m.execute(&[
        asm::c_cond_ps(u32::from(cond::EQUAL), 7, 1, 2),
        asm::break_(),
    ]);

    assert!(m.halted_in_handler());
    assert_eq!(m.exc_code(), 10);
    assert!(!m.sim.cpu.fcsr.condition(7));
    assert!(!m.sim.cpu.fcsr.condition(0));
}

#[test]
fn compare_result_gates_a_branch_one_slot_later() {
    let mut m = TestMachine::new();
    m.sim.cpu.fpr.write_single(1, 1.0);
    m.sim.cpu.fpr.write_single(2, 1.0);

    m.execute(&[
        asm::c_cond_s(u32::from(cond::EQUAL), 0, 1, 2), // 0x00
        asm::bc1t(0, 3),                                // 0x04: to 0x14
        asm::ori(9, 0, 1),                              // 0x08: slot
        asm::ori(12, 0, 7),                             // 0x0C: skipped
        asm::break_(),                                  // 0x10: skipped
        asm::ori(10, 0, 2),                             // 0x14: target
        asm::break_(),                                  // 0x18
    ]);

    assert!(m.sim.cpu.fcsr.condition(0));
    assert_eq!(m.gpr(9), 1, "branch delay slot executes");
    assert_eq!(m.gpr(10), 2, "compare result visible to the next instruction");
    assert_eq!(m.gpr(12), 0);
}
