//! Vector operations driven through the instruction pipeline.
//!
//! Lane arithmetic is unit-tested next to the vector unit; these scenarios
//! exercise the instruction-level plumbing: operand addressing modes, the
//! one-slot latency of compare masks, and the accumulate/reduce pipeline.

use mipsim_core::isa::opcodes::vec;

use crate::common::asm;
use crate::common::harness::TestMachine;

#[test]
fn byte_lane_addition_saturates_per_lane() {
    let mut m = TestMachine::new();
    m.sim
        .cpu
        .fpr
        .write_raw64(1, u64::from_le_bytes([200, 100, 0, 1, 2, 3, 255, 50]));
    m.sim
        .cpu
        .fpr
        .write_raw64(2, u64::from_le_bytes([100, 100, 5, 1, 2, 3, 1, 50]));

    m.execute(&[asm::vec_ob(vec::ADD_SAT, 0, 1, 2), asm::break_()]);

    assert_eq!(
        m.sim.cpu.fpr.read_raw64(0),
        u64::from_le_bytes([255, 200, 5, 2, 4, 6, 255, 100])
    );
}

#[test]
fn compare_mask_gates_a_pick_one_slot_later() {
    let mut m = TestMachine::new();
    m.sim
        .cpu
        .fpr
        .write_raw64(1, u64::from_le_bytes([1, 5, 3, 7, 0, 10, 2, 20]));
    m.sim.cpu.fpr.write_raw64(2, u64::from_le_bytes([4; 8]));

    m.execute(&[
        asm::vec_ob(vec::CMP_LT, 0, 1, 2),
        asm::vec_ob(vec::PICK_T, 3, 1, 2), // set lanes take vs, clear take vt
        asm::break_(),
    ]);

    // Lanes 0, 2, 4, 6 compare below four.
    assert!(m.sim.cpu.fcsr.condition(0));
    assert!(!m.sim.cpu.fcsr.condition(1));
    assert_eq!(
        m.sim.cpu.fpr.read_raw64(3),
        u64::from_le_bytes([1, 4, 3, 4, 0, 4, 2, 4])
    );
}

#[test]
fn accumulate_then_reduce_with_an_immediate_shift() {
    let mut m = TestMachine::new();
    m.sim
        .cpu
        .fpr
        .write_raw64(1, u64::from_le_bytes([10, 20, 30, 40, 50, 60, 70, 80]));

    m.execute(&[
        asm::vec_ob_imm(vec::MULA, 0, 1, 2), // acc = lane * 2
        asm::vec_ob_imm(vec::RAC_ZU, 3, 0, 3), // packed acc >> 3, toward zero
        asm::break_(),
    ]);

    assert_eq!(
        m.sim.cpu.fpr.read_raw64(3),
        u64::from_le_bytes([2, 5, 7, 10, 12, 15, 17, 20])
    );
}
