//! Jumps, branches, and delay-slot interplay.

use crate::common::asm;
use crate::common::harness::{TestMachine, PROGRAM_BASE};

#[test]
fn jal_links_past_the_delay_slot_and_jr_returns() {
    let mut m = TestMachine::new();
    m.execute(&[
        asm::jal(PROGRAM_BASE + 0x18), // 0x00: call
        asm::ori(9, 0, 1),             // 0x04: call's delay slot
        asm::break_(),                 // 0x08: return lands here
        asm::nop(),                    // 0x0C
        asm::nop(),                    // 0x10
        asm::nop(),                    // 0x14
        asm::ori(10, 0, 2),            // 0x18: callee
        asm::jr(31),                   // 0x1C: return
        asm::ori(11, 0, 3),            // 0x20: return's delay slot
    ]);

    // The link register skips the delay slot.
    assert_eq!(m.gpr(31), PROGRAM_BASE + 8);
    assert_eq!(m.gpr(9), 1);
    assert_eq!(m.gpr(10), 2);
    assert_eq!(m.gpr(11), 3);
    assert_eq!(m.sim.cpu.pc, PROGRAM_BASE + 8);
}

#[test]
fn untaken_branch_falls_through_its_slot() {
    let mut m = TestMachine::new();
    m.execute(&[
        asm::ori(1, 0, 1),
        asm::beq(1, 0, 2), // r1 != r0: not taken
        asm::ori(9, 0, 1), // slot executes either way
        asm::ori(10, 0, 2),
        asm::break_(),
    ]);

    assert_eq!(m.gpr(9), 1);
    assert_eq!(m.gpr(10), 2);
}
