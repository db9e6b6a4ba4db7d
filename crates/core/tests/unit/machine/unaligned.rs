//! Left/right merge loads and stores.
//!
//! The LWL/LWR and LDL/LDR pairs assemble an unaligned word from partial
//! accesses, each half keeping the destination bytes it does not cover;
//! SWL/SWR scatter one the same way. The span each op covers flips with
//! the byte order, so one scenario runs under Status.RE as well.

use crate::common::asm;
use crate::common::harness::{TestMachine, DATA_BASE};

const BASE: u16 = DATA_BASE as u16;

/// `rt = imm32`, sign-extended from bit 31.
fn li32(rt: u32, imm: u32) -> [u32; 2] {
    [asm::lui(rt, (imm >> 16) as u16), asm::ori(rt, rt, imm as u16)]
}

#[test]
fn lwl_lwr_pair_assembles_an_unaligned_word() {
    let mut m = TestMachine::new();
    let [a0, a1] = li32(2, 0xAABB_CCDD);
    let [b0, b1] = li32(3, 0xEE11_2233);
    // Big-endian bytes at DATA_BASE: AA BB CC DD EE 11 22 33; the word at
    // byte address 1 is BB CC DD EE.
    m.execute(&[
        asm::ori(1, 0, BASE),
        a0,
        a1,
        asm::sw(2, 1, 0),
        b0,
        b1,
        asm::sw(3, 1, 4),
        asm::lwl(5, 1, 1),
        asm::lwr(5, 1, 4),
        asm::break_(),
    ]);

    assert_eq!(m.gpr(5), 0xFFFF_FFFF_BBCC_DDEE);
}

#[test]
fn ldl_ldr_pair_assembles_an_unaligned_doubleword() {
    let mut m = TestMachine::new();
    let [a0, a1] = li32(2, 0x0123_4567);
    let [b0, b1] = li32(3, 0x89AB_CDEF);
    let [c0, c1] = li32(4, 0xFEDC_BA98);
    let [d0, d1] = li32(5, 0x7654_3210);
    // The doubleword at byte address 3 spans both aligned doublewords.
    m.execute(&[
        asm::ori(1, 0, BASE),
        a0,
        a1,
        asm::sw(2, 1, 0),
        b0,
        b1,
        asm::sw(3, 1, 4),
        c0,
        c1,
        asm::sw(4, 1, 8),
        d0,
        d1,
        asm::sw(5, 1, 12),
        asm::ldl(6, 1, 3),
        asm::ldr(6, 1, 10),
        asm::break_(),
    ]);

    assert_eq!(m.gpr(6), 0x6789_ABCD_EFFE_DCBA);
}

#[test]
fn swl_swr_pair_scatters_an_unaligned_word() {
    let mut m = TestMachine::new();
    let [v0, v1] = li32(2, 0x1122_3344);
    let [a0, a1] = li32(3, 0xAABB_CCDD);
    let [b0, b1] = li32(4, 0x5566_7788);
    m.execute(&[
        asm::ori(1, 0, BASE),
        a0,
        a1,
        asm::sw(3, 1, 0),
        b0,
        b1,
        asm::sw(4, 1, 4),
        v0,
        v1,
        asm::swl(2, 1, 1),
        asm::swr(2, 1, 4),
        asm::lw(5, 1, 0),
        asm::lw(6, 1, 4),
        asm::break_(),
    ]);

    // Bytes 1..=4 now hold 11 22 33 44; the rest are untouched.
    assert_eq!(m.gpr(5), 0xFFFF_FFFF_AA11_2233);
    assert_eq!(m.gpr(6), 0x4466_7788);
}

#[test]
fn reverse_endian_mirrors_the_merge_spans() {
    use mipsim_core::core::arch::cp0::reg;

    let mut m = TestMachine::new();
    let [a0, a1] = li32(2, 0xAABB_CCDD);
    let [b0, b1] = li32(3, 0xEE11_2233);
    // Stored big-endian, then read back as a little-endian merge pair: the
    // word at byte address 2 is CC DD EE 11, least significant byte first.
    m.execute(&[
        asm::ori(1, 0, BASE),
        a0,
        a1,
        asm::sw(2, 1, 0),
        b0,
        b1,
        asm::sw(3, 1, 4),
        asm::mfc0(7, u32::from(reg::STATUS)),
        asm::lui(8, 0x0200), // Status.RE
        asm::or_(7, 7, 8),
        asm::mtc0(7, u32::from(reg::STATUS)),
        asm::lwr(5, 1, 2),
        asm::lwl(5, 1, 5),
        asm::break_(),
    ]);

    assert_eq!(m.gpr(5), 0x11EE_DDCC);
}
