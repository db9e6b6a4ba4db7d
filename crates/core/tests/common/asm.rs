//! Raw instruction word builders.
//!
//! Just enough of an assembler for the scenario programs: each function
//! returns the 32-bit big-endian-neutral encoding of one instruction,
//! built from the crate's own opcode tables so the tests and the decoder
//! can never drift apart.

use mipsim_core::isa::opcodes::{cop0, cop1, fpfunc, opcode, special};

fn r_type(rs: u32, rt: u32, rd: u32, sa: u32, funct: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | funct
}

fn i_type(op: u32, rs: u32, rt: u32, imm: i16) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | u32::from(imm as u16)
}

/// `sll r0, r0, 0`: the canonical no-op.
pub fn nop() -> u32 {
    0
}

/// Breakpoint with code zero; the harness treats it as halt.
pub fn break_() -> u32 {
    special::BREAK
}

/// Breakpoint carrying a non-zero code; traps architecturally.
pub fn break_with_code(code: u32) -> u32 {
    ((code & 0xF_FFFF) << 6) | special::BREAK
}

pub fn lui(rt: u32, imm: u16) -> u32 {
    i_type(opcode::LUI, 0, rt, imm as i16)
}

pub fn ori(rt: u32, rs: u32, imm: u16) -> u32 {
    i_type(opcode::ORI, rs, rt, imm as i16)
}

pub fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    i_type(opcode::ADDIU, rs, rt, imm)
}

/// Trapping 32-bit add.
pub fn add(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(rs, rt, rd, 0, special::ADD)
}

pub fn or_(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(rs, rt, rd, 0, special::OR)
}

pub fn lw(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::LW, base, rt, off)
}

pub fn sw(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::SW, base, rt, off)
}

pub fn lwl(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::LWL, base, rt, off)
}

pub fn lwr(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::LWR, base, rt, off)
}

pub fn ldl(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::LDL, base, rt, off)
}

pub fn ldr(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::LDR, base, rt, off)
}

pub fn swl(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::SWL, base, rt, off)
}

pub fn swr(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::SWR, base, rt, off)
}

pub fn ll(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::LL, base, rt, off)
}

pub fn sc(rt: u32, base: u32, off: i16) -> u32 {
    i_type(opcode::SC, base, rt, off)
}

/// Branch offset counts instruction slots from the delay slot.
pub fn beq(rs: u32, rt: u32, off: i16) -> u32 {
    i_type(opcode::BEQ, rs, rt, off)
}

pub fn jal(target: u64) -> u32 {
    (opcode::JAL << 26) | (((target >> 2) & 0x03FF_FFFF) as u32)
}

pub fn jr(rs: u32) -> u32 {
    r_type(rs, 0, 0, 0, special::JR)
}

pub fn mfc0(rt: u32, rd: u32) -> u32 {
    (opcode::COP0 << 26) | (cop0::MF << 21) | (rt << 16) | (rd << 11)
}

pub fn mtc0(rt: u32, rd: u32) -> u32 {
    (opcode::COP0 << 26) | (cop0::MT << 21) | (rt << 16) | (rd << 11)
}

pub fn eret() -> u32 {
    (opcode::COP0 << 26) | (cop0::CO << 21) | cop0::ERET
}

pub fn mtc1(rt: u32, fs: u32) -> u32 {
    (opcode::COP1 << 26) | (cop1::MT << 21) | (rt << 16) | (fs << 11)
}

pub fn mfc1(rt: u32, fs: u32) -> u32 {
    (opcode::COP1 << 26) | (cop1::MF << 21) | (rt << 16) | (fs << 11)
}

pub fn ctc1(rt: u32, fs: u32) -> u32 {
    (opcode::COP1 << 26) | (cop1::CT << 21) | (rt << 16) | (fs << 11)
}

/// Single-precision arithmetic (`add.s`, `sqrt.s`, ...).
pub fn fp_s(funct: u32, fd: u32, fs: u32, ft: u32) -> u32 {
    (opcode::COP1 << 26) | (cop1::FMT_S << 21) | (ft << 16) | (fs << 11) | (fd << 6) | funct
}

/// Single-precision compare; `predicate` is the low-four-bit condition.
pub fn c_cond_s(predicate: u32, cc: u32, fs: u32, ft: u32) -> u32 {
    (opcode::COP1 << 26)
        | (cop1::FMT_S << 21)
        | (ft << 16)
        | (fs << 11)
        | (cc << 8)
        | fpfunc::C_BASE
        | predicate
}

/// Paired-single compare; writes condition bits `cc` and `cc + 1`.
pub fn c_cond_ps(predicate: u32, cc: u32, fs: u32, ft: u32) -> u32 {
    (opcode::COP1 << 26)
        | (cop1::FMT_PS << 21)
        | (ft << 16)
        | (fs << 11)
        | (cc << 8)
        | fpfunc::C_BASE
        | predicate
}

/// Branch on FP condition true.
pub fn bc1t(cc: u32, off: i16) -> u32 {
    (opcode::COP1 << 26) | (cop1::BC << 21) | (cc << 18) | (1 << 16) | u32::from(off as u16)
}

/// Eight-lane byte vector op with a full-vector second operand.
pub fn vec_ob(funct: u32, vd: u32, vs: u32, vt: u32) -> u32 {
    (opcode::MDMX << 26) | (vt << 16) | (vs << 11) | (vd << 6) | funct
}

/// Eight-lane byte vector op with a broadcast five-bit immediate.
pub fn vec_ob_imm(funct: u32, vd: u32, vs: u32, imm: u32) -> u32 {
    (opcode::MDMX << 26) | (0b0_1000 << 21) | ((imm & 0x1F) << 16) | (vs << 11) | (vd << 6) | funct
}

