//! Instruction word layout and encoding constants.
//!
//! Field extractors over the 32-bit instruction word plus the opcode and
//! function-code tables the decoder matches on. Constants are named after
//! the architectural mnemonics.

/// Extracts the primary opcode (bits 31:26).
#[inline]
pub fn op(word: u32) -> u32 {
    word >> 26
}

/// Extracts the rs field (bits 25:21).
#[inline]
pub fn rs(word: u32) -> usize {
    ((word >> 21) & 0x1F) as usize
}

/// Extracts the rt field (bits 20:16).
#[inline]
pub fn rt(word: u32) -> usize {
    ((word >> 16) & 0x1F) as usize
}

/// Extracts the rd field (bits 15:11).
#[inline]
pub fn rd(word: u32) -> usize {
    ((word >> 11) & 0x1F) as usize
}

/// Extracts the shift-amount field (bits 10:6).
#[inline]
pub fn sa(word: u32) -> u32 {
    (word >> 6) & 0x1F
}

/// Extracts the function code (bits 5:0).
#[inline]
pub fn funct(word: u32) -> u32 {
    word & 0x3F
}

/// Extracts the signed 16-bit immediate.
#[inline]
pub fn imm16(word: u32) -> i16 {
    word as i16
}

/// Extracts the unsigned 16-bit immediate.
#[inline]
pub fn uimm16(word: u32) -> u16 {
    word as u16
}

/// Extracts the 26-bit jump target field.
#[inline]
pub fn target26(word: u32) -> u32 {
    word & 0x03FF_FFFF
}

/// Extracts the BREAK/SYSCALL code field (bits 25:6).
#[inline]
pub fn break_code(word: u32) -> u32 {
    (word >> 6) & 0xF_FFFF
}

/// Floating-point field aliases: fmt shares rs, ft/fs/fd shift down the
/// register fields by one slot.
#[inline]
pub fn fmt(word: u32) -> u32 {
    (word >> 21) & 0x1F
}

/// Extracts the ft field (bits 20:16).
#[inline]
pub fn ft(word: u32) -> usize {
    rt(word)
}

/// Extracts the fs field (bits 15:11).
#[inline]
pub fn fs(word: u32) -> usize {
    rd(word)
}

/// Extracts the fd field (bits 10:6).
#[inline]
pub fn fd(word: u32) -> usize {
    ((word >> 6) & 0x1F) as usize
}

/// Extracts the fr field of COP1X four-register encodings (bits 25:21).
#[inline]
pub fn fr(word: u32) -> usize {
    rs(word)
}

/// Extracts the condition-code selector of BC1 branches (bits 20:18).
#[inline]
pub fn cc(word: u32) -> u8 {
    ((word >> 18) & 0x7) as u8
}

/// Primary opcodes.
pub mod opcode {
    pub const SPECIAL: u32 = 0x00;
    pub const REGIMM: u32 = 0x01;
    pub const J: u32 = 0x02;
    pub const JAL: u32 = 0x03;
    pub const BEQ: u32 = 0x04;
    pub const BNE: u32 = 0x05;
    pub const BLEZ: u32 = 0x06;
    pub const BGTZ: u32 = 0x07;
    pub const ADDI: u32 = 0x08;
    pub const ADDIU: u32 = 0x09;
    pub const SLTI: u32 = 0x0A;
    pub const SLTIU: u32 = 0x0B;
    pub const ANDI: u32 = 0x0C;
    pub const ORI: u32 = 0x0D;
    pub const XORI: u32 = 0x0E;
    pub const LUI: u32 = 0x0F;
    pub const COP0: u32 = 0x10;
    pub const COP1: u32 = 0x11;
    pub const COP1X: u32 = 0x13;
    pub const DADDI: u32 = 0x18;
    pub const DADDIU: u32 = 0x19;
    pub const LDL: u32 = 0x1A;
    pub const LDR: u32 = 0x1B;
    pub const MDMX: u32 = 0x1E;
    pub const LB: u32 = 0x20;
    pub const LH: u32 = 0x21;
    pub const LWL: u32 = 0x22;
    pub const LW: u32 = 0x23;
    pub const LBU: u32 = 0x24;
    pub const LHU: u32 = 0x25;
    pub const LWR: u32 = 0x26;
    pub const LWU: u32 = 0x27;
    pub const SB: u32 = 0x28;
    pub const SH: u32 = 0x29;
    pub const SWL: u32 = 0x2A;
    pub const SW: u32 = 0x2B;
    pub const SDL: u32 = 0x2C;
    pub const SDR: u32 = 0x2D;
    pub const SWR: u32 = 0x2E;
    pub const LL: u32 = 0x30;
    pub const LWC1: u32 = 0x31;
    pub const LLD: u32 = 0x34;
    pub const LDC1: u32 = 0x35;
    pub const LD: u32 = 0x37;
    pub const SC: u32 = 0x38;
    pub const SWC1: u32 = 0x39;
    pub const SCD: u32 = 0x3C;
    pub const SDC1: u32 = 0x3D;
    pub const SD: u32 = 0x3F;
}

/// SPECIAL function codes.
pub mod special {
    pub const SLL: u32 = 0x00;
    pub const SRL: u32 = 0x02;
    pub const SRA: u32 = 0x03;
    pub const SLLV: u32 = 0x04;
    pub const SRLV: u32 = 0x06;
    pub const SRAV: u32 = 0x07;
    pub const JR: u32 = 0x08;
    pub const JALR: u32 = 0x09;
    pub const MOVZ: u32 = 0x0A;
    pub const MOVN: u32 = 0x0B;
    pub const SYSCALL: u32 = 0x0C;
    pub const BREAK: u32 = 0x0D;
    pub const DSLLV: u32 = 0x14;
    pub const DSRLV: u32 = 0x16;
    pub const DSRAV: u32 = 0x17;
    pub const MFHI: u32 = 0x10;
    pub const MTHI: u32 = 0x11;
    pub const MFLO: u32 = 0x12;
    pub const MTLO: u32 = 0x13;
    pub const MULT: u32 = 0x18;
    pub const MULTU: u32 = 0x19;
    pub const DIV: u32 = 0x1A;
    pub const DIVU: u32 = 0x1B;
    pub const DMULT: u32 = 0x1C;
    pub const DMULTU: u32 = 0x1D;
    pub const DDIV: u32 = 0x1E;
    pub const DDIVU: u32 = 0x1F;
    pub const ADD: u32 = 0x20;
    pub const ADDU: u32 = 0x21;
    pub const SUB: u32 = 0x22;
    pub const SUBU: u32 = 0x23;
    pub const AND: u32 = 0x24;
    pub const OR: u32 = 0x25;
    pub const XOR: u32 = 0x26;
    pub const NOR: u32 = 0x27;
    pub const SLT: u32 = 0x2A;
    pub const SLTU: u32 = 0x2B;
    pub const DADD: u32 = 0x2C;
    pub const DADDU: u32 = 0x2D;
    pub const DSUB: u32 = 0x2E;
    pub const DSUBU: u32 = 0x2F;
    pub const TEQ: u32 = 0x34;
    pub const DSLL: u32 = 0x38;
    pub const DSRL: u32 = 0x3A;
    pub const DSRA: u32 = 0x3B;
    pub const DSLL32: u32 = 0x3C;
    pub const DSRL32: u32 = 0x3E;
    pub const DSRA32: u32 = 0x3F;
}

/// REGIMM rt-field codes.
pub mod regimm {
    pub const BLTZ: u32 = 0x00;
    pub const BGEZ: u32 = 0x01;
    pub const BLTZAL: u32 = 0x10;
    pub const BGEZAL: u32 = 0x11;
}

/// COP0 rs-field and function codes.
pub mod cop0 {
    pub const MF: u32 = 0x00;
    pub const MT: u32 = 0x04;
    pub const CO: u32 = 0x10;
    pub const ERET: u32 = 0x18;
}

/// COP1 rs-field codes (moves, branches, and the format values).
pub mod cop1 {
    pub const MF: u32 = 0x00;
    pub const DMF: u32 = 0x01;
    pub const CF: u32 = 0x02;
    pub const MT: u32 = 0x04;
    pub const DMT: u32 = 0x05;
    pub const CT: u32 = 0x06;
    pub const BC: u32 = 0x08;
    pub const FMT_S: u32 = 0x10;
    pub const FMT_D: u32 = 0x11;
    pub const FMT_W: u32 = 0x14;
    pub const FMT_L: u32 = 0x15;
    pub const FMT_PS: u32 = 0x16;
}

/// COP1 per-format function codes.
pub mod fpfunc {
    pub const ADD: u32 = 0x00;
    pub const SUB: u32 = 0x01;
    pub const MUL: u32 = 0x02;
    pub const DIV: u32 = 0x03;
    pub const SQRT: u32 = 0x04;
    pub const ABS: u32 = 0x05;
    pub const MOV: u32 = 0x06;
    pub const NEG: u32 = 0x07;
    pub const ROUND_L: u32 = 0x08;
    pub const TRUNC_L: u32 = 0x09;
    pub const CEIL_L: u32 = 0x0A;
    pub const FLOOR_L: u32 = 0x0B;
    pub const ROUND_W: u32 = 0x0C;
    pub const TRUNC_W: u32 = 0x0D;
    pub const CEIL_W: u32 = 0x0E;
    pub const FLOOR_W: u32 = 0x0F;
    pub const RECIP: u32 = 0x15;
    pub const RSQRT: u32 = 0x16;
    pub const RECIP2: u32 = 0x1C;
    pub const RSQRT2: u32 = 0x1F;
    pub const CVT_S: u32 = 0x20;
    pub const CVT_D: u32 = 0x21;
    pub const CVT_W: u32 = 0x24;
    pub const CVT_L: u32 = 0x25;
    /// Compares occupy 0x30-0x3F; the low four bits are the predicate.
    pub const C_BASE: u32 = 0x30;
}

/// COP1X function codes (fused multiply-add family; the low three bits
/// carry the format).
pub mod cop1x {
    pub const MADD: u32 = 0x20;
    pub const MSUB: u32 = 0x28;
    pub const NMADD: u32 = 0x30;
    pub const NMSUB: u32 = 0x38;
    pub const FMT_S: u32 = 0x0;
    pub const FMT_D: u32 = 0x1;
    pub const FMT_PS: u32 = 0x6;
}

/// Vector-unit function codes (major opcode MDMX).
///
/// The fmtsel field (bits 25:21) carries the lane format in bit 0 and the
/// operand addressing mode in bits 4:3: `1xxxx` selects by-element with the
/// lane index in bits 3:1, `01xxx` selects by-immediate with the constant
/// in the vt field, `00xx0/1` selects by-vector. Shuffles reuse bits 4:1
/// as the pattern number.
pub mod vec {
    pub const ADD_SAT: u32 = 0x00;
    pub const SUB_SAT: u32 = 0x01;
    pub const MUL_SAT: u32 = 0x02;
    pub const MIN: u32 = 0x03;
    pub const MAX: u32 = 0x04;
    pub const AND: u32 = 0x05;
    pub const OR: u32 = 0x06;
    pub const XOR: u32 = 0x07;
    pub const NOR: u32 = 0x08;
    pub const SLL: u32 = 0x09;
    pub const SRL: u32 = 0x0A;
    pub const SRA: u32 = 0x0B;
    pub const ABS_DIFF: u32 = 0x0C;
    pub const AVG: u32 = 0x0D;
    pub const SIGN_SEL: u32 = 0x0E;
    pub const CMP_EQ: u32 = 0x10;
    pub const CMP_LT: u32 = 0x11;
    pub const CMP_LE: u32 = 0x12;
    pub const PICK_T: u32 = 0x14;
    pub const PICK_F: u32 = 0x15;
    pub const SHUFFLE: u32 = 0x18;
    pub const MULA: u32 = 0x20;
    pub const MACA: u32 = 0x21;
    pub const MACS: u32 = 0x22;
    pub const MULS: u32 = 0x23;
    pub const WACL: u32 = 0x24;
    pub const WACH: u32 = 0x25;
    pub const RAC_NAS: u32 = 0x30;
    pub const RAC_NAU: u32 = 0x31;
    pub const RAC_NES: u32 = 0x32;
    pub const RAC_NEU: u32 = 0x33;
    pub const RAC_ZS: u32 = 0x34;
    pub const RAC_ZU: u32 = 0x35;
}
