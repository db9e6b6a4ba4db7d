//! Lane packing and operand selection for the vector unit.
//!
//! A vector register is a 64-bit word viewed as eight unsigned bytes (OB) or
//! four signed halfwords (QH), lane 0 in the least significant bits. The
//! second operand of a two-operand lane op is chosen by one of three
//! addressing modes, decoded once here so every operation resolves operands
//! identically.

/// Lane configuration of a packed vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VecFormat {
    /// Eight unsigned 8-bit lanes.
    Ob,
    /// Four signed 16-bit lanes.
    Qh,
}

/// Second-operand addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSelect {
    /// Full lane-wise second operand.
    Vector,
    /// Broadcast one lane of the second register across all lanes.
    Element(u8),
    /// Broadcast a small constant across all lanes.
    Immediate(u8),
}

/// Unpacks a register into OB lanes.
#[inline]
pub fn ob_unpack(bits: u64) -> [u8; 8] {
    bits.to_le_bytes()
}

/// Packs OB lanes back into a register.
#[inline]
pub fn ob_pack(lanes: [u8; 8]) -> u64 {
    u64::from_le_bytes(lanes)
}

/// Unpacks a register into QH lanes.
#[inline]
pub fn qh_unpack(bits: u64) -> [i16; 4] {
    [
        bits as i16,
        (bits >> 16) as i16,
        (bits >> 32) as i16,
        (bits >> 48) as i16,
    ]
}

/// Packs QH lanes back into a register.
#[inline]
pub fn qh_pack(lanes: [i16; 4]) -> u64 {
    u64::from(lanes[0] as u16)
        | (u64::from(lanes[1] as u16) << 16)
        | (u64::from(lanes[2] as u16) << 32)
        | (u64::from(lanes[3] as u16) << 48)
}

/// Resolves the OB second operand under the given addressing mode.
///
/// Immediates are 5-bit and zero-extended; element indices are taken
/// modulo the lane count.
pub fn ob_resolve(vt: u64, sel: OperandSelect) -> [u8; 8] {
    match sel {
        OperandSelect::Vector => ob_unpack(vt),
        OperandSelect::Element(e) => {
            let lane = ob_unpack(vt)[usize::from(e) % 8];
            [lane; 8]
        }
        OperandSelect::Immediate(imm) => [imm & 0x1F; 8],
    }
}

/// Resolves the QH second operand under the given addressing mode.
///
/// Immediates are 5-bit and sign-extended into the signed lane type.
pub fn qh_resolve(vt: u64, sel: OperandSelect) -> [i16; 4] {
    match sel {
        OperandSelect::Vector => qh_unpack(vt),
        OperandSelect::Element(e) => {
            let lane = qh_unpack(vt)[usize::from(e) % 4];
            [lane; 4]
        }
        OperandSelect::Immediate(imm) => {
            // Sign-extend the 5-bit field through bit 7 of an i8.
            let v = i16::from((((imm & 0x1F) as i8) << 3) >> 3);
            [v; 4]
        }
    }
}
