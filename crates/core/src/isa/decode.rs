//! Instruction word decoder.
//!
//! Maps a 32-bit instruction word to the tagged [`Instruction`] sum type.
//! Unknown encodings, and defined encodings with an operand combination the
//! architecture reserves (a paired-single divide, a byte-format arithmetic
//! right shift), decode to a reserved-instruction exception rather than a
//! permissive guess.

use crate::common::Exception;
use crate::core::units::vu::{AccOp, OperandSelect, ReduceRounding, Shuffle, VecFormat};

use super::instruction::{
    AluImmOp, AluOp, BranchCond, Cp1MoveOp, FpFmt, FpOp, FusedOp, HiLoOp, Instruction, LoadOp,
    MulDivOp, ShiftAmount, ShiftOp, StoreOp, VecOp, VectorInstr,
};
use super::opcodes::{
    break_code, cc, cop0, cop1, cop1x, fd, fmt, fpfunc, fr, fs, ft, funct, imm16, op, opcode,
    rd, regimm, rs, rt, sa, special, target26, vec,
};

/// Decodes one 32-bit instruction word.
///
/// # Errors
///
/// `Exception::ReservedInstruction` for any encoding outside the
/// implemented subset.
pub fn decode(word: u32) -> Result<Instruction, Exception> {
    let reserved = || Err(Exception::ReservedInstruction(word));
    match op(word) {
        opcode::SPECIAL => decode_special(word),
        opcode::REGIMM => decode_regimm(word),
        opcode::J => Ok(Instruction::Jump {
            target: target26(word),
            link: false,
        }),
        opcode::JAL => Ok(Instruction::Jump {
            target: target26(word),
            link: true,
        }),
        opcode::BEQ => Ok(branch(BranchCond::Eq, word)),
        opcode::BNE => Ok(branch(BranchCond::Ne, word)),
        opcode::BLEZ => Ok(branch(BranchCond::Lez, word)),
        opcode::BGTZ => Ok(branch(BranchCond::Gtz, word)),
        opcode::ADDI => Ok(alu_imm(AluImmOp::Addi, word)),
        opcode::ADDIU => Ok(alu_imm(AluImmOp::Addiu, word)),
        opcode::SLTI => Ok(alu_imm(AluImmOp::Slti, word)),
        opcode::SLTIU => Ok(alu_imm(AluImmOp::Sltiu, word)),
        opcode::ANDI => Ok(alu_imm(AluImmOp::Andi, word)),
        opcode::ORI => Ok(alu_imm(AluImmOp::Ori, word)),
        opcode::XORI => Ok(alu_imm(AluImmOp::Xori, word)),
        opcode::LUI => Ok(alu_imm(AluImmOp::Lui, word)),
        opcode::DADDI => Ok(alu_imm(AluImmOp::Daddi, word)),
        opcode::DADDIU => Ok(alu_imm(AluImmOp::Daddiu, word)),
        opcode::COP0 => decode_cop0(word),
        opcode::COP1 => decode_cop1(word),
        opcode::COP1X => decode_cop1x(word),
        opcode::MDMX => decode_vector(word),
        opcode::LB => Ok(load(LoadOp::Lb, word)),
        opcode::LBU => Ok(load(LoadOp::Lbu, word)),
        opcode::LH => Ok(load(LoadOp::Lh, word)),
        opcode::LHU => Ok(load(LoadOp::Lhu, word)),
        opcode::LW => Ok(load(LoadOp::Lw, word)),
        opcode::LWU => Ok(load(LoadOp::Lwu, word)),
        opcode::LD => Ok(load(LoadOp::Ld, word)),
        opcode::LWL => Ok(load(LoadOp::Lwl, word)),
        opcode::LWR => Ok(load(LoadOp::Lwr, word)),
        opcode::LDL => Ok(load(LoadOp::Ldl, word)),
        opcode::LDR => Ok(load(LoadOp::Ldr, word)),
        opcode::LL => Ok(load(LoadOp::Ll, word)),
        opcode::LLD => Ok(load(LoadOp::Lld, word)),
        opcode::LWC1 => Ok(load(LoadOp::Lwc1, word)),
        opcode::LDC1 => Ok(load(LoadOp::Ldc1, word)),
        opcode::SB => Ok(store(StoreOp::Sb, word)),
        opcode::SH => Ok(store(StoreOp::Sh, word)),
        opcode::SW => Ok(store(StoreOp::Sw, word)),
        opcode::SD => Ok(store(StoreOp::Sd, word)),
        opcode::SWL => Ok(store(StoreOp::Swl, word)),
        opcode::SWR => Ok(store(StoreOp::Swr, word)),
        opcode::SDL => Ok(store(StoreOp::Sdl, word)),
        opcode::SDR => Ok(store(StoreOp::Sdr, word)),
        opcode::SC => Ok(store(StoreOp::Sc, word)),
        opcode::SCD => Ok(store(StoreOp::Scd, word)),
        opcode::SWC1 => Ok(store(StoreOp::Swc1, word)),
        opcode::SDC1 => Ok(store(StoreOp::Sdc1, word)),
        _ => reserved(),
    }
}

fn branch(cond: BranchCond, word: u32) -> Instruction {
    Instruction::Branch {
        cond,
        rs: rs(word),
        rt: rt(word),
        offset: imm16(word),
        link: false,
    }
}

fn alu_imm(op: AluImmOp, word: u32) -> Instruction {
    Instruction::AluImm {
        op,
        rs: rs(word),
        rt: rt(word),
        imm: imm16(word),
    }
}

fn load(op: LoadOp, word: u32) -> Instruction {
    Instruction::Load {
        op,
        base: rs(word),
        rt: rt(word),
        offset: imm16(word),
    }
}

fn store(op: StoreOp, word: u32) -> Instruction {
    Instruction::Store {
        op,
        base: rs(word),
        rt: rt(word),
        offset: imm16(word),
    }
}

fn shift_imm(op: ShiftOp, word: u32, plus32: bool) -> Instruction {
    let amount = if plus32 { sa(word) + 32 } else { sa(word) };
    Instruction::Shift {
        op,
        rt: rt(word),
        rd: rd(word),
        amount: ShiftAmount::Immediate(amount),
    }
}

fn shift_var(op: ShiftOp, word: u32) -> Instruction {
    Instruction::Shift {
        op,
        rt: rt(word),
        rd: rd(word),
        amount: ShiftAmount::Register(rs(word)),
    }
}

fn alu_reg(op: AluOp, word: u32) -> Instruction {
    Instruction::AluReg {
        op,
        rs: rs(word),
        rt: rt(word),
        rd: rd(word),
    }
}

fn mul_div(op: MulDivOp, word: u32) -> Instruction {
    Instruction::MulDiv {
        op,
        rs: rs(word),
        rt: rt(word),
    }
}

fn decode_special(word: u32) -> Result<Instruction, Exception> {
    let inst = match funct(word) {
        special::SLL => shift_imm(ShiftOp::Sll, word, false),
        special::SRL => shift_imm(ShiftOp::Srl, word, false),
        special::SRA => shift_imm(ShiftOp::Sra, word, false),
        special::DSLL => shift_imm(ShiftOp::Dsll, word, false),
        special::DSRL => shift_imm(ShiftOp::Dsrl, word, false),
        special::DSRA => shift_imm(ShiftOp::Dsra, word, false),
        special::DSLL32 => shift_imm(ShiftOp::Dsll, word, true),
        special::DSRL32 => shift_imm(ShiftOp::Dsrl, word, true),
        special::DSRA32 => shift_imm(ShiftOp::Dsra, word, true),
        special::SLLV => shift_var(ShiftOp::Sll, word),
        special::SRLV => shift_var(ShiftOp::Srl, word),
        special::SRAV => shift_var(ShiftOp::Sra, word),
        special::DSLLV => shift_var(ShiftOp::Dsll, word),
        special::DSRLV => shift_var(ShiftOp::Dsrl, word),
        special::DSRAV => shift_var(ShiftOp::Dsra, word),
        special::JR => Instruction::JumpReg {
            rs: rs(word),
            link: None,
        },
        special::JALR => Instruction::JumpReg {
            rs: rs(word),
            link: Some(rd(word)),
        },
        special::MOVZ => alu_reg(AluOp::Movz, word),
        special::MOVN => alu_reg(AluOp::Movn, word),
        special::SYSCALL => Instruction::Syscall,
        special::BREAK => Instruction::Break {
            code: break_code(word),
        },
        special::MFHI => Instruction::HiLo {
            op: HiLoOp::Mfhi,
            reg: rd(word),
        },
        special::MTHI => Instruction::HiLo {
            op: HiLoOp::Mthi,
            reg: rs(word),
        },
        special::MFLO => Instruction::HiLo {
            op: HiLoOp::Mflo,
            reg: rd(word),
        },
        special::MTLO => Instruction::HiLo {
            op: HiLoOp::Mtlo,
            reg: rs(word),
        },
        special::MULT => mul_div(MulDivOp::Mult, word),
        special::MULTU => mul_div(MulDivOp::Multu, word),
        special::DIV => mul_div(MulDivOp::Div, word),
        special::DIVU => mul_div(MulDivOp::Divu, word),
        special::DMULT => mul_div(MulDivOp::Dmult, word),
        special::DMULTU => mul_div(MulDivOp::Dmultu, word),
        special::DDIV => mul_div(MulDivOp::Ddiv, word),
        special::DDIVU => mul_div(MulDivOp::Ddivu, word),
        special::ADD => alu_reg(AluOp::Add, word),
        special::ADDU => alu_reg(AluOp::Addu, word),
        special::SUB => alu_reg(AluOp::Sub, word),
        special::SUBU => alu_reg(AluOp::Subu, word),
        special::AND => alu_reg(AluOp::And, word),
        special::OR => alu_reg(AluOp::Or, word),
        special::XOR => alu_reg(AluOp::Xor, word),
        special::NOR => alu_reg(AluOp::Nor, word),
        special::SLT => alu_reg(AluOp::Slt, word),
        special::SLTU => alu_reg(AluOp::Sltu, word),
        special::DADD => alu_reg(AluOp::Dadd, word),
        special::DADDU => alu_reg(AluOp::Daddu, word),
        special::DSUB => alu_reg(AluOp::Dsub, word),
        special::DSUBU => alu_reg(AluOp::Dsubu, word),
        special::TEQ => Instruction::Teq {
            rs: rs(word),
            rt: rt(word),
        },
        _ => return Err(Exception::ReservedInstruction(word)),
    };
    Ok(inst)
}

fn decode_regimm(word: u32) -> Result<Instruction, Exception> {
    let (cond, link) = match (word >> 16) & 0x1F {
        regimm::BLTZ => (BranchCond::Ltz, false),
        regimm::BGEZ => (BranchCond::Gez, false),
        regimm::BLTZAL => (BranchCond::Ltz, true),
        regimm::BGEZAL => (BranchCond::Gez, true),
        _ => return Err(Exception::ReservedInstruction(word)),
    };
    Ok(Instruction::Branch {
        cond,
        rs: rs(word),
        rt: 0,
        offset: imm16(word),
        link,
    })
}

fn decode_cop0(word: u32) -> Result<Instruction, Exception> {
    match (word >> 21) & 0x1F {
        cop0::MF => Ok(Instruction::Mfc0 {
            rt: rt(word),
            rd: rd(word) as u8,
        }),
        cop0::MT => Ok(Instruction::Mtc0 {
            rt: rt(word),
            rd: rd(word) as u8,
        }),
        cop0::CO if funct(word) == cop0::ERET => Ok(Instruction::Eret),
        _ => Err(Exception::ReservedInstruction(word)),
    }
}

fn fp_format(bits: u32) -> Option<FpFmt> {
    Some(match bits {
        cop1::FMT_S => FpFmt::S,
        cop1::FMT_D => FpFmt::D,
        cop1::FMT_W => FpFmt::W,
        cop1::FMT_L => FpFmt::L,
        cop1::FMT_PS => FpFmt::Ps,
        _ => return None,
    })
}

/// Screens format/operation pairs the architecture reserves.
fn fp_op_legal(op: FpOp, f: FpFmt) -> bool {
    match f {
        FpFmt::S => !matches!(op, FpOp::CvtS),
        FpFmt::D => !matches!(op, FpOp::CvtD),
        // Fixed-point sources only convert to the float formats.
        FpFmt::W | FpFmt::L => matches!(op, FpOp::CvtS | FpOp::CvtD),
        FpFmt::Ps => matches!(
            op,
            FpOp::Add
                | FpOp::Sub
                | FpOp::Mul
                | FpOp::Abs
                | FpOp::Mov
                | FpOp::Neg
                | FpOp::Recip2
                | FpOp::Rsqrt2
        ),
    }
}

fn decode_cop1(word: u32) -> Result<Instruction, Exception> {
    let sub = (word >> 21) & 0x1F;
    let mv = |op| {
        Ok(Instruction::Cp1Move {
            op,
            rt: rt(word),
            fs: fs(word),
        })
    };
    match sub {
        cop1::MF => mv(Cp1MoveOp::Mfc1),
        cop1::DMF => mv(Cp1MoveOp::Dmfc1),
        cop1::CF => mv(Cp1MoveOp::Cfc1),
        cop1::MT => mv(Cp1MoveOp::Mtc1),
        cop1::DMT => mv(Cp1MoveOp::Dmtc1),
        cop1::CT => mv(Cp1MoveOp::Ctc1),
        cop1::BC => {
            // Branch-likely (nullify) encodings are outside the subset.
            if (word >> 17) & 1 != 0 {
                return Err(Exception::ReservedInstruction(word));
            }
            Ok(Instruction::Bc1 {
                cc: cc(word),
                truth: (word >> 16) & 1 != 0,
                offset: imm16(word),
            })
        }
        _ => {
            let Some(f) = fp_format(sub) else {
                return Err(Exception::ReservedInstruction(word));
            };
            let fc = funct(word);
            if fc >= fpfunc::C_BASE {
                // Compare: low four bits are the predicate.
                if matches!(f, FpFmt::W | FpFmt::L) {
                    return Err(Exception::ReservedInstruction(word));
                }
                // Compares carry their condition-code selector in bits 10:8;
                // bits 20:18 belong to the ft operand here.
                let cc_sel = ((word >> 8) & 0x7) as u8;
                // A paired compare writes cc and cc+1, so its selector must
                // name an even bit.
                if matches!(f, FpFmt::Ps) && cc_sel & 1 != 0 {
                    return Err(Exception::ReservedInstruction(word));
                }
                return Ok(Instruction::FpCompare {
                    fmt: f,
                    ft: ft(word),
                    fs: fs(word),
                    cc: cc_sel,
                    predicate: (fc & 0xF) as u8,
                });
            }
            let op = match fc {
                fpfunc::ADD => FpOp::Add,
                fpfunc::SUB => FpOp::Sub,
                fpfunc::MUL => FpOp::Mul,
                fpfunc::DIV => FpOp::Div,
                fpfunc::SQRT => FpOp::Sqrt,
                fpfunc::ABS => FpOp::Abs,
                fpfunc::MOV => FpOp::Mov,
                fpfunc::NEG => FpOp::Neg,
                fpfunc::RECIP => FpOp::Recip,
                fpfunc::RSQRT => FpOp::Rsqrt,
                fpfunc::RECIP2 => FpOp::Recip2,
                fpfunc::RSQRT2 => FpOp::Rsqrt2,
                fpfunc::ROUND_W => FpOp::RoundW,
                fpfunc::TRUNC_W => FpOp::TruncW,
                fpfunc::CEIL_W => FpOp::CeilW,
                fpfunc::FLOOR_W => FpOp::FloorW,
                fpfunc::ROUND_L => FpOp::RoundL,
                fpfunc::TRUNC_L => FpOp::TruncL,
                fpfunc::CEIL_L => FpOp::CeilL,
                fpfunc::FLOOR_L => FpOp::FloorL,
                fpfunc::CVT_S => FpOp::CvtS,
                fpfunc::CVT_D => FpOp::CvtD,
                fpfunc::CVT_W => FpOp::CvtW,
                fpfunc::CVT_L => FpOp::CvtL,
                _ => return Err(Exception::ReservedInstruction(word)),
            };
            if !fp_op_legal(op, f) {
                return Err(Exception::ReservedInstruction(word));
            }
            Ok(Instruction::FpArith {
                op,
                fmt: f,
                ft: ft(word),
                fs: fs(word),
                fd: fd(word),
            })
        }
    }
}

fn decode_cop1x(word: u32) -> Result<Instruction, Exception> {
    let fc = funct(word);
    let op = match fc & 0x38 {
        cop1x::MADD => FusedOp::Madd,
        cop1x::MSUB => FusedOp::Msub,
        cop1x::NMADD => FusedOp::Nmadd,
        cop1x::NMSUB => FusedOp::Nmsub,
        _ => return Err(Exception::ReservedInstruction(word)),
    };
    let f = match fc & 0x7 {
        cop1x::FMT_S => FpFmt::S,
        cop1x::FMT_D => FpFmt::D,
        cop1x::FMT_PS => FpFmt::Ps,
        _ => return Err(Exception::ReservedInstruction(word)),
    };
    Ok(Instruction::FpFused {
        op,
        fmt: f,
        fr: fr(word),
        fs: fs(word),
        ft: ft(word),
        fd: fd(word),
    })
}

fn decode_vector(word: u32) -> Result<Instruction, Exception> {
    let sel_bits = fmt(word);
    let vformat = if sel_bits & 1 == 0 {
        VecFormat::Ob
    } else {
        VecFormat::Qh
    };
    let sel = if sel_bits & 0b1_0000 != 0 {
        OperandSelect::Element(((sel_bits >> 1) & 0x7) as u8)
    } else if sel_bits & 0b0_1000 != 0 {
        OperandSelect::Immediate(rt(word) as u8)
    } else {
        OperandSelect::Vector
    };
    let fc = funct(word);
    let vop = match fc {
        vec::ADD_SAT => VecOp::AddSat,
        vec::SUB_SAT => VecOp::SubSat,
        vec::MUL_SAT => VecOp::MulSat,
        vec::MIN => VecOp::Min,
        vec::MAX => VecOp::Max,
        vec::AND => VecOp::And,
        vec::OR => VecOp::Or,
        vec::XOR => VecOp::Xor,
        vec::NOR => VecOp::Nor,
        vec::SLL => VecOp::Sll,
        vec::SRL => VecOp::Srl,
        vec::SRA if vformat == VecFormat::Qh => VecOp::Sra,
        vec::ABS_DIFF if vformat == VecFormat::Ob => VecOp::AbsDiff,
        vec::AVG if vformat == VecFormat::Ob => VecOp::Avg,
        vec::SIGN_SEL if vformat == VecFormat::Qh => VecOp::SignSelect,
        vec::CMP_EQ => VecOp::CmpEq,
        vec::CMP_LT => VecOp::CmpLt,
        vec::CMP_LE => VecOp::CmpLe,
        vec::PICK_T => VecOp::PickTrue,
        vec::PICK_F => VecOp::PickFalse,
        vec::SHUFFLE => {
            let pattern = match (sel_bits >> 1) & 0xF {
                0 => Shuffle::MixHigh,
                1 => Shuffle::MixLow,
                2 => Shuffle::PackHigh,
                3 => Shuffle::PackLow,
                4 => Shuffle::RepeatA,
                5 => Shuffle::RepeatB,
                _ => return Err(Exception::ReservedInstruction(word)),
            };
            VecOp::Shuffle(pattern)
        }
        vec::MULA => VecOp::MulAcc(AccOp::Load),
        vec::MACA => VecOp::MulAcc(AccOp::Add),
        vec::MACS => VecOp::MulAcc(AccOp::Sub),
        vec::MULS => VecOp::MulAcc(AccOp::NegLoad),
        vec::WACL => VecOp::LoadAccLow,
        vec::WACH => VecOp::LoadAccHigh,
        vec::RAC_NAS => VecOp::Reduce(ReduceRounding::NearestAwaySigned),
        vec::RAC_NAU => VecOp::Reduce(ReduceRounding::NearestAwayUnsigned),
        vec::RAC_NES => VecOp::Reduce(ReduceRounding::NearestEvenSigned),
        vec::RAC_NEU => VecOp::Reduce(ReduceRounding::NearestEvenUnsigned),
        vec::RAC_ZS => VecOp::Reduce(ReduceRounding::ZeroSigned),
        vec::RAC_ZU => VecOp::Reduce(ReduceRounding::ZeroUnsigned),
        _ => return Err(Exception::ReservedInstruction(word)),
    };
    // Shuffles reuse the selector bits for their pattern, so the operand
    // always comes from the full vector.
    let sel = if matches!(vop, VecOp::Shuffle(_)) {
        OperandSelect::Vector
    } else {
        sel
    };
    Ok(Instruction::Vector(VectorInstr {
        op: vop,
        fmt: vformat,
        sel,
        vs: fs(word),
        vt: ft(word),
        vd: fd(word),
    }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Builds an R-type SPECIAL word.
    fn r_type(rs_: u32, rt_: u32, rd_: u32, sa_: u32, funct_: u32) -> u32 {
        (rs_ << 21) | (rt_ << 16) | (rd_ << 11) | (sa_ << 6) | funct_
    }

    #[test]
    fn decodes_add_and_shift_forms() {
        let add = decode(r_type(1, 2, 3, 0, special::ADD)).unwrap();
        assert_eq!(
            add,
            Instruction::AluReg {
                op: AluOp::Add,
                rs: 1,
                rt: 2,
                rd: 3
            }
        );
        let dsll32 = decode(r_type(0, 2, 3, 5, special::DSLL32)).unwrap();
        assert_eq!(
            dsll32,
            Instruction::Shift {
                op: ShiftOp::Dsll,
                rt: 2,
                rd: 3,
                amount: ShiftAmount::Immediate(37)
            }
        );
    }

    #[test]
    fn decodes_memory_and_jump_forms() {
        let lw = decode((opcode::LW << 26) | (4 << 21) | (5 << 16) | 0xFFFC).unwrap();
        assert_eq!(
            lw,
            Instruction::Load {
                op: LoadOp::Lw,
                base: 4,
                rt: 5,
                offset: -4
            }
        );
        let jal = decode((opcode::JAL << 26) | 0x10_0000).unwrap();
        assert_eq!(
            jal,
            Instruction::Jump {
                target: 0x10_0000,
                link: true
            }
        );
    }

    #[test]
    fn decodes_fp_arith_and_rejects_reserved_pairs() {
        let word = (opcode::COP1 << 26) | (cop1::FMT_D << 21) | r_type(0, 6, 7, 8, 0) | fpfunc::ADD;
        let add = decode(word).unwrap();
        assert_eq!(
            add,
            Instruction::FpArith {
                op: FpOp::Add,
                fmt: FpFmt::D,
                ft: 6,
                fs: 7,
                fd: 8
            }
        );
        // Paired compares write two condition bits; an odd selector is
        // reserved while an even one decodes.
        let ps_cmp = |cc_sel: u32| {
            (opcode::COP1 << 26)
                | (cop1::FMT_PS << 21)
                | (2 << 16)
                | (1 << 11)
                | (cc_sel << 8)
                | fpfunc::C_BASE
                | 0x2
        };
        assert!(matches!(
            decode(ps_cmp(7)),
            Err(Exception::ReservedInstruction(_))
        ));
        assert!(matches!(
            decode(ps_cmp(6)),
            Ok(Instruction::FpCompare { cc: 6, .. })
        ));

        // Paired-single divide is reserved.
        let psdiv = (opcode::COP1 << 26) | (cop1::FMT_PS << 21) | fpfunc::DIV;
        assert!(matches!(
            decode(psdiv),
            Err(Exception::ReservedInstruction(_))
        ));
    }

    #[test]
    fn decodes_vector_addressing_modes() {
        let base = (opcode::MDMX << 26) | (9 << 16) | (10 << 11) | (11 << 6);
        // By-vector QH saturating add.
        let byv = decode(base | (1 << 21) | vec::ADD_SAT).unwrap();
        let Instruction::Vector(v) = byv else {
            panic!("expected vector instruction");
        };
        assert_eq!(v.fmt, VecFormat::Qh);
        assert_eq!(v.sel, OperandSelect::Vector);
        // By-element OB with lane 3.
        let bye = decode(base | (0b1_0110 << 21) | vec::ADD_SAT).unwrap();
        let Instruction::Vector(v) = bye else {
            panic!("expected vector instruction");
        };
        assert_eq!(v.fmt, VecFormat::Ob);
        assert_eq!(v.sel, OperandSelect::Element(3));
        // OB arithmetic right shift does not exist.
        assert!(matches!(
            decode(base | vec::SRA),
            Err(Exception::ReservedInstruction(_))
        ));
    }

    #[test]
    fn unknown_primary_opcode_is_reserved() {
        assert!(matches!(
            decode(0xFC00_0000),
            Err(Exception::ReservedInstruction(_))
        ));
    }
}
