//! Decoded instruction representation.
//!
//! A tagged sum type over instruction kinds; the execution core dispatches
//! on it with a single `match`, preserving the jump-table shape of a decode
//! table without untyped function pointers. Register fields are plain
//! indices; immediates keep their architectural signedness.

use crate::core::units::vu::{AccOp, OperandSelect, ReduceRounding, Shuffle, VecFormat};

/// Shift operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    /// 32-bit logical left (result sign-extended).
    Sll,
    /// 32-bit logical right.
    Srl,
    /// 32-bit arithmetic right.
    Sra,
    /// 64-bit logical left.
    Dsll,
    /// 64-bit logical right.
    Dsrl,
    /// 64-bit arithmetic right.
    Dsra,
}

/// Shift amount source: a constant field or the low bits of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftAmount {
    /// Immediate amount; the `+32` encodings decode with 32 added.
    Immediate(u32),
    /// Amount from a register, masked to the operation width.
    Register(usize),
}

/// Three-register integer operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    /// 32-bit add, trapping on signed overflow.
    Add,
    /// 32-bit add without trap.
    Addu,
    /// 32-bit subtract, trapping on signed overflow.
    Sub,
    /// 32-bit subtract without trap.
    Subu,
    /// 64-bit add, trapping on signed overflow.
    Dadd,
    /// 64-bit add without trap.
    Daddu,
    /// 64-bit subtract, trapping on signed overflow.
    Dsub,
    /// 64-bit subtract without trap.
    Dsubu,
    And,
    Or,
    Xor,
    Nor,
    /// Signed set-less-than.
    Slt,
    /// Unsigned set-less-than.
    Sltu,
    /// Conditional move on rt == 0.
    Movz,
    /// Conditional move on rt != 0.
    Movn,
}

/// Immediate integer operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluImmOp {
    /// 32-bit add immediate, trapping on signed overflow.
    Addi,
    /// 32-bit add immediate without trap.
    Addiu,
    /// 64-bit add immediate, trapping on signed overflow.
    Daddi,
    /// 64-bit add immediate without trap.
    Daddiu,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    /// Load upper immediate (sign-extended 32-bit result).
    Lui,
}

/// Multiply/divide selector; results fill HI/LO through the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulDivOp {
    Mult,
    Multu,
    Div,
    Divu,
    Dmult,
    Dmultu,
    Ddiv,
    Ddivu,
}

/// HI/LO register access selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiLoOp {
    Mfhi,
    Mthi,
    Mflo,
    Mtlo,
}

/// Branch comparison selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCond {
    /// rs == rt.
    Eq,
    /// rs != rt.
    Ne,
    /// rs <= 0 (signed).
    Lez,
    /// rs > 0 (signed).
    Gtz,
    /// rs < 0 (signed).
    Ltz,
    /// rs >= 0 (signed).
    Gez,
}

/// Load operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Lb,
    Lbu,
    Lh,
    Lhu,
    Lw,
    Lwu,
    Ld,
    /// Left-merge word load (partial bytes into the high lanes).
    Lwl,
    /// Right-merge word load.
    Lwr,
    /// Left-merge doubleword load.
    Ldl,
    /// Right-merge doubleword load.
    Ldr,
    /// Linked word load.
    Ll,
    /// Linked doubleword load.
    Lld,
    /// Word load into an FPU register.
    Lwc1,
    /// Doubleword load into an FPU register.
    Ldc1,
}

/// Store operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Sb,
    Sh,
    Sw,
    Sd,
    /// Left-merge word store.
    Swl,
    /// Right-merge word store.
    Swr,
    /// Left-merge doubleword store.
    Sdl,
    /// Right-merge doubleword store.
    Sdr,
    /// Conditional word store.
    Sc,
    /// Conditional doubleword store.
    Scd,
    /// Word store from an FPU register.
    Swc1,
    /// Doubleword store from an FPU register.
    Sdc1,
}

/// Data format of a COP1 arithmetic instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpFmt {
    /// IEEE binary32.
    S,
    /// IEEE binary64.
    D,
    /// 32-bit fixed point.
    W,
    /// 64-bit fixed point.
    L,
    /// Paired single.
    Ps,
}

/// COP1 per-format operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpOp {
    Add,
    Sub,
    Mul,
    Div,
    Sqrt,
    Abs,
    Mov,
    Neg,
    Recip,
    Rsqrt,
    /// Reciprocal refinement step.
    Recip2,
    /// Reciprocal-square-root refinement step.
    Rsqrt2,
    /// Convert to word with an explicit rounding mode.
    RoundW,
    TruncW,
    CeilW,
    FloorW,
    /// Convert to long with an explicit rounding mode.
    RoundL,
    TruncL,
    CeilL,
    FloorL,
    /// Convert to the named format under the FCSR rounding mode.
    CvtS,
    CvtD,
    CvtW,
    CvtL,
}

/// Fused multiply-add family selector (two-step rounding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusedOp {
    Madd,
    Msub,
    Nmadd,
    Nmsub,
}

/// FPU register move selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cp1MoveOp {
    /// Word move from FPR (sign-extended).
    Mfc1,
    /// Doubleword move from FPR.
    Dmfc1,
    /// Move from FPU control register.
    Cfc1,
    /// Word move to FPR.
    Mtc1,
    /// Doubleword move to FPR.
    Dmtc1,
    /// Move to FPU control register.
    Ctc1,
}

/// Vector-unit operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VecOp {
    AddSat,
    SubSat,
    MulSat,
    Min,
    Max,
    And,
    Or,
    Xor,
    Nor,
    Sll,
    Srl,
    /// QH only.
    Sra,
    /// OB only.
    AbsDiff,
    /// OB only.
    Avg,
    /// QH only.
    SignSelect,
    /// Compares write per-lane condition bits (delayed one slot).
    CmpEq,
    CmpLt,
    CmpLe,
    /// Lane select on set condition bits.
    PickTrue,
    /// Lane select on clear condition bits.
    PickFalse,
    /// Fixed cross-lane permutation.
    Shuffle(Shuffle),
    /// Multiply into the accumulator.
    MulAcc(AccOp),
    /// Load the accumulator's low parts from a vector.
    LoadAccLow,
    /// Load the accumulator's high parts from a vector.
    LoadAccHigh,
    /// Rounding reduction of the accumulator into the destination.
    Reduce(ReduceRounding),
}

/// A decoded vector-unit instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorInstr {
    /// Operation.
    pub op: VecOp,
    /// Lane format.
    pub fmt: VecFormat,
    /// Second-operand addressing mode.
    pub sel: OperandSelect,
    /// First source register (FPR index).
    pub vs: usize,
    /// Second source register (FPR index).
    pub vt: usize,
    /// Destination register (FPR index).
    pub vd: usize,
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Constant or variable shift.
    Shift {
        op: ShiftOp,
        rt: usize,
        rd: usize,
        amount: ShiftAmount,
    },
    /// Three-register integer arithmetic/logic.
    AluReg {
        op: AluOp,
        rs: usize,
        rt: usize,
        rd: usize,
    },
    /// Immediate integer arithmetic/logic.
    AluImm {
        op: AluImmOp,
        rs: usize,
        rt: usize,
        imm: i16,
    },
    /// Multiply or divide into HI/LO.
    MulDiv { op: MulDivOp, rs: usize, rt: usize },
    /// HI/LO register moves.
    HiLo { op: HiLoOp, reg: usize },
    /// Absolute jump (J/JAL).
    Jump { target: u32, link: bool },
    /// Register jump (JR/JALR).
    JumpReg { rs: usize, link: Option<usize> },
    /// Conditional branch, optionally linking.
    Branch {
        cond: BranchCond,
        rs: usize,
        rt: usize,
        offset: i16,
        link: bool,
    },
    /// Memory load.
    Load {
        op: LoadOp,
        base: usize,
        rt: usize,
        offset: i16,
    },
    /// Memory store.
    Store {
        op: StoreOp,
        base: usize,
        rt: usize,
        offset: i16,
    },
    /// Conditional trap on rs == rt.
    Teq { rs: usize, rt: usize },
    /// System call.
    Syscall,
    /// Breakpoint; code zero is the halt encoding of this engine, non-zero
    /// codes raise the breakpoint exception.
    Break { code: u32 },
    /// Move from CP0.
    Mfc0 { rt: usize, rd: u8 },
    /// Move to CP0.
    Mtc0 { rt: usize, rd: u8 },
    /// Return from exception.
    Eret,
    /// GPR/FPR and control-register moves.
    Cp1Move { op: Cp1MoveOp, rt: usize, fs: usize },
    /// Branch on floating-point condition code.
    Bc1 { cc: u8, truth: bool, offset: i16 },
    /// Per-format FPU arithmetic.
    FpArith {
        op: FpOp,
        fmt: FpFmt,
        ft: usize,
        fs: usize,
        fd: usize,
    },
    /// FPU compare writing a condition bit (delayed one slot).
    FpCompare {
        fmt: FpFmt,
        ft: usize,
        fs: usize,
        cc: u8,
        predicate: u8,
    },
    /// Fused multiply-add family.
    FpFused {
        op: FusedOp,
        fmt: FpFmt,
        fr: usize,
        fs: usize,
        ft: usize,
        fd: usize,
    },
    /// Vector-unit operation.
    Vector(VectorInstr),
}
