//! Instruction semantics.
//!
//! One `match` over the decoded [`Instruction`] sum type. Each arm combines
//! the execution units to implement the instruction's architectural
//! behavior and reports how the program counter should advance. An
//! architectural exception unwinds out of the arm before any remaining
//! side effect of the instruction commits.

use crate::common::{Exception, VirtAddr};
use crate::core::arch::fcsr::RoundingMode;
use crate::core::units::alu::{Alu32, Alu64};
use crate::core::units::fpu::{self, convert, FpEnv};
use crate::core::units::lsu::AccessLength;
use crate::core::units::vu::{lanes, ops, VecFormat};
use crate::isa::instruction::{
    AluImmOp, AluOp, BranchCond, Cp1MoveOp, FpFmt, FpOp, FusedOp, HiLoOp, Instruction, LoadOp,
    MulDivOp, ShiftAmount, ShiftOp, StoreOp, VecOp, VectorInstr,
};
use crate::mem::Memory;

use super::pending::PendingTarget;
use super::{Cpu, ExecFault};

/// Result-availability delay for HI/LO fills and condition-bit writes.
const RESULT_DELAY: u8 = 1;

/// FCSR register number for CTC1/CFC1.
const FCR_CSR: usize = 31;

/// How the program counter advances after an instruction commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Sequential advance.
    Next,
    /// A taken branch: execute the delay slot, then redirect.
    Branch(u64),
    /// Exception return: redirect immediately, no delay slot.
    Redirect(u64),
    /// The halt encoding.
    Halt,
}

impl Cpu {
    /// Executes one decoded instruction against the machine state.
    pub(crate) fn dispatch(
        &mut self,
        inst: Instruction,
        mem: &mut Memory,
    ) -> Result<Action, ExecFault> {
        match inst {
            Instruction::Shift { op, rt, rd, amount } => {
                self.exec_shift(op, rt, rd, amount);
                Ok(Action::Next)
            }
            Instruction::AluReg { op, rs, rt, rd } => {
                self.exec_alu_reg(op, rs, rt, rd)?;
                Ok(Action::Next)
            }
            Instruction::AluImm { op, rs, rt, imm } => {
                self.exec_alu_imm(op, rs, rt, imm)?;
                Ok(Action::Next)
            }
            Instruction::MulDiv { op, rs, rt } => {
                self.exec_mul_div(op, rs, rt)?;
                Ok(Action::Next)
            }
            Instruction::HiLo { op, reg } => {
                match op {
                    HiLoOp::Mfhi => self.gpr.write(reg, self.hi),
                    HiLoOp::Mflo => self.gpr.write(reg, self.lo),
                    HiLoOp::Mthi => self.hi = self.gpr.read(reg),
                    HiLoOp::Mtlo => self.lo = self.gpr.read(reg),
                }
                Ok(Action::Next)
            }
            Instruction::Jump { target, link } => {
                if link {
                    self.link_return();
                }
                let region = self.pc.wrapping_add(4) & !0x0FFF_FFFF;
                Ok(Action::Branch(region | (u64::from(target) << 2)))
            }
            Instruction::JumpReg { rs, link } => {
                let target = self.gpr.read(rs);
                if let Some(rd) = link {
                    let ra = self.pc.wrapping_add(8);
                    self.gpr.write(rd, ra);
                }
                Ok(Action::Branch(target))
            }
            Instruction::Branch {
                cond,
                rs,
                rt,
                offset,
                link,
            } => {
                if link {
                    self.link_return();
                }
                let a = self.gpr.read(rs) as i64;
                let b = self.gpr.read(rt) as i64;
                let taken = match cond {
                    BranchCond::Eq => a == b,
                    BranchCond::Ne => a != b,
                    BranchCond::Lez => a <= 0,
                    BranchCond::Gtz => a > 0,
                    BranchCond::Ltz => a < 0,
                    BranchCond::Gez => a >= 0,
                };
                if taken {
                    Ok(Action::Branch(self.branch_target(offset)))
                } else {
                    Ok(Action::Next)
                }
            }
            Instruction::Load {
                op,
                base,
                rt,
                offset,
            } => {
                self.exec_load(op, base, rt, offset, mem)?;
                Ok(Action::Next)
            }
            Instruction::Store {
                op,
                base,
                rt,
                offset,
            } => {
                self.exec_store(op, base, rt, offset, mem)?;
                Ok(Action::Next)
            }
            Instruction::Teq { rs, rt } => {
                if self.gpr.read(rs) == self.gpr.read(rt) {
                    return Err(Exception::Trap.into());
                }
                Ok(Action::Next)
            }
            Instruction::Syscall => Err(Exception::Syscall.into()),
            Instruction::Break { code } => {
                // Code zero is the halt encoding; debugger breakpoints carry
                // a non-zero code and trap architecturally.
                if code == 0 {
                    tracing::debug!("break encoding reached, halting");
                    Ok(Action::Halt)
                } else {
                    Err(Exception::Breakpoint(code).into())
                }
            }
            Instruction::Mfc0 { rt, rd } => {
                let value = self.cp0.read(rd);
                self.gpr.write(rt, value);
                Ok(Action::Next)
            }
            Instruction::Mtc0 { rt, rd } => {
                let value = self.gpr.read(rt);
                self.cp0.write(rd, value);
                Ok(Action::Next)
            }
            Instruction::Eret => {
                let target = self.cp0.eret();
                self.lsu.reservation.clear();
                Ok(Action::Redirect(target))
            }
            Instruction::Cp1Move { op, rt, fs } => {
                self.exec_cp1_move(op, rt, fs)?;
                Ok(Action::Next)
            }
            Instruction::Bc1 { cc, truth, offset } => {
                if self.fcsr.condition(cc) == truth {
                    Ok(Action::Branch(self.branch_target(offset)))
                } else {
                    Ok(Action::Next)
                }
            }
            Instruction::FpArith {
                op,
                fmt,
                ft,
                fs,
                fd,
            } => {
                self.exec_fp_arith(op, fmt, ft, fs, fd)?;
                Ok(Action::Next)
            }
            Instruction::FpCompare {
                fmt,
                ft,
                fs,
                cc,
                predicate,
            } => {
                self.exec_fp_compare(fmt, ft, fs, cc, predicate)?;
                Ok(Action::Next)
            }
            Instruction::FpFused {
                op,
                fmt,
                fr,
                fs,
                ft,
                fd,
            } => {
                self.exec_fp_fused(op, fmt, fr, fs, ft, fd)?;
                Ok(Action::Next)
            }
            Instruction::Vector(v) => {
                self.exec_vector(v)?;
                Ok(Action::Next)
            }
        }
    }

    /// Writes the sequential return address for a linking branch or jump.
    fn link_return(&mut self) {
        let ra = self.pc.wrapping_add(8);
        self.gpr.write(crate::common::constants::REG_RA, ra);
    }

    /// PC-relative branch target: the delay slot plus the scaled offset.
    fn branch_target(&self, offset: i16) -> u64 {
        self.pc
            .wrapping_add(4)
            .wrapping_add((i64::from(offset) << 2) as u64)
    }

    fn exec_shift(&mut self, op: ShiftOp, rt: usize, rd: usize, amount: ShiftAmount) {
        let value = self.gpr.read(rt);
        let amt = match amount {
            ShiftAmount::Immediate(sa) => sa,
            ShiftAmount::Register(rs) => self.gpr.read(rs) as u32,
        };
        let result = match op {
            ShiftOp::Sll => i64::from(((value as u32) << (amt & 31)) as i32) as u64,
            ShiftOp::Srl => i64::from(((value as u32) >> (amt & 31)) as i32) as u64,
            ShiftOp::Sra => i64::from((value as u32 as i32) >> (amt & 31)) as u64,
            ShiftOp::Dsll => value << (amt & 63),
            ShiftOp::Dsrl => value >> (amt & 63),
            ShiftOp::Dsra => ((value as i64) >> (amt & 63)) as u64,
        };
        self.gpr.write(rd, result);
    }

    /// 32-bit trapping add/sub through the flagged ALU, sign-extending the
    /// result as the architecture requires.
    fn flagged32(a: u64, b: u64, subtract: bool) -> Result<u64, Exception> {
        let mut alu = Alu32::begin(a as u32);
        let r = if subtract {
            alu.subtract_via_negated_add(b as u32, false)
        } else {
            alu.add_with_carry_in(b as u32, false)
        };
        if alu.overflow() {
            return Err(Exception::IntegerOverflow);
        }
        Ok(i64::from(r as i32) as u64)
    }

    /// 64-bit trapping add/sub through the flagged ALU.
    fn flagged64(a: u64, b: u64, subtract: bool) -> Result<u64, Exception> {
        let mut alu = Alu64::begin(a);
        let r = if subtract {
            alu.subtract_via_negated_add(b, false)
        } else {
            alu.add_with_carry_in(b, false)
        };
        if alu.overflow() {
            return Err(Exception::IntegerOverflow);
        }
        Ok(r)
    }

    fn exec_alu_reg(
        &mut self,
        op: AluOp,
        rs: usize,
        rt: usize,
        rd: usize,
    ) -> Result<(), Exception> {
        let a = self.gpr.read(rs);
        let b = self.gpr.read(rt);
        let result = match op {
            AluOp::Add => Self::flagged32(a, b, false)?,
            AluOp::Sub => Self::flagged32(a, b, true)?,
            AluOp::Dadd => Self::flagged64(a, b, false)?,
            AluOp::Dsub => Self::flagged64(a, b, true)?,
            AluOp::Addu => i64::from((a as u32).wrapping_add(b as u32) as i32) as u64,
            AluOp::Subu => i64::from((a as u32).wrapping_sub(b as u32) as i32) as u64,
            AluOp::Daddu => a.wrapping_add(b),
            AluOp::Dsubu => a.wrapping_sub(b),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::Nor => !(a | b),
            AluOp::Slt => u64::from((a as i64) < (b as i64)),
            AluOp::Sltu => u64::from(a < b),
            AluOp::Movz => {
                if b == 0 {
                    a
                } else {
                    return Ok(());
                }
            }
            AluOp::Movn => {
                if b != 0 {
                    a
                } else {
                    return Ok(());
                }
            }
        };
        self.gpr.write(rd, result);
        Ok(())
    }

    fn exec_alu_imm(
        &mut self,
        op: AluImmOp,
        rs: usize,
        rt: usize,
        imm: i16,
    ) -> Result<(), Exception> {
        let a = self.gpr.read(rs);
        let se = i64::from(imm) as u64;
        let ze = u64::from(imm as u16);
        let result = match op {
            AluImmOp::Addi => Self::flagged32(a, se, false)?,
            AluImmOp::Daddi => Self::flagged64(a, se, false)?,
            AluImmOp::Addiu => i64::from((a as u32).wrapping_add(se as u32) as i32) as u64,
            AluImmOp::Daddiu => a.wrapping_add(se),
            AluImmOp::Slti => u64::from((a as i64) < i64::from(imm)),
            AluImmOp::Sltiu => u64::from(a < se),
            AluImmOp::Andi => a & ze,
            AluImmOp::Ori => a | ze,
            AluImmOp::Xori => a ^ ze,
            AluImmOp::Lui => i64::from(((ze as u32) << 16) as i32) as u64,
        };
        self.gpr.write(rt, result);
        Ok(())
    }

    fn exec_mul_div(&mut self, op: MulDivOp, rs: usize, rt: usize) -> Result<(), ExecFault> {
        let a = self.gpr.read(rs);
        let b = self.gpr.read(rt);
        let (lo, hi) = match op {
            MulDivOp::Mult => {
                let p = i64::from(a as u32 as i32) * i64::from(b as u32 as i32);
                (i64::from(p as i32) as u64, i64::from((p >> 32) as i32) as u64)
            }
            MulDivOp::Multu => {
                let p = u64::from(a as u32) * u64::from(b as u32);
                (i64::from(p as i32) as u64, i64::from((p >> 32) as i32) as u64)
            }
            MulDivOp::Dmult => {
                let p = i128::from(a as i64) * i128::from(b as i64);
                (p as u64, (p >> 64) as u64)
            }
            MulDivOp::Dmultu => {
                let p = u128::from(a) * u128::from(b);
                (p as u64, (p >> 64) as u64)
            }
            MulDivOp::Div => {
                let (n, d) = (a as u32 as i32, b as u32 as i32);
                let (q, r) = if d == 0 {
                    // Divide-by-zero is architecturally unpredictable; this
                    // engine pins it to quotient 0, remainder = dividend.
                    (0, n)
                } else if n == i32::MIN && d == -1 {
                    (i32::MIN, 0)
                } else {
                    (n / d, n % d)
                };
                (i64::from(q) as u64, i64::from(r) as u64)
            }
            MulDivOp::Divu => {
                let (n, d) = (a as u32, b as u32);
                let (q, r) = if d == 0 { (0, n) } else { (n / d, n % d) };
                (i64::from(q as i32) as u64, i64::from(r as i32) as u64)
            }
            MulDivOp::Ddiv => {
                let (n, d) = (a as i64, b as i64);
                let (q, r) = if d == 0 {
                    (0, n)
                } else if n == i64::MIN && d == -1 {
                    (i64::MIN, 0)
                } else {
                    (n / d, n % d)
                };
                (q as u64, r as u64)
            }
            MulDivOp::Ddivu => {
                let (q, r) = if b == 0 { (0, a) } else { (a / b, a % b) };
                (q, r)
            }
        };
        // HI/LO become visible one issue slot later, in FIFO order.
        self.pending.push(PendingTarget::Lo, lo, RESULT_DELAY)?;
        self.pending.push(PendingTarget::Hi, hi, RESULT_DELAY)?;
        Ok(())
    }

    fn exec_load(
        &mut self,
        op: LoadOp,
        base: usize,
        rt: usize,
        offset: i16,
        mem: &Memory,
    ) -> Result<(), Exception> {
        let addr = VirtAddr::new(self.gpr.read(base).wrapping_add(i64::from(offset) as u64));
        let reversed = self.cp0.reverse_endian();
        match op {
            LoadOp::Lb => {
                let v = self.lsu.load(mem, addr, AccessLength::Byte, reversed)?;
                self.gpr.write(rt, i64::from(v as u8 as i8) as u64);
            }
            LoadOp::Lbu => {
                let v = self.lsu.load(mem, addr, AccessLength::Byte, reversed)?;
                self.gpr.write(rt, v);
            }
            LoadOp::Lh => {
                let v = self.lsu.load(mem, addr, AccessLength::Half, reversed)?;
                self.gpr.write(rt, i64::from(v as u16 as i16) as u64);
            }
            LoadOp::Lhu => {
                let v = self.lsu.load(mem, addr, AccessLength::Half, reversed)?;
                self.gpr.write(rt, v);
            }
            LoadOp::Lw => {
                let v = self.lsu.load(mem, addr, AccessLength::Word, reversed)?;
                self.gpr.write(rt, i64::from(v as u32 as i32) as u64);
            }
            LoadOp::Lwu => {
                let v = self.lsu.load(mem, addr, AccessLength::Word, reversed)?;
                self.gpr.write(rt, v);
            }
            LoadOp::Ld => {
                let v = self.lsu.load(mem, addr, AccessLength::Double, reversed)?;
                self.gpr.write(rt, v);
            }
            LoadOp::Lwl | LoadOp::Lwr => {
                let merged = self.merge_load(mem, addr, op == LoadOp::Lwl, 4, reversed)?;
                let old = self.gpr.read(rt) as u32;
                let keep_bits = 32 - 8 * merged.len_bytes;
                let v = if merged.left {
                    (merged.value as u32) << keep_bits | (old & low_mask32(keep_bits))
                } else {
                    (old & !low_mask32(8 * merged.len_bytes)) | merged.value as u32
                };
                self.gpr.write(rt, i64::from(v as i32) as u64);
            }
            LoadOp::Ldl | LoadOp::Ldr => {
                let merged = self.merge_load(mem, addr, op == LoadOp::Ldl, 8, reversed)?;
                let old = self.gpr.read(rt);
                let keep_bits = 64 - 8 * merged.len_bytes;
                let v = if merged.left {
                    (merged.value << keep_bits) | (old & low_mask64(keep_bits))
                } else {
                    (old & !low_mask64(8 * merged.len_bytes)) | merged.value
                };
                self.gpr.write(rt, v);
            }
            LoadOp::Ll => {
                let v = self
                    .lsu
                    .load_linked(mem, addr, AccessLength::Word, reversed)?;
                self.gpr.write(rt, i64::from(v as u32 as i32) as u64);
            }
            LoadOp::Lld => {
                let v = self
                    .lsu
                    .load_linked(mem, addr, AccessLength::Double, reversed)?;
                self.gpr.write(rt, v);
            }
            LoadOp::Lwc1 => {
                let v = self.lsu.load(mem, addr, AccessLength::Word, reversed)?;
                self.fpr.write_raw32(rt, v as u32);
            }
            LoadOp::Ldc1 => {
                let v = self.lsu.load(mem, addr, AccessLength::Double, reversed)?;
                self.fpr.write_raw64(rt, v);
            }
        }
        Ok(())
    }

    fn exec_store(
        &mut self,
        op: StoreOp,
        base: usize,
        rt: usize,
        offset: i16,
        mem: &mut Memory,
    ) -> Result<(), Exception> {
        let addr = VirtAddr::new(self.gpr.read(base).wrapping_add(i64::from(offset) as u64));
        let reversed = self.cp0.reverse_endian();
        let value = self.gpr.read(rt);
        match op {
            StoreOp::Sb => self.lsu.store(mem, addr, AccessLength::Byte, value, reversed)?,
            StoreOp::Sh => self.lsu.store(mem, addr, AccessLength::Half, value, reversed)?,
            StoreOp::Sw => self.lsu.store(mem, addr, AccessLength::Word, value, reversed)?,
            StoreOp::Sd => self
                .lsu
                .store(mem, addr, AccessLength::Double, value, reversed)?,
            StoreOp::Swl | StoreOp::Swr => {
                let part = self.merge_span(addr, op == StoreOp::Swl, 4, reversed);
                let v32 = value as u32;
                let bytes = if part.left {
                    v32 >> (32 - 8 * part.len_bytes)
                } else {
                    v32 & low_mask32(8 * part.len_bytes)
                };
                self.store_partial(mem, part, u64::from(bytes), reversed)?;
            }
            StoreOp::Sdl | StoreOp::Sdr => {
                let part = self.merge_span(addr, op == StoreOp::Sdl, 8, reversed);
                let bytes = if part.left {
                    value >> (64 - 8 * part.len_bytes)
                } else {
                    value & low_mask64(8 * part.len_bytes)
                };
                self.store_partial(mem, part, bytes, reversed)?;
            }
            StoreOp::Sc => {
                let ok =
                    self.lsu
                        .store_conditional(mem, addr, AccessLength::Word, value, reversed)?;
                self.gpr.write(rt, u64::from(ok));
            }
            StoreOp::Scd => {
                let ok = self.lsu.store_conditional(
                    mem,
                    addr,
                    AccessLength::Double,
                    value,
                    reversed,
                )?;
                self.gpr.write(rt, u64::from(ok));
            }
            StoreOp::Swc1 => {
                let v = u64::from(self.fpr.read_raw32(rt));
                self.lsu.store(mem, addr, AccessLength::Word, v, reversed)?;
            }
            StoreOp::Sdc1 => {
                let v = self.fpr.read_raw64(rt);
                self.lsu.store(mem, addr, AccessLength::Double, v, reversed)?;
            }
        }
        Ok(())
    }

    /// Computes the byte span a left/right merge access covers.
    fn merge_span(&self, addr: VirtAddr, is_left: bool, boundary: u64, reversed: bool) -> MergeSpan {
        use crate::config::Endianness;
        let offset = addr.val() % boundary;
        let big = self.lsu.effective_endianness(reversed) == Endianness::Big;
        // The "left" op touches from the addressed byte to the end of the
        // word on a big-endian machine, and the mirrored span on
        // little-endian.
        let toward_end = is_left == big;
        if toward_end {
            MergeSpan {
                start: addr.val(),
                len_bytes: (boundary - offset) as u32,
                left: is_left,
                value: 0,
            }
        } else {
            MergeSpan {
                start: addr.val() - offset,
                len_bytes: (offset + 1) as u32,
                left: is_left,
                value: 0,
            }
        }
    }

    /// Reads a merge span as a single partial-length access.
    fn merge_load(
        &self,
        mem: &Memory,
        addr: VirtAddr,
        is_left: bool,
        boundary: u64,
        reversed: bool,
    ) -> Result<MergeSpan, Exception> {
        let mut span = self.merge_span(addr, is_left, boundary, reversed);
        let len = AccessLength::from_bytes(u64::from(span.len_bytes))
            .ok_or(Exception::AddressErrorLoad(addr.val()))?;
        span.value = self
            .lsu
            .load(mem, VirtAddr::new(span.start), len, reversed)?;
        Ok(span)
    }

    /// Writes a merge span as a single partial-length access.
    fn store_partial(
        &mut self,
        mem: &mut Memory,
        span: MergeSpan,
        bytes: u64,
        reversed: bool,
    ) -> Result<(), Exception> {
        let len = AccessLength::from_bytes(u64::from(span.len_bytes))
            .ok_or(Exception::AddressErrorStore(span.start))?;
        self.lsu
            .store(mem, VirtAddr::new(span.start), len, bytes, reversed)
    }

    fn exec_cp1_move(&mut self, op: Cp1MoveOp, rt: usize, fs: usize) -> Result<(), Exception> {
        match op {
            Cp1MoveOp::Mfc1 => {
                let v = self.fpr.read_raw32(fs);
                self.gpr.write(rt, i64::from(v as i32) as u64);
            }
            Cp1MoveOp::Dmfc1 => {
                let v = self.fpr.read_raw64(fs);
                self.gpr.write(rt, v);
            }
            Cp1MoveOp::Cfc1 => {
                let v = if fs == FCR_CSR { self.fcsr.read() } else { 0 };
                self.gpr.write(rt, i64::from(v as i32) as u64);
            }
            Cp1MoveOp::Mtc1 => {
                let v = self.gpr.read(rt) as u32;
                self.fpr.write_raw32(fs, v);
            }
            Cp1MoveOp::Dmtc1 => {
                let v = self.gpr.read(rt);
                self.fpr.write_raw64(fs, v);
            }
            Cp1MoveOp::Ctc1 => {
                if fs == FCR_CSR {
                    self.fcsr.write(self.gpr.read(rt) as u32);
                    // Writing cause bits that are enabled traps immediately.
                    if self.fcsr.cause() & self.fcsr.enables() != 0 {
                        return Err(Exception::FloatingPoint);
                    }
                }
            }
        }
        Ok(())
    }

    /// Ambient FPU parameters drawn from the FCSR.
    fn fp_env(&self) -> FpEnv {
        FpEnv {
            rm: self.fcsr.rounding_mode(),
            flush_to_zero: self.fcsr.flush_to_zero(),
        }
    }

    /// Merges raised IEEE flags into the FCSR; an enabled cause suppresses
    /// the pending result and raises the synchronous FP exception.
    fn settle_fp(&mut self, flags: u8) -> Result<(), Exception> {
        if self.fcsr.raise(flags) {
            return Err(Exception::FloatingPoint);
        }
        Ok(())
    }

    fn exec_fp_arith(
        &mut self,
        op: FpOp,
        fmt: FpFmt,
        ft: usize,
        fs: usize,
        fd: usize,
    ) -> Result<(), Exception> {
        self.fcsr.clear_cause();
        let env = self.fp_env();
        match fmt {
            FpFmt::S => self.fp_arith_single(op, ft, fs, fd, env),
            FpFmt::D => self.fp_arith_double(op, ft, fs, fd, env),
            FpFmt::W => {
                let src = self.fpr.read_word(fs);
                let (flags, out) = match op {
                    FpOp::CvtS => {
                        let (v, f) = convert::word_to_single(src, env.rm);
                        (f, FpWrite::S(v))
                    }
                    FpOp::CvtD => {
                        let (v, f) = convert::word_to_double(src);
                        (f, FpWrite::D(v))
                    }
                    _ => return Err(Exception::ReservedInstruction(0)),
                };
                self.settle_fp(flags)?;
                self.commit_fp(fd, out)
            }
            FpFmt::L => {
                let src = self.fpr.read_long(fs)?;
                let (flags, out) = match op {
                    FpOp::CvtS => {
                        let (v, f) = convert::long_to_single(src, env.rm);
                        (f, FpWrite::S(v))
                    }
                    FpOp::CvtD => {
                        let (v, f) = convert::long_to_double(src, env.rm);
                        (f, FpWrite::D(v))
                    }
                    _ => return Err(Exception::ReservedInstruction(0)),
                };
                self.settle_fp(flags)?;
                self.commit_fp(fd, out)
            }
            FpFmt::Ps => self.fp_arith_paired(op, ft, fs, fd, env),
        }
    }

    fn fp_arith_single(
        &mut self,
        op: FpOp,
        ft: usize,
        fs: usize,
        fd: usize,
        env: FpEnv,
    ) -> Result<(), Exception> {
        use fpu::single as s;
        let a = self.fpr.read_single(fs);
        let (out, flags) = match op {
            FpOp::Add => wrap_s(s::add(a, self.fpr.read_single(ft), env)),
            FpOp::Sub => wrap_s(s::sub(a, self.fpr.read_single(ft), env)),
            FpOp::Mul => wrap_s(s::mul(a, self.fpr.read_single(ft), env)),
            FpOp::Div => wrap_s(s::div(a, self.fpr.read_single(ft), env)),
            FpOp::Sqrt => wrap_s(s::sqrt(a, env)),
            FpOp::Abs => wrap_s(s::abs(a)),
            FpOp::Neg => wrap_s(s::neg(a)),
            FpOp::Mov => (FpWrite::S(a), 0),
            FpOp::Recip => wrap_s(s::recip(a, env)),
            FpOp::Rsqrt => wrap_s(s::rsqrt(a, env)),
            FpOp::Recip2 => wrap_s(s::recip2(a, self.fpr.read_single(ft), env)),
            FpOp::Rsqrt2 => wrap_s(s::rsqrt2(a, self.fpr.read_single(ft), env)),
            FpOp::RoundW | FpOp::TruncW | FpOp::CeilW | FpOp::FloorW => {
                let (v, f) = convert::single_to_word(a, explicit_mode(op));
                (FpWrite::W(v), f)
            }
            FpOp::RoundL | FpOp::TruncL | FpOp::CeilL | FpOp::FloorL => {
                let (v, f) = convert::single_to_long(a, explicit_mode(op));
                (FpWrite::L(v), f)
            }
            FpOp::CvtD => {
                let (v, f) = convert::single_to_double(a);
                (FpWrite::D(v), f)
            }
            FpOp::CvtW => {
                let (v, f) = convert::single_to_word(a, env.rm);
                (FpWrite::W(v), f)
            }
            FpOp::CvtL => {
                let (v, f) = convert::single_to_long(a, env.rm);
                (FpWrite::L(v), f)
            }
            FpOp::CvtS => return Err(Exception::ReservedInstruction(0)),
        };
        self.settle_fp(flags)?;
        self.commit_fp(fd, out)
    }

    fn fp_arith_double(
        &mut self,
        op: FpOp,
        ft: usize,
        fs: usize,
        fd: usize,
        env: FpEnv,
    ) -> Result<(), Exception> {
        use fpu::double as d;
        let a = self.fpr.read_double(fs)?;
        let (out, flags) = match op {
            FpOp::Add => wrap_d(d::add(a, self.fpr.read_double(ft)?, env)),
            FpOp::Sub => wrap_d(d::sub(a, self.fpr.read_double(ft)?, env)),
            FpOp::Mul => wrap_d(d::mul(a, self.fpr.read_double(ft)?, env)),
            FpOp::Div => wrap_d(d::div(a, self.fpr.read_double(ft)?, env)),
            FpOp::Sqrt => wrap_d(d::sqrt(a, env)),
            FpOp::Abs => wrap_d(d::abs(a)),
            FpOp::Neg => wrap_d(d::neg(a)),
            FpOp::Mov => (FpWrite::D(a), 0),
            FpOp::Recip => wrap_d(d::recip(a, env)),
            FpOp::Rsqrt => wrap_d(d::rsqrt(a, env)),
            FpOp::Recip2 => wrap_d(d::recip2(a, self.fpr.read_double(ft)?, env)),
            FpOp::Rsqrt2 => wrap_d(d::rsqrt2(a, self.fpr.read_double(ft)?, env)),
            FpOp::RoundW | FpOp::TruncW | FpOp::CeilW | FpOp::FloorW => {
                let (v, f) = convert::double_to_word(a, explicit_mode(op));
                (FpWrite::W(v), f)
            }
            FpOp::RoundL | FpOp::TruncL | FpOp::CeilL | FpOp::FloorL => {
                let (v, f) = convert::double_to_long(a, explicit_mode(op));
                (FpWrite::L(v), f)
            }
            FpOp::CvtS => {
                let (v, f) = convert::double_to_single(a, env.rm);
                (FpWrite::S(v), f)
            }
            FpOp::CvtW => {
                let (v, f) = convert::double_to_word(a, env.rm);
                (FpWrite::W(v), f)
            }
            FpOp::CvtL => {
                let (v, f) = convert::double_to_long(a, env.rm);
                (FpWrite::L(v), f)
            }
            FpOp::CvtD => return Err(Exception::ReservedInstruction(0)),
        };
        self.settle_fp(flags)?;
        self.commit_fp(fd, out)
    }

    fn fp_arith_paired(
        &mut self,
        op: FpOp,
        ft: usize,
        fs: usize,
        fd: usize,
        env: FpEnv,
    ) -> Result<(), Exception> {
        use fpu::{paired, single as s};
        let a = self.fpr.read_paired(fs)?;
        let (pair, flags) = match op {
            FpOp::Add => paired::map2(s::add, a, self.fpr.read_paired(ft)?, env),
            FpOp::Sub => paired::map2(s::sub, a, self.fpr.read_paired(ft)?, env),
            FpOp::Mul => paired::map2(s::mul, a, self.fpr.read_paired(ft)?, env),
            FpOp::Abs => paired::map1(s::abs, a),
            FpOp::Neg => paired::map1(s::neg, a),
            FpOp::Mov => (a, 0),
            FpOp::Recip2 => paired::map2(s::recip2, a, self.fpr.read_paired(ft)?, env),
            FpOp::Rsqrt2 => paired::map2(s::rsqrt2, a, self.fpr.read_paired(ft)?, env),
            _ => return Err(Exception::ReservedInstruction(0)),
        };
        self.settle_fp(flags)?;
        self.fpr.write_paired(fd, pair.0, pair.1)
    }

    fn exec_fp_compare(
        &mut self,
        fmt: FpFmt,
        ft: usize,
        fs: usize,
        cc: u8,
        predicate: u8,
    ) -> Result<(), ExecFault> {
        self.fcsr.clear_cause();
        match fmt {
            FpFmt::S => {
                let a = self.fpr.read_single(fs);
                let b = self.fpr.read_single(ft);
                let (r, flags) = fpu::single::compare(a, b, predicate);
                self.settle_fp(flags)?;
                self.push_fcc(cc, r)?;
            }
            FpFmt::D => {
                let a = self.fpr.read_double(fs)?;
                let b = self.fpr.read_double(ft)?;
                let (r, flags) = fpu::double::compare(a, b, predicate);
                self.settle_fp(flags)?;
                self.push_fcc(cc, r)?;
            }
            FpFmt::Ps => {
                let a = self.fpr.read_paired(fs)?;
                let b = self.fpr.read_paired(ft)?;
                let (lo, f0) = fpu::single::compare(a.0, b.0, predicate);
                let (hi, f1) = fpu::single::compare(a.1, b.1, predicate);
                self.settle_fp(f0 | f1)?;
                self.push_fcc(cc, lo)?;
                self.push_fcc(cc + 1, hi)?;
            }
            FpFmt::W | FpFmt::L => {
                return Err(Exception::ReservedInstruction(0).into());
            }
        }
        Ok(())
    }

    /// Schedules a condition-bit write, visible one issue slot later.
    fn push_fcc(&mut self, cc: u8, value: bool) -> Result<(), ExecFault> {
        self.pending
            .push(PendingTarget::Fcc { index: cc }, u64::from(value), RESULT_DELAY)?;
        Ok(())
    }

    fn exec_fp_fused(
        &mut self,
        op: FusedOp,
        fmt: FpFmt,
        fr: usize,
        fs: usize,
        ft: usize,
        fd: usize,
    ) -> Result<(), Exception> {
        self.fcsr.clear_cause();
        let env = self.fp_env();
        match fmt {
            FpFmt::S => {
                use fpu::single as s;
                let (a, b, c) = (
                    self.fpr.read_single(fs),
                    self.fpr.read_single(ft),
                    self.fpr.read_single(fr),
                );
                let (v, flags) = match op {
                    FusedOp::Madd => s::madd(a, b, c, env),
                    FusedOp::Msub => s::msub(a, b, c, env),
                    FusedOp::Nmadd => s::nmadd(a, b, c, env),
                    FusedOp::Nmsub => s::nmsub(a, b, c, env),
                };
                self.settle_fp(flags)?;
                self.fpr.write_single(fd, v);
                Ok(())
            }
            FpFmt::D => {
                use fpu::double as d;
                let (a, b, c) = (
                    self.fpr.read_double(fs)?,
                    self.fpr.read_double(ft)?,
                    self.fpr.read_double(fr)?,
                );
                let (v, flags) = match op {
                    FusedOp::Madd => d::madd(a, b, c, env),
                    FusedOp::Msub => d::msub(a, b, c, env),
                    FusedOp::Nmadd => d::nmadd(a, b, c, env),
                    FusedOp::Nmsub => d::nmsub(a, b, c, env),
                };
                self.settle_fp(flags)?;
                self.fpr.write_double(fd, v)
            }
            FpFmt::Ps => {
                use fpu::{paired, single as s};
                let (a, b, c) = (
                    self.fpr.read_paired(fs)?,
                    self.fpr.read_paired(ft)?,
                    self.fpr.read_paired(fr)?,
                );
                let scalar = match op {
                    FusedOp::Madd => s::madd,
                    FusedOp::Msub => s::msub,
                    FusedOp::Nmadd => s::nmadd,
                    FusedOp::Nmsub => s::nmsub,
                };
                let (pair, flags) = paired::map3(scalar, a, b, c, env);
                self.settle_fp(flags)?;
                self.fpr.write_paired(fd, pair.0, pair.1)
            }
            FpFmt::W | FpFmt::L => Err(Exception::ReservedInstruction(0)),
        }
    }

    /// Writes one FPU arithmetic result in its destination format.
    fn commit_fp(&mut self, fd: usize, out: FpWrite) -> Result<(), Exception> {
        match out {
            FpWrite::S(v) => {
                self.fpr.write_single(fd, v);
                Ok(())
            }
            FpWrite::D(v) => self.fpr.write_double(fd, v),
            FpWrite::W(v) => {
                self.fpr.write_word(fd, v);
                Ok(())
            }
            FpWrite::L(v) => self.fpr.write_long(fd, v),
        }
    }

    fn exec_vector(&mut self, v: VectorInstr) -> Result<(), ExecFault> {
        let vs_bits = self.fpr.read_raw64(v.vs);
        let vt_bits = self.fpr.read_raw64(v.vt);
        match v.fmt {
            VecFormat::Ob => self.exec_vector_ob(v, vs_bits, vt_bits),
            VecFormat::Qh => self.exec_vector_qh(v, vs_bits, vt_bits),
        }
    }

    fn exec_vector_ob(
        &mut self,
        v: VectorInstr,
        vs_bits: u64,
        vt_bits: u64,
    ) -> Result<(), ExecFault> {
        use ops::ob;
        let a = lanes::ob_unpack(vs_bits);
        let b = lanes::ob_resolve(vt_bits, v.sel);
        let result = match v.op {
            VecOp::AddSat => ob::add_sat(a, b),
            VecOp::SubSat => ob::sub_sat(a, b),
            VecOp::MulSat => ob::mul_sat(a, b),
            VecOp::Min => ob::min(a, b),
            VecOp::Max => ob::max(a, b),
            VecOp::And => ob::and(a, b),
            VecOp::Or => ob::or(a, b),
            VecOp::Xor => ob::xor(a, b),
            VecOp::Nor => ob::nor(a, b),
            VecOp::Sll => ob::sll(a, b),
            VecOp::Srl => ob::srl(a, b),
            VecOp::AbsDiff => ob::abs_diff(a, b),
            VecOp::Avg => ob::avg(a, b),
            VecOp::CmpEq => return self.push_vcc(ob::cmp_eq(a, b), 8),
            VecOp::CmpLt => return self.push_vcc(ob::cmp_lt(a, b), 8),
            VecOp::CmpLe => return self.push_vcc(ob::cmp_le(a, b), 8),
            VecOp::PickTrue => ob::pick(self.fcc_mask(8), a, b),
            VecOp::PickFalse => ob::pick(!self.fcc_mask(8), a, b),
            VecOp::Shuffle(p) => ob::shuffle(p, a, lanes::ob_unpack(vt_bits)),
            VecOp::MulAcc(op) => {
                self.acc.multiply_ob(op, a, b);
                return Ok(());
            }
            VecOp::LoadAccLow => {
                self.acc.load_low_ob(b);
                return Ok(());
            }
            VecOp::LoadAccHigh => {
                self.acc.load_high_ob(b);
                return Ok(());
            }
            VecOp::Reduce(policy) => self.acc.reduce_ob(policy, u32::from(b[0])),
            VecOp::Sra | VecOp::SignSelect => {
                return Err(Exception::ReservedInstruction(0).into());
            }
        };
        self.fpr.write_raw64(v.vd, lanes::ob_pack(result));
        Ok(())
    }

    fn exec_vector_qh(
        &mut self,
        v: VectorInstr,
        vs_bits: u64,
        vt_bits: u64,
    ) -> Result<(), ExecFault> {
        use ops::qh;
        let a = lanes::qh_unpack(vs_bits);
        let b = lanes::qh_resolve(vt_bits, v.sel);
        let result = match v.op {
            VecOp::AddSat => qh::add_sat(a, b),
            VecOp::SubSat => qh::sub_sat(a, b),
            VecOp::MulSat => qh::mul_sat(a, b),
            VecOp::Min => qh::min(a, b),
            VecOp::Max => qh::max(a, b),
            VecOp::And => qh::and(a, b),
            VecOp::Or => qh::or(a, b),
            VecOp::Xor => qh::xor(a, b),
            VecOp::Nor => qh::nor(a, b),
            VecOp::Sll => qh::sll(a, b),
            VecOp::Srl => qh::srl(a, b),
            VecOp::Sra => qh::sra(a, b),
            VecOp::SignSelect => qh::sign_select(a, b),
            VecOp::CmpEq => return self.push_vcc(qh::cmp_eq(a, b), 4),
            VecOp::CmpLt => return self.push_vcc(qh::cmp_lt(a, b), 4),
            VecOp::CmpLe => return self.push_vcc(qh::cmp_le(a, b), 4),
            VecOp::PickTrue => qh::pick(self.fcc_mask(4), a, b),
            VecOp::PickFalse => qh::pick(!self.fcc_mask(4), a, b),
            VecOp::Shuffle(p) => qh::shuffle(p, a, lanes::qh_unpack(vt_bits)),
            VecOp::MulAcc(op) => {
                self.acc.multiply_qh(op, a, b);
                return Ok(());
            }
            VecOp::LoadAccLow => {
                self.acc.load_low_qh(b);
                return Ok(());
            }
            VecOp::LoadAccHigh => {
                self.acc.load_high_qh(b);
                return Ok(());
            }
            VecOp::Reduce(policy) => self.acc.reduce_qh(policy, i32::from(b[0])),
            VecOp::AbsDiff | VecOp::Avg => {
                return Err(Exception::ReservedInstruction(0).into());
            }
        };
        self.fpr.write_raw64(v.vd, lanes::qh_pack(result));
        Ok(())
    }

    /// Current condition-code bits as a lane mask.
    fn fcc_mask(&self, count: u8) -> u8 {
        let mut mask = 0;
        for i in 0..count {
            if self.fcsr.condition(i) {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Schedules per-lane condition-bit writes from a compare mask.
    fn push_vcc(&mut self, mask: u8, count: u8) -> Result<(), ExecFault> {
        for i in 0..count {
            self.pending.push(
                PendingTarget::Fcc { index: i },
                u64::from(mask >> i) & 1,
                RESULT_DELAY,
            )?;
        }
        Ok(())
    }
}

/// A format-tagged FPU result awaiting commit.
enum FpWrite {
    S(f32),
    D(f64),
    W(i32),
    L(i64),
}

fn wrap_s(r: (f32, u8)) -> (FpWrite, u8) {
    (FpWrite::S(r.0), r.1)
}

fn wrap_d(r: (f64, u8)) -> (FpWrite, u8) {
    (FpWrite::D(r.0), r.1)
}

/// Explicit rounding mode of the ROUND/TRUNC/CEIL/FLOOR conversions.
fn explicit_mode(op: FpOp) -> RoundingMode {
    match op {
        FpOp::RoundW | FpOp::RoundL => RoundingMode::Nearest,
        FpOp::TruncW | FpOp::TruncL => RoundingMode::TowardZero,
        FpOp::CeilW | FpOp::CeilL => RoundingMode::TowardPositive,
        _ => RoundingMode::TowardNegative,
    }
}

/// Byte span and loaded value of a left/right merge access.
#[derive(Debug, Clone, Copy, Default)]
struct MergeSpan {
    start: u64,
    len_bytes: u32,
    left: bool,
    value: u64,
}

/// Mask of the low `bits` bits, tolerating a full-width request.
fn low_mask32(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1_u32 << bits) - 1
    }
}

fn low_mask64(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    }
}
