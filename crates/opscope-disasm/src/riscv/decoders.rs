//! RISC-V operand decoders: one per instruction format, plus the
//! compressed formats with their scrambled immediates.

use opscope_core::register::riscv::SP;
use opscope_core::{ArchDetail, MemoryRef, Operand, RiscVDetail, RoundingMode};

use super::csr::csr;
use super::registers::{files, Files};
use super::Xlen;
use crate::engine::operands::{
    gather_bits, pc_relative, sign_extend, signed_immediate, unsigned_immediate, BitPiece,
};
use crate::engine::{OperandContext, RegisterTable};
use crate::error::OperandError;

id_enum! {
    /// Operand decoders named by the decode tables.
    pub enum Dec {
        Upper,
        Jal,
        Jalr,
        Branch,
        Load,
        Store,
        Imm,
        ShiftImm,
        ShiftImmW,
        Reg,
        Fence,
        NoOperands,
        Csr,
        CsrImm,
        FpLoad,
        FpStore,
        FpArith,
        FpToInt,
        IntToFp,
        CAddi4spn,
        CLoadWord,
        CLoadDouble,
        CStoreWord,
        CStoreDouble,
        CFpLoadWord,
        CFpLoadDouble,
        CFpStoreWord,
        CFpStoreDouble,
        CAddi,
        CAddiw,
        CJump,
        CLi,
        CAddi16sp,
        CLui,
        CShiftImm,
        CAndi,
        CArith,
        CBranch,
        CSlli,
        CLoadWordSp,
        CLoadDoubleSp,
        CFpLoadWordSp,
        CFpLoadDoubleSp,
        CJr,
        CMv,
        CAdd,
        CStoreWordSp,
        CStoreDoubleSp,
        CFpStoreWordSp,
        CFpStoreDoubleSp,
    }
}

type DecodeResult = Result<(), OperandError>;

const J_IMM: [BitPiece; 4] = [
    BitPiece::new(21, 10, 1),
    BitPiece::new(20, 1, 11),
    BitPiece::new(12, 8, 12),
    BitPiece::new(31, 1, 20),
];
const B_IMM: [BitPiece; 4] = [
    BitPiece::new(8, 4, 1),
    BitPiece::new(25, 6, 5),
    BitPiece::new(7, 1, 11),
    BitPiece::new(31, 1, 12),
];
const S_IMM: [BitPiece; 2] = [BitPiece::new(7, 5, 0), BitPiece::new(25, 7, 5)];

const CJ_IMM: [BitPiece; 8] = [
    BitPiece::new(3, 3, 1),
    BitPiece::new(11, 1, 4),
    BitPiece::new(2, 1, 5),
    BitPiece::new(7, 1, 6),
    BitPiece::new(6, 1, 7),
    BitPiece::new(9, 2, 8),
    BitPiece::new(8, 1, 10),
    BitPiece::new(12, 1, 11),
];
const CB_IMM: [BitPiece; 5] = [
    BitPiece::new(3, 2, 1),
    BitPiece::new(10, 2, 3),
    BitPiece::new(2, 1, 5),
    BitPiece::new(5, 2, 6),
    BitPiece::new(12, 1, 8),
];
const CI_IMM: [BitPiece; 2] = [BitPiece::new(2, 5, 0), BitPiece::new(12, 1, 5)];
const ADDI4SPN_IMM: [BitPiece; 4] = [
    BitPiece::new(6, 1, 2),
    BitPiece::new(5, 1, 3),
    BitPiece::new(11, 2, 4),
    BitPiece::new(7, 4, 6),
];
const ADDI16SP_IMM: [BitPiece; 5] = [
    BitPiece::new(6, 1, 4),
    BitPiece::new(2, 1, 5),
    BitPiece::new(5, 1, 6),
    BitPiece::new(3, 2, 7),
    BitPiece::new(12, 1, 9),
];
// c.lw/c.sw/c.flw/c.fsw
const CL_WORD: [BitPiece; 3] = [
    BitPiece::new(6, 1, 2),
    BitPiece::new(10, 3, 3),
    BitPiece::new(5, 1, 6),
];
// c.ld/c.sd/c.fld/c.fsd
const CL_DOUBLE: [BitPiece; 2] = [BitPiece::new(10, 3, 3), BitPiece::new(5, 2, 6)];
const LWSP: [BitPiece; 3] = [
    BitPiece::new(4, 3, 2),
    BitPiece::new(12, 1, 5),
    BitPiece::new(2, 2, 6),
];
const LDSP: [BitPiece; 3] = [
    BitPiece::new(5, 2, 3),
    BitPiece::new(12, 1, 5),
    BitPiece::new(2, 3, 6),
];
const SWSP: [BitPiece; 2] = [BitPiece::new(9, 4, 2), BitPiece::new(7, 2, 6)];
const SDSP: [BitPiece; 2] = [BitPiece::new(10, 3, 3), BitPiece::new(7, 3, 6)];

pub(crate) fn decode(dec: Dec, ctx: &mut OperandContext<'_>, xlen: Xlen) -> DecodeResult {
    let regs = files(xlen);
    ctx.set_arch(ArchDetail::RiscV(RiscVDetail::default()));
    match dec {
        Dec::Upper => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            ctx.push(unsigned_immediate(ctx.field(12, 20)?, 20));
            Ok(())
        }
        Dec::Jal => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            let raw = gather_bits(ctx.word().value(), &J_IMM);
            ctx.push(pc_relative(raw, 21, 1, ctx.address(), 0));
            Ok(())
        }
        Dec::Jalr => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            ctx.push_reg(regs.gpr, ctx.field(15, 5)?)?;
            ctx.push(signed_immediate(ctx.field(20, 12)?, 12));
            Ok(())
        }
        Dec::Branch => {
            ctx.push_reg(regs.gpr, ctx.field(15, 5)?)?;
            ctx.push_reg(regs.gpr, ctx.field(20, 5)?)?;
            let raw = gather_bits(ctx.word().value(), &B_IMM);
            ctx.push(pc_relative(raw, 13, 1, ctx.address(), 0));
            Ok(())
        }
        Dec::Load => load(ctx, regs.gpr, &regs),
        Dec::FpLoad => load(ctx, regs.fpr, &regs),
        Dec::Store => store(ctx, regs.gpr, &regs),
        Dec::FpStore => store(ctx, regs.fpr, &regs),
        Dec::Imm => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            ctx.push_reg(regs.gpr, ctx.field(15, 5)?)?;
            ctx.push(signed_immediate(ctx.field(20, 12)?, 12));
            Ok(())
        }
        Dec::ShiftImm => shift_imm(ctx, &regs, xlen.shamt_bits()),
        Dec::ShiftImmW => shift_imm(ctx, &regs, 5),
        Dec::Reg => three_registers(ctx, regs.gpr, regs.gpr),
        Dec::Fence => {
            ctx.push(unsigned_immediate(ctx.field(24, 4)?, 4));
            ctx.push(unsigned_immediate(ctx.field(20, 4)?, 4));
            Ok(())
        }
        Dec::NoOperands => Ok(()),
        Dec::Csr => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            ctx.push(Operand::SystemRegister(csr(ctx.field(20, 12)? as u32)));
            ctx.push_reg(regs.gpr, ctx.field(15, 5)?)?;
            Ok(())
        }
        Dec::CsrImm => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            ctx.push(Operand::SystemRegister(csr(ctx.field(20, 12)? as u32)));
            ctx.push(unsigned_immediate(ctx.field(15, 5)?, 5));
            Ok(())
        }
        Dec::FpArith => {
            let rm = ctx.field(12, 3)?;
            let mode = RoundingMode::from_bits(rm).ok_or(OperandError::Reserved {
                field: "rounding mode",
                value: rm,
            })?;
            three_registers(ctx, regs.fpr, regs.fpr)?;
            ctx.set_arch(ArchDetail::RiscV(RiscVDetail {
                rounding_mode: Some(mode),
            }));
            Ok(())
        }
        Dec::FpToInt => {
            ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
            ctx.push_reg(regs.fpr, ctx.field(15, 5)?)?;
            Ok(())
        }
        Dec::IntToFp => {
            ctx.push_reg(regs.fpr, ctx.field(7, 5)?)?;
            ctx.push_reg(regs.gpr, ctx.field(15, 5)?)?;
            Ok(())
        }
        _ => compressed(dec, ctx, &regs, xlen),
    }
}

fn load(ctx: &mut OperandContext<'_>, dest: &'static RegisterTable, regs: &Files) -> DecodeResult {
    let size = 1u8 << (ctx.field(12, 2)?);
    ctx.push_reg(dest, ctx.field(7, 5)?)?;
    let base = ctx.reg(regs.gpr, ctx.field(15, 5)?)?;
    let offset = ctx.signed_field(20, 12)?;
    ctx.push(Operand::Memory(MemoryRef::base_disp(base, offset, size)));
    Ok(())
}

fn store(ctx: &mut OperandContext<'_>, src: &'static RegisterTable, regs: &Files) -> DecodeResult {
    let size = 1u8 << (ctx.field(12, 2)?);
    ctx.push_reg(src, ctx.field(20, 5)?)?;
    let base = ctx.reg(regs.gpr, ctx.field(15, 5)?)?;
    let offset = sign_extend(gather_bits(ctx.word().value(), &S_IMM), 12);
    ctx.push(Operand::Memory(MemoryRef::base_disp(base, offset, size)));
    Ok(())
}

fn shift_imm(ctx: &mut OperandContext<'_>, regs: &Files, shamt_bits: u8) -> DecodeResult {
    ctx.push_reg(regs.gpr, ctx.field(7, 5)?)?;
    ctx.push_reg(regs.gpr, ctx.field(15, 5)?)?;
    ctx.push(unsigned_immediate(ctx.field(20, shamt_bits)?, shamt_bits));
    Ok(())
}

fn three_registers(
    ctx: &mut OperandContext<'_>,
    dest: &'static RegisterTable,
    src: &'static RegisterTable,
) -> DecodeResult {
    ctx.push_reg(dest, ctx.field(7, 5)?)?;
    ctx.push_reg(src, ctx.field(15, 5)?)?;
    ctx.push_reg(src, ctx.field(20, 5)?)?;
    Ok(())
}

fn reserved(field: &'static str, value: u64) -> OperandError {
    OperandError::Reserved { field, value }
}

fn compressed(dec: Dec, ctx: &mut OperandContext<'_>, regs: &Files, xlen: Xlen) -> DecodeResult {
    let word = ctx.word().value();
    // full-width rd/rs1 and rs2, then the 3-bit forms
    let rd = ctx.field(7, 5)?;
    let rs2 = ctx.field(2, 5)?;
    let rd_c = ctx.field(7, 3)?;
    let rs2_c = ctx.field(2, 3)?;
    let ci_imm = sign_extend(gather_bits(word, &CI_IMM), 6);

    match dec {
        Dec::CAddi4spn => {
            let imm = gather_bits(word, &ADDI4SPN_IMM);
            ctx.push_reg(regs.gpr_c, rs2_c)?;
            ctx.push_reg(regs.gpr, u64::from(SP))?;
            ctx.push(unsigned_immediate(imm, 10));
        }
        Dec::CLoadWord => compressed_memory(ctx, regs.gpr_c, regs, &CL_WORD, 4)?,
        Dec::CLoadDouble => compressed_memory(ctx, regs.gpr_c, regs, &CL_DOUBLE, 8)?,
        Dec::CStoreWord => compressed_memory(ctx, regs.gpr_c, regs, &CL_WORD, 4)?,
        Dec::CStoreDouble => compressed_memory(ctx, regs.gpr_c, regs, &CL_DOUBLE, 8)?,
        Dec::CFpLoadWord | Dec::CFpStoreWord => {
            compressed_memory(ctx, regs.fpr_c, regs, &CL_WORD, 4)?
        }
        Dec::CFpLoadDouble | Dec::CFpStoreDouble => {
            compressed_memory(ctx, regs.fpr_c, regs, &CL_DOUBLE, 8)?
        }
        Dec::CAddi => {
            if ci_imm == 0 {
                ctx.soft_fail();
            }
            ctx.push_reg(regs.gpr, rd)?;
            ctx.push(Operand::imm(i128::from(ci_imm), 6));
        }
        Dec::CAddiw => {
            if rd == 0 {
                return Err(reserved("rd", rd));
            }
            ctx.push_reg(regs.gpr, rd)?;
            ctx.push(Operand::imm(i128::from(ci_imm), 6));
        }
        Dec::CJump => {
            let raw = gather_bits(word, &CJ_IMM);
            ctx.push(pc_relative(raw, 12, 1, ctx.address(), 0));
        }
        Dec::CLi => {
            if rd == 0 {
                ctx.soft_fail();
            }
            ctx.push_reg(regs.gpr, rd)?;
            ctx.push(Operand::imm(i128::from(ci_imm), 6));
        }
        Dec::CAddi16sp => {
            let imm = sign_extend(gather_bits(word, &ADDI16SP_IMM), 10);
            if imm == 0 {
                return Err(reserved("nzimm", 0));
            }
            ctx.push_reg(regs.gpr, rd)?;
            ctx.push(Operand::imm(i128::from(imm), 10));
        }
        Dec::CLui => {
            if ci_imm == 0 {
                return Err(reserved("nzimm", 0));
            }
            if rd == 0 {
                ctx.soft_fail();
            }
            ctx.push_reg(regs.gpr, rd)?;
            // printed as the 20-bit upper immediate it stands for
            ctx.push(unsigned_immediate((ci_imm as u64) & 0xf_ffff, 20));
        }
        Dec::CShiftImm => {
            let shamt = gather_bits(word, &CI_IMM);
            check_shamt(shamt, xlen)?;
            // shamt 0 is a hint
            if shamt == 0 {
                ctx.soft_fail();
            }
            ctx.push_reg(regs.gpr_c, rd_c)?;
            ctx.push(unsigned_immediate(shamt, 6));
        }
        Dec::CAndi => {
            ctx.push_reg(regs.gpr_c, rd_c)?;
            ctx.push(Operand::imm(i128::from(ci_imm), 6));
        }
        Dec::CArith => {
            ctx.push_reg(regs.gpr_c, rd_c)?;
            ctx.push_reg(regs.gpr_c, rs2_c)?;
        }
        Dec::CBranch => {
            ctx.push_reg(regs.gpr_c, rd_c)?;
            let raw = gather_bits(word, &CB_IMM);
            ctx.push(pc_relative(raw, 9, 1, ctx.address(), 0));
        }
        Dec::CSlli => {
            let shamt = gather_bits(word, &CI_IMM);
            check_shamt(shamt, xlen)?;
            if rd == 0 || shamt == 0 {
                ctx.soft_fail();
            }
            ctx.push_reg(regs.gpr, rd)?;
            ctx.push(unsigned_immediate(shamt, 6));
        }
        Dec::CLoadWordSp => stack_load(ctx, regs.gpr, regs, &LWSP, 4, true)?,
        Dec::CLoadDoubleSp => stack_load(ctx, regs.gpr, regs, &LDSP, 8, true)?,
        Dec::CFpLoadWordSp => stack_load(ctx, regs.fpr, regs, &LWSP, 4, false)?,
        Dec::CFpLoadDoubleSp => stack_load(ctx, regs.fpr, regs, &LDSP, 8, false)?,
        Dec::CJr => {
            if rd == 0 {
                return Err(reserved("rs1", rd));
            }
            ctx.push_reg(regs.gpr, rd)?;
        }
        Dec::CMv | Dec::CAdd => {
            if rd == 0 {
                ctx.soft_fail();
            }
            ctx.push_reg(regs.gpr, rd)?;
            ctx.push_reg(regs.gpr, rs2)?;
        }
        Dec::CStoreWordSp => stack_store(ctx, regs.gpr, regs, &SWSP, 4)?,
        Dec::CStoreDoubleSp => stack_store(ctx, regs.gpr, regs, &SDSP, 8)?,
        Dec::CFpStoreWordSp => stack_store(ctx, regs.fpr, regs, &SWSP, 4)?,
        Dec::CFpStoreDoubleSp => stack_store(ctx, regs.fpr, regs, &SDSP, 8)?,
        _ => return Err(OperandError::UnknownDecoder(dec.id())),
    }
    Ok(())
}

/// Shift amounts above 31 only exist on RV64.
fn check_shamt(shamt: u64, xlen: Xlen) -> DecodeResult {
    if xlen == Xlen::Rv32 && shamt > 31 {
        return Err(reserved("shamt", shamt));
    }
    Ok(())
}

/// `rd'`/`rs2'` plus `offset(rs1')`.
fn compressed_memory(
    ctx: &mut OperandContext<'_>,
    data: &'static RegisterTable,
    regs: &Files,
    pieces: &[BitPiece],
    size: u8,
) -> DecodeResult {
    let offset = gather_bits(ctx.word().value(), pieces);
    ctx.push_reg(data, ctx.field(2, 3)?)?;
    let base = ctx.reg(regs.gpr_c, ctx.field(7, 3)?)?;
    ctx.push(Operand::Memory(MemoryRef::base_disp(base, offset as i64, size)));
    Ok(())
}

fn stack_load(
    ctx: &mut OperandContext<'_>,
    dest: &'static RegisterTable,
    regs: &Files,
    pieces: &[BitPiece],
    size: u8,
    integer: bool,
) -> DecodeResult {
    let rd = ctx.field(7, 5)?;
    if integer && rd == 0 {
        return Err(reserved("rd", rd));
    }
    let offset = gather_bits(ctx.word().value(), pieces);
    ctx.push_reg(dest, rd)?;
    let sp = ctx.reg(regs.gpr, u64::from(SP))?;
    ctx.push(Operand::Memory(MemoryRef::base_disp(sp, offset as i64, size)));
    Ok(())
}

fn stack_store(
    ctx: &mut OperandContext<'_>,
    src: &'static RegisterTable,
    regs: &Files,
    pieces: &[BitPiece],
    size: u8,
) -> DecodeResult {
    let offset = gather_bits(ctx.word().value(), pieces);
    ctx.push_reg(src, ctx.field(2, 5)?)?;
    let sp = ctx.reg(regs.gpr, u64::from(SP))?;
    ctx.push(Operand::Memory(MemoryRef::base_disp(sp, offset as i64, size)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_immediate() {
        // beq a0, a1, +16
        assert_eq!(gather_bits(0x00b50863, &B_IMM), 16);
        // bne with offset -4: imm[12]=1, imm[11]=1, imm[10:5]=0x3f, imm[4:1]=0xe
        let raw = gather_bits(0xfe051ee3, &B_IMM);
        assert_eq!(sign_extend(raw, 13), -4);
    }

    #[test]
    fn test_jump_immediate() {
        assert_eq!(gather_bits(0x008000ef, &J_IMM), 8);
        assert_eq!(sign_extend(gather_bits(0xffdff0ef, &J_IMM), 21), -4);
    }

    #[test]
    fn test_compressed_stack_offsets() {
        // c.lwsp a0, 12(sp)
        assert_eq!(gather_bits(0x4532, &LWSP), 12);
        // c.sdsp ra, 8(sp)
        assert_eq!(gather_bits(0xe406, &SDSP), 8);
        // c.addi16sp sp, -64
        assert_eq!(sign_extend(gather_bits(0x7139, &ADDI16SP_IMM), 10), -64);
    }
}
