//! AArch64 operand decoders, one per encoding class.

use opscope_core::{
    ArchDetail, Arm64Detail, Condition, Extend, IndexMode, MemoryRef, Operand, Register, Shift,
    ShiftKind, VectorArrangement,
};

use super::registers::{fpr, gpr_sp, gpr_zr, V, W, X, XSP};
use super::sysreg::system_register;
use crate::engine::operands::{expand_fp_imm8, pc_relative, register_list, unsigned_immediate};
use crate::engine::{OperandContext, RegisterTable};
use crate::error::OperandError;

id_enum! {
    /// Operand decoders named by the decode table.
    pub enum Dec {
        PcRelAddr,
        AddSubImm,
        LogicalImm,
        MoveWide,
        Bitfield,
        Extract,
        Branch26,
        CondBranch,
        CompareBranch,
        TestBranch,
        BranchReg,
        NoOperands,
        Exception,
        Hint,
        Mrs,
        Msr,
        LoadLiteral,
        Pair,
        UnsignedOffset,
        Indexed,
        RegisterOffset,
        LoadExclusive,
        StoreExclusive,
        Structure,
        StructurePost,
        LogicalReg,
        AddSubReg,
        CondSelect,
        DataProc2,
        DataProc3,
        FpImm,
        FpArith,
    }
}

type DecodeResult = Result<(), OperandError>;

pub(crate) fn decode(dec: Dec, ctx: &mut OperandContext<'_>) -> DecodeResult {
    ctx.set_arch(ArchDetail::Arm64(Arm64Detail::default()));
    match dec {
        Dec::PcRelAddr => pc_rel_addr(ctx),
        Dec::AddSubImm => add_sub_imm(ctx),
        Dec::LogicalImm => logical_imm(ctx),
        Dec::MoveWide => move_wide(ctx),
        Dec::Bitfield => bitfield(ctx),
        Dec::Extract => extract(ctx),
        Dec::Branch26 => {
            let imm26 = ctx.field(0, 26)?;
            ctx.push(pc_relative(imm26, 26, 4, ctx.address(), 0));
            Ok(())
        }
        Dec::CondBranch => cond_branch(ctx),
        Dec::CompareBranch => compare_branch(ctx),
        Dec::TestBranch => test_branch(ctx),
        Dec::BranchReg => {
            let rn = ctx.field(5, 5)?;
            ctx.push_reg(&X, rn)?;
            Ok(())
        }
        Dec::NoOperands => Ok(()),
        Dec::Exception => {
            let imm16 = ctx.field(5, 16)?;
            ctx.push(unsigned_immediate(imm16, 16));
            Ok(())
        }
        Dec::Hint => {
            let imm = ctx.field(5, 7)?;
            ctx.push(unsigned_immediate(imm, 7));
            Ok(())
        }
        Dec::Mrs => system_move(ctx, true),
        Dec::Msr => system_move(ctx, false),
        Dec::LoadLiteral => load_literal(ctx),
        Dec::Pair => pair(ctx),
        Dec::UnsignedOffset => unsigned_offset(ctx),
        Dec::Indexed => indexed(ctx),
        Dec::RegisterOffset => register_offset(ctx),
        Dec::LoadExclusive => exclusive(ctx, false),
        Dec::StoreExclusive => exclusive(ctx, true),
        Dec::Structure => structure(ctx, false),
        Dec::StructurePost => structure(ctx, true),
        Dec::LogicalReg => shifted_register(ctx, false),
        Dec::AddSubReg => shifted_register(ctx, true),
        Dec::CondSelect => cond_select(ctx),
        Dec::DataProc2 => data_proc(ctx, false),
        Dec::DataProc3 => data_proc(ctx, true),
        Dec::FpImm => fp_imm(ctx),
        Dec::FpArith => fp_arith(ctx),
    }
}

/// Decodes a 4-bit condition field.
pub(crate) fn condition(cond: u64) -> Condition {
    match cond & 0xf {
        0b0000 => Condition::Equal,
        0b0001 => Condition::NotEqual,
        0b0010 => Condition::AboveOrEqual,
        0b0011 => Condition::Below,
        0b0100 => Condition::Sign,
        0b0101 => Condition::NotSign,
        0b0110 => Condition::Overflow,
        0b0111 => Condition::NotOverflow,
        0b1000 => Condition::Above,
        0b1001 => Condition::BelowOrEqual,
        0b1010 => Condition::GreaterOrEqual,
        0b1011 => Condition::Less,
        0b1100 => Condition::Greater,
        0b1101 => Condition::LessOrEqual,
        0b1110 => Condition::Always,
        _ => Condition::Never,
    }
}

/// Expands a logical immediate (`N:immr:imms`) to its `reg_size`-bit
/// value. Returns `None` for the reserved patterns: an element size below
/// two bits, or an element of all ones.
pub(crate) fn decode_bit_masks(n: u64, imms: u64, immr: u64, reg_size: u32) -> Option<u64> {
    let combined = ((n & 1) << 6) | (!imms & 0x3f);
    if combined == 0 {
        return None;
    }
    let len = 63 - combined.leading_zeros();
    if len < 1 {
        return None;
    }
    let esize = 1u32 << len;
    if esize > reg_size {
        return None;
    }
    let levels = u64::from(esize - 1);
    let s = imms & levels;
    let r = immr & levels;
    if s == levels {
        return None;
    }

    let ones = (1u64 << (s + 1)) - 1;
    let element = if esize == 64 {
        ones.rotate_right(r as u32)
    } else {
        let emask = (1u64 << esize) - 1;
        if r == 0 {
            ones
        } else {
            ((ones >> r) | (ones << (u64::from(esize) - r))) & emask
        }
    };

    let mut result = 0u64;
    let mut pos = 0;
    while pos < reg_size {
        result |= element << pos;
        pos += esize;
    }
    Some(result)
}

fn with_detail(ctx: &mut OperandContext<'_>, update: impl FnOnce(&mut Arm64Detail)) {
    if let ArchDetail::Arm64(detail) = ctx.arch_mut() {
        update(detail);
    }
}

fn reserved(field: &'static str, value: u64) -> OperandError {
    OperandError::Reserved { field, value }
}

fn pc_rel_addr(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let page = ctx.bit(31)?;
    let rd = ctx.field(0, 5)?;
    let raw = (ctx.field(5, 19)? << 2) | ctx.field(29, 2)?;
    ctx.push_reg(&X, rd)?;
    let target = if page {
        pc_relative(raw, 21, 4096, ctx.address(), 0xfff)
    } else {
        pc_relative(raw, 21, 1, ctx.address(), 0)
    };
    ctx.push(target);
    Ok(())
}

fn add_sub_imm(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let set_flags = ctx.bit(29)?;
    let shifted = ctx.bit(22)?;
    let imm12 = ctx.field(10, 12)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    let dst = if set_flags { gpr_zr(sf) } else { gpr_sp(sf) };
    ctx.push_reg(dst, rd)?;
    ctx.push_reg(gpr_sp(sf), rn)?;
    ctx.push(unsigned_immediate(imm12, 12));
    if shifted {
        ctx.push(Operand::Shift(Shift::new(ShiftKind::Lsl, 12)));
    }
    Ok(())
}

fn logical_imm(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let opc = ctx.field(29, 2)?;
    let n = ctx.field(22, 1)?;
    let immr = ctx.field(16, 6)?;
    let imms = ctx.field(10, 6)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    if !sf && n == 1 {
        return Err(reserved("N", n));
    }
    let size: u8 = if sf { 64 } else { 32 };
    let value =
        decode_bit_masks(n, imms, immr, u32::from(size)).ok_or_else(|| reserved("imms", imms))?;

    // ANDS writes flags and cannot target the stack pointer.
    let dst = if opc == 0b11 { gpr_zr(sf) } else { gpr_sp(sf) };
    ctx.push_reg(dst, rd)?;
    ctx.push_reg(gpr_zr(sf), rn)?;
    ctx.push(Operand::imm_unsigned(value, size));
    Ok(())
}

fn move_wide(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let hw = ctx.field(21, 2)?;
    let imm16 = ctx.field(5, 16)?;
    let rd = ctx.field(0, 5)?;

    if !sf && hw >= 2 {
        return Err(reserved("hw", hw));
    }
    ctx.push_reg(gpr_zr(sf), rd)?;
    ctx.push(unsigned_immediate(imm16, 16));
    if hw != 0 {
        ctx.push(Operand::Shift(Shift::new(ShiftKind::Lsl, (hw * 16) as u8)));
    }
    Ok(())
}

fn bitfield(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let n = ctx.bit(22)?;
    let immr = ctx.field(16, 6)?;
    let imms = ctx.field(10, 6)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    if n != sf {
        return Err(reserved("N", u64::from(n)));
    }
    if !sf && (immr >= 32 || imms >= 32) {
        return Err(reserved("imms", immr.max(imms)));
    }
    ctx.push_reg(gpr_zr(sf), rd)?;
    ctx.push_reg(gpr_zr(sf), rn)?;
    ctx.push(unsigned_immediate(immr, 6));
    ctx.push(unsigned_immediate(imms, 6));
    Ok(())
}

fn extract(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let n = ctx.bit(22)?;
    let rm = ctx.field(16, 5)?;
    let imms = ctx.field(10, 6)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    if n != sf {
        return Err(reserved("N", u64::from(n)));
    }
    if !sf && imms >= 32 {
        return Err(reserved("imms", imms));
    }
    ctx.push_reg(gpr_zr(sf), rd)?;
    ctx.push_reg(gpr_zr(sf), rn)?;
    ctx.push_reg(gpr_zr(sf), rm)?;
    ctx.push(unsigned_immediate(imms, 6));
    Ok(())
}

fn cond_branch(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let imm19 = ctx.field(5, 19)?;
    let cond = condition(ctx.field(0, 4)?);
    ctx.push(pc_relative(imm19, 19, 4, ctx.address(), 0));
    with_detail(ctx, |d| d.cc = Some(cond));
    Ok(())
}

fn compare_branch(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let imm19 = ctx.field(5, 19)?;
    let rt = ctx.field(0, 5)?;
    ctx.push_reg(gpr_zr(sf), rt)?;
    ctx.push(pc_relative(imm19, 19, 4, ctx.address(), 0));
    Ok(())
}

fn test_branch(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let b5 = ctx.field(31, 1)?;
    let b40 = ctx.field(19, 5)?;
    let imm14 = ctx.field(5, 14)?;
    let rt = ctx.field(0, 5)?;
    ctx.push_reg(gpr_zr(b5 == 1), rt)?;
    ctx.push(unsigned_immediate((b5 << 5) | b40, 6));
    ctx.push(pc_relative(imm14, 14, 4, ctx.address(), 0));
    Ok(())
}

fn system_move(ctx: &mut OperandContext<'_>, read: bool) -> DecodeResult {
    let encoding = ctx.field(5, 16)? as u32;
    let rt = ctx.field(0, 5)?;
    let sysreg = Operand::SystemRegister(system_register(encoding));
    if read {
        ctx.push_reg(&X, rt)?;
        ctx.push(sysreg);
    } else {
        ctx.push(sysreg);
        ctx.push_reg(&X, rt)?;
    }
    Ok(())
}

/// Transfer register file and access size of the GPR load/store forms.
fn transfer_register(size: u64, opc: u64) -> (&'static RegisterTable, u8) {
    let table = match (size, opc) {
        (0b11, _) | (0b10, 0b10) => &X,
        _ => &W,
    };
    (table, 1u8 << size)
}

fn load_literal(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let opc = ctx.field(30, 2)?;
    let imm19 = ctx.field(5, 19)?;
    let rt = ctx.field(0, 5)?;
    ctx.push_reg(gpr_zr(opc != 0b00), rt)?;
    ctx.push(pc_relative(imm19, 19, 4, ctx.address(), 0));
    Ok(())
}

fn unsigned_offset(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let size = ctx.field(30, 2)?;
    let opc = ctx.field(22, 2)?;
    let imm12 = ctx.field(10, 12)?;
    let rn = ctx.field(5, 5)?;
    let rt = ctx.field(0, 5)?;

    let (table, bytes) = transfer_register(size, opc);
    let base = ctx.reg(&XSP, rn)?;
    ctx.push_reg(table, rt)?;
    let mem = MemoryRef::base_disp(base, (imm12 << size) as i64, bytes);
    ctx.push(Operand::Memory(mem));
    Ok(())
}

fn indexed(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let size = ctx.field(30, 2)?;
    let opc = ctx.field(22, 2)?;
    let imm9 = ctx.signed_field(12, 9)?;
    let mode = if ctx.field(10, 2)? == 0b11 {
        IndexMode::Pre
    } else {
        IndexMode::Post
    };
    let rn = ctx.field(5, 5)?;
    let rt = ctx.field(0, 5)?;

    // Writeback into the transfer register is constrained unpredictable.
    if rn != 31 && rn == rt {
        ctx.soft_fail();
    }
    let (table, bytes) = transfer_register(size, opc);
    let base = ctx.reg(&XSP, rn)?;
    ctx.push_reg(table, rt)?;
    ctx.push(Operand::Memory(
        MemoryRef::base_disp(base, imm9, bytes).with_mode(mode),
    ));
    with_detail(ctx, |d| d.writeback = true);
    Ok(())
}

fn register_offset(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let size = ctx.field(30, 2)?;
    let opc = ctx.field(22, 2)?;
    let rm = ctx.field(16, 5)?;
    let option = ctx.field(13, 3)?;
    let scaled = ctx.bit(12)?;
    let rn = ctx.field(5, 5)?;
    let rt = ctx.field(0, 5)?;

    let (extend, index_table): (Extend, &RegisterTable) = match option {
        0b010 => (Extend::Uxtw, &W),
        0b011 => (Extend::Lsl, &X),
        0b110 => (Extend::Sxtw, &W),
        0b111 => (Extend::Sxtx, &X),
        _ => return Err(reserved("option", option)),
    };
    let (table, bytes) = transfer_register(size, opc);
    let scale = if scaled { bytes } else { 1 };
    let base = ctx.reg(&XSP, rn)?;
    let index = ctx.reg(index_table, rm)?;
    ctx.push_reg(table, rt)?;
    ctx.push(Operand::Memory(
        MemoryRef::base_index(base, index, scale, bytes).with_extend(extend),
    ));
    Ok(())
}

fn pair(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let opc = ctx.field(30, 2)?;
    let (table, bytes): (&RegisterTable, u8) = match opc {
        0b00 => (&W, 4),
        0b10 => (&X, 8),
        _ => return Err(reserved("opc", opc)),
    };
    let mode = match ctx.field(23, 2)? {
        0b01 => IndexMode::Post,
        0b11 => IndexMode::Pre,
        _ => IndexMode::None,
    };
    let load = ctx.bit(22)?;
    let offset = ctx.signed_field(15, 7)? * i64::from(bytes);
    let rt2 = ctx.field(10, 5)?;
    let rn = ctx.field(5, 5)?;
    let rt = ctx.field(0, 5)?;

    if load && rt == rt2 {
        ctx.soft_fail();
    }
    if mode != IndexMode::None && rn != 31 && (rn == rt || rn == rt2) {
        ctx.soft_fail();
    }

    let base = ctx.reg(&XSP, rn)?;
    ctx.push_reg(table, rt)?;
    ctx.push_reg(table, rt2)?;
    ctx.push(Operand::Memory(
        MemoryRef::base_disp(base, offset, bytes * 2).with_mode(mode),
    ));
    if mode != IndexMode::None {
        with_detail(ctx, |d| d.writeback = true);
    }
    Ok(())
}

fn exclusive(ctx: &mut OperandContext<'_>, status: bool) -> DecodeResult {
    let is_64bit = ctx.bit(30)?;
    let rs = ctx.field(16, 5)?;
    let rn = ctx.field(5, 5)?;
    let rt = ctx.field(0, 5)?;

    if status {
        ctx.push_reg(&W, rs)?;
    }
    let base = ctx.reg(&XSP, rn)?;
    ctx.push_reg(gpr_zr(is_64bit), rt)?;
    let bytes = if is_64bit { 8 } else { 4 };
    ctx.push(Operand::Memory(MemoryRef::base(base, bytes)));
    Ok(())
}

fn structure(ctx: &mut OperandContext<'_>, post: bool) -> DecodeResult {
    let q = ctx.bit(30)?;
    let rm = ctx.field(16, 5)?;
    let opcode = ctx.field(12, 4)?;
    let size = ctx.field(10, 2)?;
    let rn = ctx.field(5, 5)?;
    let rt = ctx.field(0, 5)?;

    let count: u8 = match opcode {
        0b0111 => 1,
        0b1010 => 2,
        0b0110 => 3,
        0b0010 => 4,
        _ => return Err(reserved("opcode", opcode)),
    };
    let arrangement = match (size, q) {
        (0b00, false) => VectorArrangement::B8,
        (0b00, true) => VectorArrangement::B16,
        (0b01, false) => VectorArrangement::H4,
        (0b01, true) => VectorArrangement::H8,
        (0b10, false) => VectorArrangement::S2,
        (0b10, true) => VectorArrangement::S4,
        (_, false) => VectorArrangement::D1,
        (_, true) => VectorArrangement::D2,
    };
    let total = count * if q { 16 } else { 8 };
    let list = register_list(&V, rt, usize::from(count))?.with_arrangement(arrangement);
    let base = ctx.reg(&XSP, rn)?;

    let mem = if !post {
        MemoryRef::base(base, total)
    } else if rm == 31 {
        MemoryRef::base_disp(base, i64::from(total), total).with_mode(IndexMode::Post)
    } else {
        let index = ctx.reg(&X, rm)?;
        MemoryRef::base_index(base, index, 1, total).with_mode(IndexMode::Post)
    };
    ctx.push(Operand::RegisterList(list));
    ctx.push(Operand::Memory(mem));
    if post {
        with_detail(ctx, |d| d.writeback = true);
    }
    Ok(())
}

/// Register operand with an optional shift; `lsl #0` is left off.
fn shifted_operand(reg: Register, kind: u64, amount: u64) -> Operand {
    if kind == 0 && amount == 0 {
        Operand::reg(reg)
    } else {
        Operand::ShiftedRegister {
            reg,
            shift: Shift::new(ShiftKind::from_bits(kind), amount as u8),
        }
    }
}

fn shifted_register(ctx: &mut OperandContext<'_>, arithmetic: bool) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let shift = ctx.field(22, 2)?;
    let rm = ctx.field(16, 5)?;
    let imm6 = ctx.field(10, 6)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    if arithmetic && shift == 0b11 {
        return Err(reserved("shift", shift));
    }
    if !sf && imm6 >= 32 {
        return Err(reserved("imm6", imm6));
    }
    let table = gpr_zr(sf);
    ctx.push_reg(table, rd)?;
    ctx.push_reg(table, rn)?;
    let rm = ctx.reg(table, rm)?;
    ctx.push(shifted_operand(rm, shift, imm6));
    Ok(())
}

fn cond_select(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let rm = ctx.field(16, 5)?;
    let cond = condition(ctx.field(12, 4)?);
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    let table = gpr_zr(sf);
    ctx.push_reg(table, rd)?;
    ctx.push_reg(table, rn)?;
    ctx.push_reg(table, rm)?;
    ctx.push(Operand::Condition(cond));
    with_detail(ctx, |d| d.cc = Some(cond));
    Ok(())
}

fn data_proc(ctx: &mut OperandContext<'_>, accumulate: bool) -> DecodeResult {
    let sf = ctx.bit(31)?;
    let rm = ctx.field(16, 5)?;
    let ra = ctx.field(10, 5)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;

    let table = gpr_zr(sf);
    ctx.push_reg(table, rd)?;
    ctx.push_reg(table, rn)?;
    ctx.push_reg(table, rm)?;
    if accumulate {
        ctx.push_reg(table, ra)?;
    }
    Ok(())
}

fn fp_imm(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let table = fpr(ctx.field(22, 2)?)?;
    let imm8 = ctx.field(13, 8)? as u8;
    let rd = ctx.field(0, 5)?;
    ctx.push_reg(table, rd)?;
    ctx.push(Operand::FpImmediate(expand_fp_imm8(imm8)));
    Ok(())
}

fn fp_arith(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let table = fpr(ctx.field(22, 2)?)?;
    let rm = ctx.field(16, 5)?;
    let rn = ctx.field(5, 5)?;
    let rd = ctx.field(0, 5)?;
    ctx.push_reg(table, rd)?;
    ctx.push_reg(table, rn)?;
    ctx.push_reg(table, rm)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bit_masks() {
        assert_eq!(decode_bit_masks(1, 0b000111, 0, 64), Some(0xff));
        assert_eq!(decode_bit_masks(0, 0b000111, 0, 32), Some(0xff));
        // 2-bit elements, one bit set, replicated
        assert_eq!(decode_bit_masks(0, 0b111100, 0, 32), Some(0x5555_5555));
        // rotate a 16-bit element right by one
        assert_eq!(decode_bit_masks(0, 0b100000, 1, 32), Some(0x8000_8000));
        // all ones and the one-bit element size are reserved
        assert_eq!(decode_bit_masks(1, 0b111111, 0, 64), None);
        assert_eq!(decode_bit_masks(0, 0b111101, 0, 32), None);
        assert_eq!(decode_bit_masks(0, 0b111110, 0, 32), None);
    }

    #[test]
    fn test_condition() {
        assert_eq!(condition(0b0000), Condition::Equal);
        assert_eq!(condition(0b1011), Condition::Less);
        assert_eq!(condition(0b1110), Condition::Always);
        assert_eq!(condition(0b1111), Condition::Never);
    }
}
