//! TMS320C64x operand decoders.
//!
//! Every decoder first records the execution predicate, functional unit
//! and parallel bit, then appends operands in assembly order.

use opscope_core::{
    ArchDetail, FunctionalUnit, IndexMode, MemoryRef, Operand, Register, TmsCondition,
    Tms320C64xDetail,
};

use super::registers::{CONTROL_FILE, FILES};
use crate::engine::operands::{
    pc_relative, register_pair, select_mode, signed_immediate, unsigned_immediate,
};
use crate::engine::OperandContext;
use crate::error::OperandError;

id_enum! {
    /// Operand decoders named by the decode table.
    pub enum Dec {
        Nop,
        Idle,
        LRegs,
        LConst,
        LLongDst,
        LLongSrc,
        LUnary,
        SRegs,
        SConst,
        SShift,
        SShiftConst,
        Mvk,
        Mvkh,
        Addk,
        BranchDisp,
        BranchReg,
        BranchReturn,
        MvcTo,
        MvcFrom,
        MRegs,
        MConst,
        DRegs,
        DConst,
        Load1,
        Load2,
        Load4,
        Load8,
        Store1,
        Store2,
        Store4,
        Store8,
        LoadWide,
        StoreWide,
        LongLoad1,
        LongLoad2,
        LongLoad4,
        LongStore1,
        LongStore2,
        LongStore4,
    }
}

type DecodeResult = Result<(), OperandError>;

pub(crate) fn decode(dec: Dec, ctx: &mut OperandContext<'_>) -> DecodeResult {
    use FunctionalUnit::{D, L, M, S};
    match dec {
        Dec::Nop => nop(ctx),
        Dec::Idle => begin(ctx, FunctionalUnit::None, 0, false, None),
        Dec::LRegs => arith(ctx, L, Src1::Reg),
        Dec::LConst => arith(ctx, L, Src1::Signed5),
        Dec::LLongDst => long_result(ctx, false),
        Dec::LLongSrc => long_result(ctx, true),
        Dec::LUnary => unary(ctx),
        Dec::SRegs => arith(ctx, S, Src1::Reg),
        Dec::SConst => arith(ctx, S, Src1::Signed5),
        Dec::SShift => shift(ctx, Src1::Reg),
        Dec::SShiftConst => shift(ctx, Src1::Unsigned5),
        Dec::Mvk | Dec::Addk => {
            let value = signed_immediate(ctx.field(7, 16)?, 16);
            constant(ctx, value)
        }
        Dec::Mvkh => {
            let value = unsigned_immediate(ctx.field(7, 16)? << 16, 32);
            constant(ctx, value)
        }
        Dec::BranchDisp => {
            let side = ctx.field(1, 1)?;
            begin(ctx, S, side, false, None)?;
            // relative to the fetch packet
            let target = pc_relative(ctx.field(7, 21)?, 21, 4, ctx.address(), 0x1f);
            ctx.push(target);
            Ok(())
        }
        Dec::BranchReg => {
            let side = ctx.field(1, 1)?;
            let cross = ctx.bit(12)?;
            begin(ctx, S, side, cross, None)?;
            let target = register(side, cross, ctx.field(18, 5)?)?;
            ctx.push(Operand::reg(target));
            Ok(())
        }
        Dec::BranchReturn => {
            let side = ctx.field(1, 1)?;
            begin(ctx, S, side, false, None)?;
            let pointer = ctx.field(18, 5)?;
            ctx.push_reg(&CONTROL_FILE, pointer)?;
            Ok(())
        }
        Dec::MvcTo => {
            let side = ctx.field(1, 1)?;
            let cross = ctx.bit(12)?;
            begin(ctx, S, side, cross, None)?;
            let src = register(side, cross, ctx.field(18, 5)?)?;
            ctx.push(Operand::reg(src));
            let control = ctx.field(23, 5)?;
            ctx.push_reg(&CONTROL_FILE, control)?;
            Ok(())
        }
        Dec::MvcFrom => {
            let side = ctx.field(1, 1)?;
            begin(ctx, S, side, false, None)?;
            let control = ctx.field(18, 5)?;
            ctx.push_reg(&CONTROL_FILE, control)?;
            let dst = register(side, false, ctx.field(23, 5)?)?;
            ctx.push(Operand::reg(dst));
            Ok(())
        }
        Dec::MRegs => arith(ctx, M, Src1::Reg),
        Dec::MConst => arith(ctx, M, Src1::Signed5),
        Dec::DRegs => data_arith(ctx, D, Src1::Reg),
        Dec::DConst => data_arith(ctx, D, Src1::Unsigned5),
        Dec::Load1 => load_store(ctx, Direction::Load, 1),
        Dec::Load2 => load_store(ctx, Direction::Load, 2),
        Dec::Load4 => load_store(ctx, Direction::Load, 4),
        Dec::Load8 => load_store(ctx, Direction::Load, 8),
        Dec::Store1 => load_store(ctx, Direction::Store, 1),
        Dec::Store2 => load_store(ctx, Direction::Store, 2),
        Dec::Store4 => load_store(ctx, Direction::Store, 4),
        Dec::Store8 => load_store(ctx, Direction::Store, 8),
        Dec::LoadWide => load_store_wide(ctx, Direction::Load),
        Dec::StoreWide => load_store_wide(ctx, Direction::Store),
        Dec::LongLoad1 => load_store_long(ctx, Direction::Load, 1),
        Dec::LongLoad2 => load_store_long(ctx, Direction::Load, 2),
        Dec::LongLoad4 => load_store_long(ctx, Direction::Load, 4),
        Dec::LongStore1 => load_store_long(ctx, Direction::Store, 1),
        Dec::LongStore2 => load_store_long(ctx, Direction::Store, 2),
        Dec::LongStore4 => load_store_long(ctx, Direction::Store, 4),
    }
}

/// Predicate register from `creg`/`z`; `None` for unconditional.
fn condition(ctx: &OperandContext<'_>) -> Result<Option<TmsCondition>, OperandError> {
    let creg = ctx.field(29, 3)?;
    let zero = ctx.bit(28)?;
    let (side, raw) = match (creg, zero) {
        (0b000, false) => return Ok(None),
        (0b001, _) => (1, 0),
        (0b010, _) => (1, 1),
        (0b011, _) => (1, 2),
        (0b100, _) => (0, 1),
        (0b101, _) => (0, 2),
        (0b110, _) => (0, 0),
        _ => {
            return Err(OperandError::Reserved {
                field: "creg",
                value: ctx.field(28, 4)?,
            })
        }
    };
    let register = register(side, false, raw)?;
    Ok(Some(TmsCondition { register, zero }))
}

fn begin(
    ctx: &mut OperandContext<'_>,
    unit: FunctionalUnit,
    side: u64,
    cross: bool,
    data_path: Option<u8>,
) -> DecodeResult {
    let condition = condition(ctx)?;
    let parallel = ctx.bit(0)?;
    let side = match unit {
        FunctionalUnit::None => 0,
        _ => (side & 1) as u8 + 1,
    };
    ctx.set_arch(ArchDetail::Tms320C64x(Tms320C64xDetail {
        condition,
        unit,
        side,
        data_path,
        cross_path: cross,
        parallel,
    }));
    Ok(())
}

/// Register `raw` of file `side`, or of the other file across the cross
/// path.
fn register(side: u64, cross: bool, raw: u64) -> Result<Register, OperandError> {
    FILES
        .resolve_crossed(side, cross, raw)
        .ok_or(OperandError::InvalidRegister { class: "a/b", raw })
}

/// Even/odd pair in file `side`, written high register first.
fn pair(side: u64, raw: u64) -> Result<Operand, OperandError> {
    let file = FILES
        .bank(side)
        .ok_or(OperandError::InvalidRegister { class: "a/b", raw })?;
    register_pair(file, raw).map(Operand::RegisterList)
}

#[derive(Debug, Clone, Copy)]
enum Src1 {
    Reg,
    Signed5,
    Unsigned5,
}

impl Src1 {
    fn operand(self, side: u64, raw: u64) -> Result<Operand, OperandError> {
        match self {
            Self::Reg => register(side, false, raw).map(Operand::reg),
            Self::Signed5 => Ok(signed_immediate(raw, 5)),
            Self::Unsigned5 => Ok(unsigned_immediate(raw, 5)),
        }
    }
}

/// Common `dst`/`src2`/`src1` fields and the unit side.
#[derive(Debug, Clone, Copy)]
struct Fields {
    dst: u64,
    src2: u64,
    src1: u64,
    side: u64,
}

impl Fields {
    fn read(ctx: &OperandContext<'_>) -> Result<Self, OperandError> {
        Ok(Self {
            dst: ctx.field(23, 5)?,
            src2: ctx.field(18, 5)?,
            src1: ctx.field(13, 5)?,
            side: ctx.field(1, 1)?,
        })
    }
}

/// `src1, xsrc2, dst` on .L, .S or .M.
fn arith(ctx: &mut OperandContext<'_>, unit: FunctionalUnit, src1: Src1) -> DecodeResult {
    let f = Fields::read(ctx)?;
    let cross = ctx.bit(12)?;
    begin(ctx, unit, f.side, cross, None)?;
    ctx.push(src1.operand(f.side, f.src1)?);
    ctx.push(Operand::reg(register(f.side, cross, f.src2)?));
    ctx.push(Operand::reg(register(f.side, false, f.dst)?));
    Ok(())
}

/// `.L` forms with a register pair destination, optionally a pair `src2`.
fn long_result(ctx: &mut OperandContext<'_>, long_src2: bool) -> DecodeResult {
    let f = Fields::read(ctx)?;
    let cross = ctx.bit(12)?;
    if long_src2 && cross {
        return Err(OperandError::Unsupported("register pair across the cross path"));
    }
    begin(ctx, FunctionalUnit::L, f.side, cross, None)?;
    ctx.push(Operand::reg(register(f.side, false, f.src1)?));
    if long_src2 {
        ctx.push(pair(f.side, f.src2)?);
    } else {
        ctx.push(Operand::reg(register(f.side, cross, f.src2)?));
    }
    ctx.push(pair(f.side, f.dst)?);
    Ok(())
}

/// `xsrc2, dst`
fn unary(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let f = Fields::read(ctx)?;
    let cross = ctx.bit(12)?;
    begin(ctx, FunctionalUnit::L, f.side, cross, None)?;
    ctx.push(Operand::reg(register(f.side, cross, f.src2)?));
    ctx.push(Operand::reg(register(f.side, false, f.dst)?));
    Ok(())
}

/// Shifts put the shifted value first: `xsrc2, src1, dst`.
fn shift(ctx: &mut OperandContext<'_>, amount: Src1) -> DecodeResult {
    let f = Fields::read(ctx)?;
    let cross = ctx.bit(12)?;
    begin(ctx, FunctionalUnit::S, f.side, cross, None)?;
    ctx.push(Operand::reg(register(f.side, cross, f.src2)?));
    ctx.push(amount.operand(f.side, f.src1)?);
    ctx.push(Operand::reg(register(f.side, false, f.dst)?));
    Ok(())
}

/// `.D` arithmetic: `src2, src1, dst`, no cross path.
fn data_arith(ctx: &mut OperandContext<'_>, unit: FunctionalUnit, src1: Src1) -> DecodeResult {
    let f = Fields::read(ctx)?;
    begin(ctx, unit, f.side, false, None)?;
    ctx.push(Operand::reg(register(f.side, false, f.src2)?));
    ctx.push(src1.operand(f.side, f.src1)?);
    ctx.push(Operand::reg(register(f.side, false, f.dst)?));
    Ok(())
}

/// MVK, MVKH and ADDK: `cst16, dst`.
fn constant(ctx: &mut OperandContext<'_>, value: Operand) -> DecodeResult {
    let side = ctx.field(1, 1)?;
    begin(ctx, FunctionalUnit::S, side, false, None)?;
    ctx.push(value);
    let dst = register(side, false, ctx.field(23, 5)?)?;
    ctx.push(Operand::reg(dst));
    Ok(())
}

fn nop(ctx: &mut OperandContext<'_>) -> DecodeResult {
    let count = ctx.field(13, 4)?;
    if count > 8 {
        return Err(OperandError::Reserved {
            field: "nop count",
            value: count,
        });
    }
    begin(ctx, FunctionalUnit::None, 0, false, None)?;
    ctx.push(unsigned_immediate(count + 1, 4));
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Load,
    Store,
}

/// One row of the addressing mode table.
#[derive(Debug, Clone, Copy)]
struct Mode {
    subtract: bool,
    update: IndexMode,
    register_offset: bool,
}

const fn mode(subtract: bool, update: IndexMode, register_offset: bool) -> Option<Mode> {
    Some(Mode {
        subtract,
        update,
        register_offset,
    })
}

const MODES: [Option<Mode>; 16] = [
    mode(true, IndexMode::None, false),
    mode(false, IndexMode::None, false),
    None,
    None,
    mode(true, IndexMode::None, true),
    mode(false, IndexMode::None, true),
    None,
    None,
    mode(true, IndexMode::Pre, false),
    mode(false, IndexMode::Pre, false),
    mode(true, IndexMode::Post, false),
    mode(false, IndexMode::Post, false),
    mode(true, IndexMode::Pre, true),
    mode(false, IndexMode::Pre, true),
    mode(true, IndexMode::Post, true),
    mode(false, IndexMode::Post, true),
];

/// `baseR` plus a scaled `ucst5` or `offsetR`, selected by the mode field.
fn memory(
    ctx: &OperandContext<'_>,
    side: u64,
    size: u8,
    scale: u8,
) -> Result<Operand, OperandError> {
    let mode = select_mode(&MODES, ctx.field(9, 4)?, "addressing mode")?;
    let base = register(side, false, ctx.field(18, 5)?)?;
    let offset = ctx.field(13, 5)?;
    let mem = if mode.register_offset {
        MemoryRef::base_index(base, register(side, false, offset)?, scale, size)
    } else {
        let bytes = offset as i64 * i64::from(scale);
        MemoryRef {
            scale,
            ..MemoryRef::base_disp(base, if mode.subtract { -bytes } else { bytes }, size)
        }
    };
    Ok(Operand::Memory(
        mem.with_mode(mode.update).with_subtract(mode.subtract),
    ))
}

fn push_access(ctx: &mut OperandContext<'_>, access: Direction, mem: Operand, data: Operand) {
    match access {
        Direction::Load => {
            ctx.push(mem);
            ctx.push(data);
        }
        Direction::Store => {
            ctx.push(data);
            ctx.push(mem);
        }
    }
}

/// `y` picks the unit and the base file, `s` the data file.
fn load_store(ctx: &mut OperandContext<'_>, access: Direction, size: u8) -> DecodeResult {
    let unit_side = ctx.field(7, 1)?;
    let data_side = ctx.field(1, 1)?;
    begin(ctx, FunctionalUnit::D, unit_side, false, Some(data_side as u8 + 1))?;
    let mem = memory(ctx, unit_side, size, size)?;
    let raw = ctx.field(23, 5)?;
    let data = if size == 8 {
        pair(data_side, raw)?
    } else {
        Operand::reg(register(data_side, false, raw)?)
    };
    push_access(ctx, access, mem, data);
    Ok(())
}

/// LDNDW/STNDW: 4-bit pair field, offset scaled by 8 only when `sc` is set.
fn load_store_wide(ctx: &mut OperandContext<'_>, access: Direction) -> DecodeResult {
    let unit_side = ctx.field(7, 1)?;
    let data_side = ctx.field(1, 1)?;
    begin(ctx, FunctionalUnit::D, unit_side, false, Some(data_side as u8 + 1))?;
    let scale = if ctx.bit(23)? { 8 } else { 1 };
    let mem = memory(ctx, unit_side, 8, scale)?;
    let data = pair(data_side, ctx.field(24, 4)? << 1)?;
    push_access(ctx, access, mem, data);
    Ok(())
}

/// 15-bit unsigned offset from B14 or B15, always on .D2.
fn load_store_long(ctx: &mut OperandContext<'_>, access: Direction, size: u8) -> DecodeResult {
    let data_side = ctx.field(1, 1)?;
    begin(ctx, FunctionalUnit::D, 1, false, Some(data_side as u8 + 1))?;
    // b14 or b15
    let base = register(1, false, 14 + ctx.field(7, 1)?)?;
    let offset = ctx.field(8, 15)? as i64 * i64::from(size);
    let mem = MemoryRef {
        scale: size,
        ..MemoryRef::base_disp(base, offset, size)
    };
    let data = Operand::reg(register(data_side, false, ctx.field(23, 5)?)?);
    push_access(ctx, access, Operand::Memory(mem), data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes() {
        let reserved = [2u64, 3, 6, 7];
        for raw in 0..16u64 {
            assert_eq!(
                select_mode(&MODES, raw, "mode").is_err(),
                reserved.contains(&raw),
                "mode {raw}"
            );
        }
        let post = MODES[11].unwrap();
        assert_eq!(post.update, IndexMode::Post);
        assert!(!post.subtract && !post.register_offset);
    }

    #[test]
    fn test_predicate_registers() {
        assert_eq!(register(1, false, 0).map(|r| r.name()), Ok("b0"));
        assert_eq!(register(0, true, 2).map(|r| r.name()), Ok("b2"));
        assert!(pair(0, 5).is_err());
    }
}
