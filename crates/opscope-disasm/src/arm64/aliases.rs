//! Preferred-alias rules, in the priority order of the architecture's
//! "preferred disassembly" conditions.

use opscope_core::register::arm64::{SP, X30, ZR};
use opscope_core::{Condition, Operand, Register};

use super::opcodes::Opcode::{self, *};
use crate::engine::AliasRule;

type Rewrite = fn(&[Operand]) -> Option<Vec<Operand>>;

const fn rule(opcode: Opcode, alias: Opcode, rewrite: Rewrite) -> AliasRule {
    AliasRule {
        opcode: opcode.id(),
        alias: alias.id(),
        rewrite,
    }
}

pub(crate) static ALIASES: &[AliasRule] = &[
    rule(AddImm, MovSp, mov_sp),
    rule(AddsImm, CmnImm, drop_zero_dest),
    rule(SubsImm, CmpImm, drop_zero_dest),
    rule(AndsImm, TstImm, drop_zero_dest),
    rule(OrrImm, MovBitmask, mov_bitmask),
    rule(Movz, MovWide, movz),
    rule(Movn, MovWideNot, movn),
    rule(Sbfm, Sxtb, sxtb),
    rule(Sbfm, Sxth, sxth),
    rule(Sbfm, Sxtw, sxtw),
    rule(Sbfm, AsrImm, shift_right),
    rule(Sbfm, Sbfiz, insert_zero),
    rule(Sbfm, Sbfx, extract_field),
    rule(Ubfm, Uxtb, uxtb),
    rule(Ubfm, Uxth, uxth),
    rule(Ubfm, LslImm, shift_left),
    rule(Ubfm, LsrImm, shift_right),
    rule(Ubfm, Ubfiz, insert_zero),
    rule(Ubfm, Ubfx, extract_field),
    rule(Bfm, Bfi, insert_zero),
    rule(Bfm, Bfxil, extract_field),
    rule(Extr, RorImm, rotate),
    rule(Ret, RetLr, ret_lr),
    rule(Hint, Nop, hint::<0>),
    rule(Hint, Yield, hint::<1>),
    rule(Hint, Wfe, hint::<2>),
    rule(Hint, Wfi, hint::<3>),
    rule(Hint, Sev, hint::<4>),
    rule(Hint, Sevl, hint::<5>),
    rule(OrrReg, MovReg, mov_register),
    rule(OrnReg, Mvn, drop_zero_source),
    rule(AndsReg, TstReg, drop_zero_dest),
    rule(AddsReg, CmnReg, drop_zero_dest),
    rule(SubsReg, CmpReg, drop_zero_dest),
    rule(SubReg, Neg, drop_zero_source),
    rule(SubsReg, Negs, drop_zero_source),
    rule(Csinc, Cset, cond_set),
    rule(Csinc, Cinc, cond_same),
    rule(Csinv, Csetm, cond_set),
    rule(Csinv, Cinv, cond_same),
    rule(Csneg, Cneg, cond_same),
    rule(Madd, Mul, no_accumulate),
    rule(Msub, Mneg, no_accumulate),
    rule(Lslv, LslReg, same),
    rule(Lsrv, LsrReg, same),
    rule(Asrv, AsrReg, same),
    rule(Rorv, RorReg, same),
];

fn is_zr(op: &Operand) -> bool {
    matches!(op, Operand::Register(r) if r.id == ZR)
}

fn is_sp(op: &Operand) -> bool {
    matches!(op, Operand::Register(r) if r.id == SP)
}

fn imm(value: u64) -> Operand {
    Operand::imm_unsigned(value, 6)
}

fn same(ops: &[Operand]) -> Option<Vec<Operand>> {
    Some(ops.to_vec())
}

/// `add rd, rn, #0` where either side is the stack pointer.
fn mov_sp(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, Operand::Immediate(imm)] if imm.value == 0 && (is_sp(rd) || is_sp(rn)) => {
            Some(vec![rd.clone(), rn.clone()])
        }
        _ => None,
    }
}

/// Flag-setting forms that discard the result become compares.
fn drop_zero_dest(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rest @ ..] if is_zr(rd) => Some(rest.to_vec()),
        _ => None,
    }
}

fn drop_zero_source(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, rest @ ..] if is_zr(rn) => {
            let mut out = vec![rd.clone()];
            out.extend_from_slice(rest);
            Some(out)
        }
        _ => None,
    }
}

/// `orr rd, zr, #imm` reads as `mov` only when no movz/movn builds the value.
fn mov_bitmask(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, imm @ Operand::Immediate(value)]
            if is_zr(rn) && !move_wide_preferred(value.as_u64(), u32::from(value.size)) =>
        {
            Some(vec![rd.clone(), imm.clone()])
        }
        _ => None,
    }
}

/// MoveWidePreferred, recovered from the expanded bitmask value.
fn move_wide_preferred(value: u64, width: u32) -> bool {
    let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    let value = value & mask;
    let ones = value.count_ones();
    if ones == 0 || ones >= width {
        return false;
    }
    // element smaller than the register
    let half = width / 2;
    let half_mask = (1u64 << half) - 1;
    if value >> half == value & half_mask {
        return false;
    }

    let rotl = |v: u64, r: u32| {
        if r == 0 {
            v
        } else {
            ((v << r) | (v >> (width - r))) & mask
        }
    };
    let run = (1u64 << ones) - 1;
    let Some(immr) = (0..width).find(|&r| rotl(value, r) == run) else {
        return false;
    };
    let imms = ones - 1;

    if imms < 16 {
        return (16 - immr % 16) % 16 <= 15 - imms;
    }
    if imms >= width - 15 {
        return immr % 16 <= imms - (width - 15);
    }
    false
}

fn mov_register(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, rm @ Operand::Register(_)] if is_zr(rn) => Some(vec![rd.clone(), rm.clone()]),
        _ => None,
    }
}

/// Destination, 16-bit immediate and shift of a wide move.
fn wide_parts(ops: &[Operand]) -> Option<(Operand, u64, u32)> {
    match ops {
        [rd, Operand::Immediate(imm)] => Some((rd.clone(), imm.as_u64(), 0)),
        [rd, Operand::Immediate(imm), Operand::Shift(shift)] => {
            Some((rd.clone(), imm.as_u64(), u32::from(shift.amount)))
        }
        _ => None,
    }
}

fn movz(ops: &[Operand]) -> Option<Vec<Operand>> {
    let (rd, imm16, shift) = wide_parts(ops)?;
    if imm16 == 0 && shift != 0 {
        return None;
    }
    Some(vec![rd, Operand::imm_unsigned(imm16 << shift, 64)])
}

fn movn(ops: &[Operand]) -> Option<Vec<Operand>> {
    let (rd, imm16, shift) = wide_parts(ops)?;
    let bits = rd.as_register()?.size;
    if imm16 == 0 && shift != 0 {
        return None;
    }
    if bits == 32 && imm16 == 0xffff {
        return None;
    }
    let inverted = !(imm16 << shift);
    let value = if bits == 32 {
        i128::from(inverted as u32 as i32)
    } else {
        i128::from(inverted as i64)
    };
    Some(vec![rd, Operand::imm(value, bits as u8)])
}

/// Operands of SBFM/UBFM/BFM.
struct Bitfield {
    rd: Operand,
    rn: Register,
    size: u64,
    immr: u64,
    imms: u64,
}

fn bitfield(ops: &[Operand]) -> Option<Bitfield> {
    match ops {
        [rd, Operand::Register(rn), Operand::Immediate(immr), Operand::Immediate(imms)] => {
            Some(Bitfield {
                rd: rd.clone(),
                rn: *rn,
                size: u64::from(rn.size),
                immr: immr.as_u64(),
                imms: imms.as_u64(),
            })
        }
        _ => None,
    }
}

/// Extension from the low `imms + 1` bits; the source is always a W
/// register.
fn extend(ops: &[Operand], imms: u64, w_only: bool) -> Option<Vec<Operand>> {
    let f = bitfield(ops)?;
    if f.immr != 0 || f.imms != imms || (w_only && f.size != 32) {
        return None;
    }
    Some(vec![f.rd, Operand::reg(Register { size: 32, ..f.rn })])
}

fn sxtb(ops: &[Operand]) -> Option<Vec<Operand>> {
    extend(ops, 7, false)
}

fn sxth(ops: &[Operand]) -> Option<Vec<Operand>> {
    extend(ops, 15, false)
}

fn sxtw(ops: &[Operand]) -> Option<Vec<Operand>> {
    bitfield(ops).filter(|f| f.size == 64)?;
    extend(ops, 31, false)
}

fn uxtb(ops: &[Operand]) -> Option<Vec<Operand>> {
    extend(ops, 7, true)
}

fn uxth(ops: &[Operand]) -> Option<Vec<Operand>> {
    extend(ops, 15, true)
}

fn shift_left(ops: &[Operand]) -> Option<Vec<Operand>> {
    let f = bitfield(ops)?;
    if f.imms == f.size - 1 || f.imms + 1 != f.immr {
        return None;
    }
    Some(vec![f.rd, Operand::reg(f.rn), imm(f.size - 1 - f.imms)])
}

fn shift_right(ops: &[Operand]) -> Option<Vec<Operand>> {
    let f = bitfield(ops)?;
    if f.imms != f.size - 1 {
        return None;
    }
    Some(vec![f.rd, Operand::reg(f.rn), imm(f.immr)])
}

fn insert_zero(ops: &[Operand]) -> Option<Vec<Operand>> {
    let f = bitfield(ops)?;
    if f.imms >= f.immr {
        return None;
    }
    Some(vec![
        f.rd,
        Operand::reg(f.rn),
        imm(f.size - f.immr),
        imm(f.imms + 1),
    ])
}

fn extract_field(ops: &[Operand]) -> Option<Vec<Operand>> {
    let f = bitfield(ops)?;
    if f.imms < f.immr {
        return None;
    }
    Some(vec![
        f.rd,
        Operand::reg(f.rn),
        imm(f.immr),
        imm(f.imms - f.immr + 1),
    ])
}

fn rotate(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, rm, lsb] if rn == rm => Some(vec![rd.clone(), rn.clone(), lsb.clone()]),
        _ => None,
    }
}

fn ret_lr(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [Operand::Register(r)] if r.id == X30 => Some(Vec::new()),
        _ => None,
    }
}

fn hint<const N: i128>(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [Operand::Immediate(imm)] if imm.value == N => Some(Vec::new()),
        _ => None,
    }
}

fn invertible(cond: Condition) -> bool {
    !matches!(cond, Condition::Always | Condition::Never)
}

/// `csinc rd, zr, zr, cc` is `cset rd, !cc`.
fn cond_set(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, rm, Operand::Condition(cond)] if is_zr(rn) && is_zr(rm) && invertible(*cond) => {
            Some(vec![rd.clone(), Operand::Condition(cond.inverse())])
        }
        _ => None,
    }
}

/// `csinc rd, rn, rn, cc` is `cinc rd, rn, !cc`.
fn cond_same(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, rm, Operand::Condition(cond)] if rn == rm && !is_zr(rn) && invertible(*cond) => {
            Some(vec![rd.clone(), rn.clone(), Operand::Condition(cond.inverse())])
        }
        _ => None,
    }
}

fn no_accumulate(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rn, rm, ra] if is_zr(ra) => Some(vec![rd.clone(), rn.clone(), rm.clone()]),
        _ => None,
    }
}
