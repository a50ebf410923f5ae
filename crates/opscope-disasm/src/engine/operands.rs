//! Operand decoding helpers shared by the backends.

use opscope_core::{ArchDetail, ListStyle, Operand, Register, RegisterList};

use super::bitstream::InstructionWord;
use super::registers::RegisterTable;
use crate::error::OperandError;

/// State handed to a backend operand decoder.
pub struct OperandContext<'w> {
    word: &'w InstructionWord,
    operands: Vec<Operand>,
    arch: ArchDetail,
    soft_fail: bool,
}

impl<'w> OperandContext<'w> {
    pub fn new(word: &'w InstructionWord) -> Self {
        Self {
            word,
            operands: Vec::with_capacity(4),
            arch: ArchDetail::None,
            soft_fail: false,
        }
    }

    pub fn word(&self) -> &InstructionWord {
        self.word
    }

    /// Address of the instruction being decoded.
    pub fn address(&self) -> u64 {
        self.word.address()
    }

    /// Extracts a field, failing if it lies outside the word.
    pub fn field(&self, start: u8, len: u8) -> Result<u64, OperandError> {
        self.word
            .field(start, len)
            .ok_or(OperandError::FieldOutOfRange { start, len })
    }

    pub fn bit(&self, pos: u8) -> Result<bool, OperandError> {
        self.field(pos, 1).map(|b| b == 1)
    }

    /// Extracts a field and sign-extends it from its top bit.
    pub fn signed_field(&self, start: u8, len: u8) -> Result<i64, OperandError> {
        self.field(start, len).map(|v| sign_extend(v, len))
    }

    /// Resolves a register without pushing it.
    pub fn reg(&self, table: &RegisterTable, raw: u64) -> Result<Register, OperandError> {
        resolve(table, raw)
    }

    /// Resolves a register and appends it as an operand.
    pub fn push_reg(&mut self, table: &RegisterTable, raw: u64) -> Result<Register, OperandError> {
        let reg = resolve(table, raw)?;
        self.operands.push(Operand::reg(reg));
        Ok(reg)
    }

    pub fn push(&mut self, operand: Operand) {
        self.operands.push(operand);
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Flags the instruction as soft-fail.
    pub fn soft_fail(&mut self) {
        self.soft_fail = true;
    }

    pub fn is_soft_fail(&self) -> bool {
        self.soft_fail
    }

    pub fn set_arch(&mut self, arch: ArchDetail) {
        self.arch = arch;
    }

    pub fn arch_mut(&mut self) -> &mut ArchDetail {
        &mut self.arch
    }

    /// Operands, architecture detail and soft-fail flag.
    pub fn into_parts(self) -> (Vec<Operand>, ArchDetail, bool) {
        (self.operands, self.arch, self.soft_fail)
    }
}

fn resolve(table: &RegisterTable, raw: u64) -> Result<Register, OperandError> {
    table.resolve(raw).ok_or(OperandError::InvalidRegister {
        class: table.name(),
        raw,
    })
}

/// Sign-extends the low `bits` bits of `value`.
pub fn sign_extend(value: u64, bits: u8) -> i64 {
    match bits {
        0 => 0,
        b if b >= 64 => value as i64,
        _ => {
            let shift = 64 - u32::from(bits);
            ((value << shift) as i64) >> shift
        }
    }
}

pub fn unsigned_immediate(value: u64, bits: u8) -> Operand {
    Operand::imm_unsigned(value, bits)
}

pub fn signed_immediate(value: u64, bits: u8) -> Operand {
    Operand::imm(i128::from(sign_extend(value, bits)), bits)
}

/// One slice of a scattered immediate: `len` bits at `from` in the word
/// land at `to` in the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPiece {
    pub from: u8,
    pub len: u8,
    pub to: u8,
}

impl BitPiece {
    pub const fn new(from: u8, len: u8, to: u8) -> Self {
        Self { from, len, to }
    }
}

/// Reassembles an immediate scattered over several bit ranges.
pub fn gather_bits(word: u64, pieces: &[BitPiece]) -> u64 {
    pieces.iter().fold(0u64, |acc, piece| {
        let mask = if piece.len >= 64 {
            u64::MAX
        } else {
            (1u64 << piece.len) - 1
        };
        acc | (((word >> piece.from) & mask) << piece.to)
    })
}

/// PC-relative displacement: sign-extend `raw` from `bits`, multiply by
/// `scale` and add to `address` with the `align_mask` bits cleared.
pub fn pc_relative(raw: u64, bits: u8, scale: i64, address: u64, align_mask: u64) -> Operand {
    let offset = sign_extend(raw, bits).wrapping_mul(scale);
    let target = (address & !align_mask).wrapping_add_signed(offset);
    Operand::pc_rel(offset, target)
}

/// Looks up an addressing mode; `None` entries are reserved encodings.
pub fn select_mode<T: Copy>(
    modes: &[Option<T>],
    mode: u64,
    field: &'static str,
) -> Result<T, OperandError> {
    usize::try_from(mode)
        .ok()
        .and_then(|m| modes.get(m))
        .copied()
        .flatten()
        .ok_or(OperandError::Reserved { field, value: mode })
}

/// `count` consecutive registers from `first`, wrapping at the end of the
/// file.
pub fn register_list(
    table: &RegisterTable,
    first: u64,
    count: usize,
) -> Result<RegisterList, OperandError> {
    let len = table.len() as u64;
    if len == 0 {
        return Err(OperandError::InvalidRegister {
            class: table.name(),
            raw: first,
        });
    }
    let registers = (0..count as u64)
        .map(|i| resolve(table, (first + i) % len))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RegisterList::new(registers))
}

/// Even/odd register pair, written high register first.
pub fn register_pair(table: &RegisterTable, raw: u64) -> Result<RegisterList, OperandError> {
    if raw % 2 != 0 {
        return Err(OperandError::OddRegisterPair { raw });
    }
    let low = resolve(table, raw)?;
    let high = resolve(table, raw + 1)?;
    Ok(RegisterList {
        registers: vec![high, low],
        arrangement: None,
        style: ListStyle::Pair,
    })
}

/// Expands an 8-bit floating point immediate (`abcdefgh`) to
/// `(-1)^a * 2^e * (16 + efgh) / 16`.
pub fn expand_fp_imm8(imm8: u8) -> f64 {
    let sign = if imm8 & 0x80 != 0 { -1.0 } else { 1.0 };
    let b = (imm8 >> 6) & 1;
    let cd = i32::from((imm8 >> 4) & 3);
    let exponent = if b == 0 { cd + 1 } else { cd - 3 };
    let mantissa = f64::from(16 + (imm8 & 0xf)) / 16.0;
    sign * mantissa * 2f64.powi(exponent)
}
