//! The decode table interpreter.

use opscope_core::{ArchDetail, Operand};
use tracing::trace;

use super::bitstream::InstructionWord;
use super::isa::Isa;
use super::operands::OperandContext;
use super::table::{DecodeTable, DecoderOp};
use crate::options::Features;
use crate::traits::DecodeStatus;
use crate::DecodeError;

/// Interpreter output before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInstruction {
    pub opcode: u16,
    pub operands: Vec<Operand>,
    pub status: DecodeStatus,
    pub arch: ArchDetail,
}

/// Walks `table` for `word`. The trace only moves forward, so it ends
/// within `table.len()` steps.
pub fn run<I: Isa + ?Sized>(
    isa: &I,
    table: &DecodeTable,
    word: &InstructionWord,
    features: Features,
) -> Result<RawInstruction, DecodeError> {
    let malformed = |index: usize| DecodeError::MalformedTable {
        table: table.name(),
        index,
    };

    let mut cursor = 0usize;
    let mut field = 0u64;
    let mut soft_fail = false;

    loop {
        let op = table.get(cursor).ok_or_else(|| malformed(cursor))?;
        cursor = match *op {
            DecoderOp::ExtractField { start, len } => {
                field = word.field(start, len).ok_or_else(|| malformed(cursor))?;
                cursor + 1
            }
            DecoderOp::FilterValue { value, skip } => advance(cursor, field == value, skip),
            DecoderOp::CheckField {
                start,
                len,
                value,
                skip,
            } => {
                let bits = word.field(start, len).ok_or_else(|| malformed(cursor))?;
                advance(cursor, bits == value, skip)
            }
            DecoderOp::CheckPredicate { index, skip } => {
                advance(cursor, isa.check_predicate(index, features), skip)
            }
            DecoderOp::SoftFail {
                should_be_zero,
                should_be_one,
            } => {
                let value = word.value();
                if value & should_be_zero != 0 || value & should_be_one != should_be_one {
                    soft_fail = true;
                }
                cursor + 1
            }
            DecoderOp::Decode { opcode, decoder } => {
                let mut ctx = OperandContext::new(word);
                isa.decode_operands(decoder, &mut ctx).map_err(|source| {
                    trace!(
                        table = table.name(),
                        address = word.address(),
                        opcode,
                        error = %source,
                        "operand decoder rejected encoding"
                    );
                    DecodeError::InvalidOperand {
                        address: word.address(),
                        source,
                    }
                })?;
                let (operands, arch, operand_soft_fail) = ctx.into_parts();
                let status = if soft_fail || operand_soft_fail {
                    DecodeStatus::SoftFail
                } else {
                    DecodeStatus::Success
                };
                return Ok(RawInstruction {
                    opcode,
                    operands,
                    status,
                    arch,
                });
            }
            DecoderOp::Fail => {
                return Err(DecodeError::unknown_opcode(word.address(), word.bytes()));
            }
        };
    }
}

fn advance(cursor: usize, matched: bool, skip: u16) -> usize {
    if matched {
        cursor + 1
    } else {
        cursor + 1 + usize::from(skip)
    }
}
