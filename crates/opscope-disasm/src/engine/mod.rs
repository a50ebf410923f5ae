//! Architecture-independent decoding engine.
//!
//! A decode runs in fixed stages: the bitstream reader assembles one word,
//! the interpreter walks the backend's decode table (calling back into the
//! backend's operand decoders), the canonicalizer applies alias rules, and
//! the detail emitter assembles the detail record when asked for.

pub mod bitstream;
pub mod builder;
pub mod canonical;
pub mod detail;
pub mod interpreter;
pub mod isa;
pub mod operands;
pub mod registers;
pub mod table;

pub use bitstream::{read_word, InstructionWord, WidthRule};
pub use builder::{Cases, TableBuilder};
pub use canonical::{canonicalize, AliasRule, Canonical};
pub use detail::{emit, OpcodeInfo};
pub use interpreter::RawInstruction;
pub use isa::{Isa, Rendering};
pub use operands::OperandContext;
pub use registers::{BankedRegisters, RegisterTable};
pub use table::{DecodeTable, DecoderOp};

use opscope_core::{
    ArchDetail, Architecture, Condition, ControlFlow, Instruction, Operand, Operation,
};
use tracing::trace;

use crate::traits::{DecodeStatus, DecodedInstruction, Disassembler};
use crate::{DecodeError, DisassemblerOptions};

/// A disassembler for one instruction set.
#[derive(Debug, Clone)]
pub struct Engine<I> {
    isa: I,
    options: DisassemblerOptions,
}

impl<I: Isa> Engine<I> {
    pub fn from_isa(isa: I, options: DisassemblerOptions) -> Self {
        Self { isa, options }
    }

    pub fn isa(&self) -> &I {
        &self.isa
    }

    fn decode_word(
        &self,
        bytes: &[u8],
        address: u64,
        want_detail: bool,
    ) -> Result<DecodedInstruction, DecodeError> {
        let word = read_word(bytes, address, self.isa.endianness(), self.isa.width_rule())?;

        let table = self.isa.table(word.size()).ok_or_else(|| {
            trace!(address, size = word.size(), "no decode table for length");
            DecodeError::invalid_encoding(
                address,
                format!("no decode table for {}-byte instructions", word.size()),
            )
        })?;

        let raw = interpreter::run(&self.isa, table, &word, self.options.features)?;
        let canonical = canonicalize(self.isa.aliases(), raw.opcode, raw.operands);
        let info = self.isa.opcode_info(canonical.opcode).ok_or_else(|| {
            DecodeError::invalid_encoding(
                address,
                format!("opcode {} has no description", canonical.opcode),
            )
        })?;

        if raw.status == DecodeStatus::SoftFail {
            trace!(address, mnemonic = info.mnemonic, "soft-fail encoding");
        }

        let rendering = self.isa.render(&canonical, &raw.arch, &self.options);
        let control_flow = classify(
            info,
            &canonical.operands,
            &raw.arch,
            address,
            word.size(),
        );

        let mut instruction =
            Instruction::new(address, word.size(), word.bytes().to_vec(), info.mnemonic)
                .with_opcode(canonical.opcode)
                .with_operation(info.operation)
                .with_prefix(rendering.prefix)
                .with_op_str(rendering.op_str)
                .with_control_flow(control_flow);

        if want_detail {
            let mut detail = emit(info, &canonical.operands, raw.arch);
            self.isa.finish_detail(&mut detail);
            instruction = instruction.with_detail(detail);
        }

        Ok(DecodedInstruction {
            instruction: instruction.with_operands(canonical.operands),
            size: word.size(),
            status: raw.status,
        })
    }
}

/// Derives control flow from the operation, the branch target operand and
/// the execution condition.
fn classify(
    info: &OpcodeInfo,
    operands: &[Operand],
    arch: &ArchDetail,
    address: u64,
    size: usize,
) -> ControlFlow {
    let next = address.wrapping_add(size as u64);
    let target = operands.iter().find_map(|op| match op {
        Operand::PcRelative { target, .. } => Some(*target),
        _ => None,
    });
    let condition = info
        .condition
        .or_else(|| arch.condition())
        .filter(|c| *c != Condition::Always);

    match (info.operation, target, condition) {
        (Operation::Jump | Operation::ConditionalJump, Some(target), Some(condition)) => {
            ControlFlow::ConditionalBranch {
                target,
                condition,
                fallthrough: next,
            }
        }
        (Operation::Jump | Operation::ConditionalJump, Some(target), None) => {
            ControlFlow::UnconditionalBranch { target }
        }
        (Operation::Jump | Operation::ConditionalJump, None, _) => ControlFlow::IndirectBranch {
            possible_targets: Vec::new(),
        },
        (Operation::Call, Some(target), _) => ControlFlow::Call {
            target,
            return_addr: next,
        },
        (Operation::Call, None, _) => ControlFlow::IndirectCall { return_addr: next },
        (Operation::Return, _, _) => ControlFlow::Return,
        (Operation::Syscall, _, _) => ControlFlow::Syscall,
        (Operation::Halt, _, _) => ControlFlow::Halt,
        _ => ControlFlow::Sequential,
    }
}

impl<I: Isa> Disassembler for Engine<I> {
    fn decode(
        &self,
        bytes: &[u8],
        address: u64,
        want_detail: bool,
    ) -> Result<DecodedInstruction, DecodeError> {
        self.decode_word(bytes, address, want_detail)
    }

    fn options(&self) -> &DisassemblerOptions {
        &self.options
    }

    fn min_instruction_size(&self) -> usize {
        self.isa.width_rule().min_size()
    }

    fn max_instruction_size(&self) -> usize {
        self.isa.width_rule().max_size()
    }

    fn is_fixed_width(&self) -> bool {
        self.isa.width_rule().is_fixed()
    }

    fn architecture(&self) -> Architecture {
        self.isa.architecture()
    }

    fn skip_data_size(&self) -> usize {
        self.isa.skip_data_size(self.options.features)
    }

    fn instruction_name(&self, opcode: u16) -> Option<&'static str> {
        self.isa.opcode_info(opcode).map(|info| info.mnemonic)
    }
}
