//! RISC-V instruction decoder.
//!
//! Supports RV64 and RV32 with these extensions:
//! - I: base integer set
//! - M: multiply/divide
//! - F, D: single and double precision loads, stores, arithmetic and moves
//! - Zicsr: control and status register access
//! - C: 16-bit compressed instructions
//!
//! Instruction length comes from the low bits of the first halfword: 16 and
//! 32-bit encodings decode, 48 and 64-bit encodings are recognized but have
//! no table.

mod aliases;
mod csr;
mod decoders;
pub mod opcodes;
mod printer;
mod registers;
mod tables;

use opscope_core::{ArchDetail, Architecture, Detail, Register};

use crate::engine::{
    AliasRule, Canonical, DecodeTable, Engine, Isa, OpcodeInfo, OperandContext, Rendering,
    WidthRule,
};
use crate::error::OperandError;
use crate::options::{DisassemblerOptions, Features};

pub use opcodes::Opcode;

use decoders::Dec;
use opcodes::OPCODE_INFO;
use tables::Pred;

/// Integer register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Xlen {
    Rv32,
    Rv64,
}

impl Xlen {
    pub fn bits(self) -> u16 {
        match self {
            Self::Rv32 => 32,
            Self::Rv64 => 64,
        }
    }

    /// Width of the shift amount field of `slli`/`srli`/`srai`.
    pub(crate) fn shamt_bits(self) -> u8 {
        match self {
            Self::Rv32 => 5,
            Self::Rv64 => 6,
        }
    }
}

/// The RISC-V instruction set at a given XLEN.
#[derive(Debug, Clone, Copy)]
pub struct RiscV {
    xlen: Xlen,
}

impl RiscV {
    pub fn new(xlen: Xlen) -> Self {
        Self { xlen }
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }
}

/// RISC-V disassembler.
pub type RiscVDisassembler = Engine<RiscV>;

impl Engine<RiscV> {
    /// Creates an RV64 disassembler with default options.
    pub fn new() -> Self {
        Self::with_options(DisassemblerOptions::default())
    }

    /// Creates an RV32 disassembler with default options.
    pub fn new_rv32() -> Self {
        Self::with_xlen(Xlen::Rv32, DisassemblerOptions::default())
    }

    pub fn with_options(options: DisassemblerOptions) -> Self {
        Self::with_xlen(Xlen::Rv64, options)
    }

    pub fn with_xlen(xlen: Xlen, options: DisassemblerOptions) -> Self {
        Engine::from_isa(RiscV::new(xlen), options)
    }
}

impl Default for Engine<RiscV> {
    fn default() -> Self {
        Self::new()
    }
}

/// Instruction length encoded in the first halfword.
fn instruction_length(prefix: &[u8]) -> Option<usize> {
    let low = *prefix.first()?;
    if low & 0b11 != 0b11 {
        Some(2)
    } else if low & 0b1_1100 != 0b1_1100 {
        Some(4)
    } else if low & 0x3f == 0x1f {
        Some(6)
    } else if low & 0x7f == 0x3f {
        Some(8)
    } else {
        None
    }
}

impl Isa for RiscV {
    fn architecture(&self) -> Architecture {
        match self.xlen {
            Xlen::Rv32 => Architecture::RiscV32,
            Xlen::Rv64 => Architecture::RiscV64,
        }
    }

    fn width_rule(&self) -> WidthRule {
        WidthRule::Prefix {
            min: 2,
            max: 8,
            select: instruction_length,
        }
    }

    fn table(&self, size: usize) -> Option<&'static DecodeTable> {
        match size {
            2 => Some(tables::table16()),
            4 => Some(tables::table32()),
            _ => None,
        }
    }

    fn check_predicate(&self, index: u16, features: Features) -> bool {
        match Pred::from_id(index) {
            Some(Pred::M) => features.contains(Features::RISCV_M),
            Some(Pred::F) => features.contains(Features::RISCV_F),
            Some(Pred::D) => features.contains(Features::RISCV_D),
            Some(Pred::C) => features.contains(Features::RISCV_C),
            Some(Pred::Zicsr) => features.contains(Features::RISCV_ZICSR),
            Some(Pred::Rv64) => self.xlen == Xlen::Rv64,
            None => false,
        }
    }

    fn decode_operands(
        &self,
        decoder: u16,
        ctx: &mut OperandContext<'_>,
    ) -> Result<(), OperandError> {
        let dec = Dec::from_id(decoder).ok_or(OperandError::UnknownDecoder(decoder))?;
        decoders::decode(dec, ctx, self.xlen)
    }

    fn opcode_info(&self, opcode: u16) -> Option<&'static OpcodeInfo> {
        OPCODE_INFO.get(usize::from(opcode))
    }

    fn aliases(&self) -> &'static [AliasRule] {
        aliases::ALIASES
    }

    fn render(
        &self,
        canonical: &Canonical,
        arch: &ArchDetail,
        options: &DisassemblerOptions,
    ) -> Rendering {
        printer::render(canonical, arch, options)
    }

    fn skip_data_size(&self, features: Features) -> usize {
        if features.contains(Features::RISCV_C) {
            2
        } else {
            4
        }
    }

    fn finish_detail(&self, detail: &mut Detail) {
        let arch = self.architecture();
        let size = self.xlen.bits();
        let narrow = |reg: &mut Register| {
            reg.arch = arch;
            reg.size = size;
        };
        detail.regs_read.iter_mut().for_each(narrow);
        detail.regs_write.iter_mut().for_each(narrow);
    }
}
