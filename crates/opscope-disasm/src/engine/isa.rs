//! The per-architecture hooks the engine is parameterized by.

use opscope_core::{ArchDetail, Architecture, Detail, Endianness};

use super::bitstream::WidthRule;
use super::canonical::{AliasRule, Canonical};
use super::detail::OpcodeInfo;
use super::operands::OperandContext;
use super::table::DecodeTable;
use crate::error::OperandError;
use crate::options::{DisassemblerOptions, Features};

/// Text of an instruction apart from its mnemonic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendering {
    /// Printed before the mnemonic (predicates).
    pub prefix: Option<String>,
    /// Operand text.
    pub op_str: String,
}

/// An instruction set: decode tables plus the callbacks they name.
pub trait Isa: Send + Sync {
    fn architecture(&self) -> Architecture;

    fn endianness(&self) -> Endianness {
        self.architecture().endianness()
    }

    /// How many bytes each instruction occupies.
    fn width_rule(&self) -> WidthRule;

    /// Decode table for instructions of `size` bytes, if any.
    fn table(&self, size: usize) -> Option<&'static DecodeTable>;

    /// Evaluates predicate `index` against the enabled features.
    fn check_predicate(&self, index: u16, features: Features) -> bool;

    /// Runs operand decoder `decoder`, appending operands to `ctx`.
    fn decode_operands(
        &self,
        decoder: u16,
        ctx: &mut OperandContext<'_>,
    ) -> Result<(), OperandError>;

    fn opcode_info(&self, opcode: u16) -> Option<&'static OpcodeInfo>;

    /// Alias rules in priority order.
    fn aliases(&self) -> &'static [AliasRule];

    fn render(
        &self,
        canonical: &Canonical,
        arch: &ArchDetail,
        options: &DisassemblerOptions,
    ) -> Rendering;

    /// Bytes skipped over data in skip-data mode.
    fn skip_data_size(&self, features: Features) -> usize;

    /// Adjusts a freshly emitted detail record.
    fn finish_detail(&self, _detail: &mut Detail) {}
}
