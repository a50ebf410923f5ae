//! Architecture-agnostic instruction representation.

use crate::{Detail, Operand};

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Virtual address of this instruction.
    pub address: u64,
    /// Size in bytes.
    pub size: usize,
    /// Raw bytes of the instruction.
    pub bytes: Vec<u8>,
    /// Backend opcode id after canonicalization; `None` for data.
    pub opcode: Option<u16>,
    /// High-level operation category.
    pub operation: Operation,
    /// Mnemonic string (e.g., "mov", "add", "bl").
    pub mnemonic: String,
    /// Text printed before the mnemonic (predicates such as `[!b0]`).
    pub prefix: Option<String>,
    /// Rendered operand text.
    pub op_str: String,
    /// Operands (destination first, then sources).
    pub operands: Vec<Operand>,
    /// Control flow information.
    pub control_flow: ControlFlow,
    /// Detail record, present only when requested.
    pub detail: Option<Detail>,
}

impl Instruction {
    /// Creates a new instruction with minimal fields.
    pub fn new(address: u64, size: usize, bytes: Vec<u8>, mnemonic: impl Into<String>) -> Self {
        Self {
            address,
            size,
            bytes,
            opcode: None,
            operation: Operation::Other(0),
            mnemonic: mnemonic.into(),
            prefix: None,
            op_str: String::new(),
            operands: Vec::new(),
            control_flow: ControlFlow::Sequential,
            detail: None,
        }
    }

    /// Creates a data pseudo-instruction covering `bytes` (skip-data mode).
    pub fn data(address: u64, bytes: &[u8], mnemonic: &str) -> Self {
        let op_str = bytes
            .iter()
            .map(|b| format!("{:#04x}", b))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(address, bytes.len(), bytes.to_vec(), mnemonic).with_op_str(op_str)
    }

    /// Sets the opcode id.
    pub fn with_opcode(mut self, opcode: u16) -> Self {
        self.opcode = Some(opcode);
        self
    }

    /// Sets the operation.
    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operation = op;
        self
    }

    /// Adds an operand.
    pub fn with_operand(mut self, op: Operand) -> Self {
        self.operands.push(op);
        self
    }

    /// Sets operands.
    pub fn with_operands(mut self, ops: Vec<Operand>) -> Self {
        self.operands = ops;
        self
    }

    /// Sets the rendered operand text.
    pub fn with_op_str(mut self, op_str: impl Into<String>) -> Self {
        self.op_str = op_str.into();
        self
    }

    /// Sets the mnemonic prefix.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Sets the control flow.
    pub fn with_control_flow(mut self, cf: ControlFlow) -> Self {
        self.control_flow = cf;
        self
    }

    /// Attaches a detail record.
    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Returns the end address (address + size).
    pub fn end_address(&self) -> u64 {
        self.address.wrapping_add(self.size as u64)
    }

    /// Returns true if this is a skip-data pseudo-instruction.
    pub fn is_data(&self) -> bool {
        self.opcode.is_none()
    }

    /// Returns true if this instruction is a branch (jump/call).
    pub fn is_branch(&self) -> bool {
        !matches!(self.control_flow, ControlFlow::Sequential)
    }

    /// Returns true if this instruction is a call.
    pub fn is_call(&self) -> bool {
        matches!(
            self.control_flow,
            ControlFlow::Call { .. } | ControlFlow::IndirectCall { .. }
        )
    }

    /// Returns true if this instruction is a return.
    pub fn is_return(&self) -> bool {
        matches!(self.control_flow, ControlFlow::Return)
    }

    /// Returns true if this instruction terminates a basic block.
    pub fn is_terminator(&self) -> bool {
        !matches!(self.control_flow, ControlFlow::Sequential)
    }

    /// Assembly text without address or bytes: `[prefix] mnemonic op_str`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
            out.push(' ');
        }
        out.push_str(&self.mnemonic);
        if !self.op_str.is_empty() {
            out.push(' ');
            out.push_str(&self.op_str);
        }
        out
    }
}

/// High-level operation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    // Data movement
    Move,
    Load,
    Store,
    LoadEffectiveAddress,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Neg,

    // Logical
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    Sar,
    Ror,
    BitField,

    // Comparison
    Compare,
    Test,
    Select,

    // Control flow
    Jump,
    ConditionalJump,
    Call,
    Return,

    // System
    Syscall,
    Interrupt,
    SystemAccess,
    Fence,
    Nop,
    Halt,

    // Other
    Other(u16),
}

impl Operation {
    /// Returns the name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Load => "load",
            Self::Store => "store",
            Self::LoadEffectiveAddress => "lea",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Neg => "neg",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Sar => "sar",
            Self::Ror => "ror",
            Self::BitField => "bitfield",
            Self::Compare => "compare",
            Self::Test => "test",
            Self::Select => "select",
            Self::Jump => "jump",
            Self::ConditionalJump => "cond_jump",
            Self::Call => "call",
            Self::Return => "return",
            Self::Syscall => "syscall",
            Self::Interrupt => "interrupt",
            Self::SystemAccess => "system",
            Self::Fence => "fence",
            Self::Nop => "nop",
            Self::Halt => "halt",
            Self::Other(_) => "other",
        }
    }
}

/// Branch/select condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    // Unsigned comparisons
    Equal,
    NotEqual,
    Above,        // C=1 and Z=0
    AboveOrEqual, // C=1
    Below,        // C=0
    BelowOrEqual, // C=0 or Z=1

    // Signed comparisons
    Greater,        // Z=0 and N=V
    GreaterOrEqual, // N=V
    Less,           // N!=V
    LessOrEqual,    // Z=1 or N!=V

    // Flag-based
    Sign,        // N=1
    NotSign,     // N=0
    Overflow,    // V=1
    NotOverflow, // V=0

    Always,
    Never,
}

impl Condition {
    /// Returns the inverse condition.
    pub fn inverse(&self) -> Self {
        match self {
            Self::Equal => Self::NotEqual,
            Self::NotEqual => Self::Equal,
            Self::Above => Self::BelowOrEqual,
            Self::AboveOrEqual => Self::Below,
            Self::Below => Self::AboveOrEqual,
            Self::BelowOrEqual => Self::Above,
            Self::Greater => Self::LessOrEqual,
            Self::GreaterOrEqual => Self::Less,
            Self::Less => Self::GreaterOrEqual,
            Self::LessOrEqual => Self::Greater,
            Self::Sign => Self::NotSign,
            Self::NotSign => Self::Sign,
            Self::Overflow => Self::NotOverflow,
            Self::NotOverflow => Self::Overflow,
            Self::Always => Self::Never,
            Self::Never => Self::Always,
        }
    }

    /// Returns the assembler suffix for this condition (`eq`, `hs`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::Above => "hi",
            Self::AboveOrEqual => "hs",
            Self::Below => "lo",
            Self::BelowOrEqual => "ls",
            Self::Greater => "gt",
            Self::GreaterOrEqual => "ge",
            Self::Less => "lt",
            Self::LessOrEqual => "le",
            Self::Sign => "mi",
            Self::NotSign => "pl",
            Self::Overflow => "vs",
            Self::NotOverflow => "vc",
            Self::Always => "al",
            Self::Never => "nv",
        }
    }
}

/// Control flow classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlFlow {
    /// Sequential - falls through to next instruction.
    Sequential,

    /// Unconditional branch to a known address.
    UnconditionalBranch { target: u64 },

    /// Conditional branch - may fall through or jump.
    ConditionalBranch {
        target: u64,
        condition: Condition,
        fallthrough: u64,
    },

    /// Indirect jump (target in register or memory).
    IndirectBranch {
        /// Possible targets if known.
        possible_targets: Vec<u64>,
    },

    /// Function call to known address.
    Call { target: u64, return_addr: u64 },

    /// Indirect call.
    IndirectCall { return_addr: u64 },

    /// Return from function or interrupt.
    Return,

    /// System call.
    Syscall,

    /// Halts execution (trap, breakpoint, idle).
    Halt,
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}:  ", self.address)?;

        for byte in &self.bytes {
            write!(f, "{:02x} ", byte)?;
        }

        // Pad to align mnemonic
        for _ in self.bytes.len()..8 {
            write!(f, "   ")?;
        }

        write!(f, " {}", self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_inverse() {
        let all = [
            Condition::Equal,
            Condition::AboveOrEqual,
            Condition::Greater,
            Condition::Sign,
            Condition::Overflow,
            Condition::Always,
        ];
        for cond in all {
            assert_ne!(cond.inverse(), cond);
            assert_eq!(cond.inverse().inverse(), cond);
        }
        assert_eq!(Condition::Equal.inverse().name(), "ne");
        assert_eq!(Condition::Below.name(), "lo");
    }

    #[test]
    fn test_data_instruction() {
        let insn = Instruction::data(0x40, &[0xde, 0xad], ".byte");
        assert!(insn.is_data());
        assert_eq!(insn.size, 2);
        assert_eq!(insn.end_address(), 0x42);
        assert_eq!(insn.text(), ".byte 0xde, 0xad");
    }

    #[test]
    fn test_text_with_prefix() {
        let insn = Instruction::new(0, 4, vec![0; 4], "add")
            .with_prefix(Some("[!b0]".to_string()))
            .with_op_str(".L1 a1, a2, a3");
        assert_eq!(insn.text(), "[!b0] add .L1 a1, a2, a3");
        assert!(insn.to_string().ends_with("[!b0] add .L1 a1, a2, a3"));
    }
}
