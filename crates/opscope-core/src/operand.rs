//! Instruction operand types.

use std::borrow::Cow;

use crate::{Condition, Register};

/// An instruction operand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Register operand.
    Register(Register),
    /// Immediate value.
    Immediate(Immediate),
    /// Memory reference.
    Memory(MemoryRef),
    /// PC-relative address (used in branches/calls).
    PcRelative {
        /// Offset from PC.
        offset: i64,
        /// Resolved target address.
        target: u64,
    },
    /// Consecutive registers or an even/odd pair.
    RegisterList(RegisterList),
    /// Floating point immediate, already expanded.
    FpImmediate(f64),
    /// Named system or control register that has no `Register` id.
    SystemRegister(SystemRegister),
    /// Register with a shift applied (`x1, lsl #3`).
    ShiftedRegister {
        /// The shifted register.
        reg: Register,
        /// Shift applied to it.
        shift: Shift,
    },
    /// Stand-alone shift modifier (`lsl #16` on wide moves).
    Shift(Shift),
    /// Condition code operand (`csel x0, x1, x2, eq`).
    Condition(Condition),
}

/// Operand kind, used for detail queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandKind {
    Register,
    Immediate,
    Memory,
    PcRelative,
    RegisterList,
    FpImmediate,
    SystemRegister,
    ShiftedRegister,
    Shift,
    Condition,
}

impl Operand {
    /// Creates a register operand.
    pub fn reg(reg: Register) -> Self {
        Self::Register(reg)
    }

    /// Creates an immediate operand.
    pub fn imm(value: i128, size: u8) -> Self {
        Self::Immediate(Immediate {
            value,
            size,
            signed: true,
        })
    }

    /// Creates an unsigned immediate operand.
    pub fn imm_unsigned(value: u64, size: u8) -> Self {
        Self::Immediate(Immediate {
            value: i128::from(value),
            size,
            signed: false,
        })
    }

    /// Creates a PC-relative operand.
    pub fn pc_rel(offset: i64, target: u64) -> Self {
        Self::PcRelative { offset, target }
    }

    /// Returns the kind of this operand.
    pub fn kind(&self) -> OperandKind {
        match self {
            Self::Register(_) => OperandKind::Register,
            Self::Immediate(_) => OperandKind::Immediate,
            Self::Memory(_) => OperandKind::Memory,
            Self::PcRelative { .. } => OperandKind::PcRelative,
            Self::RegisterList(_) => OperandKind::RegisterList,
            Self::FpImmediate(_) => OperandKind::FpImmediate,
            Self::SystemRegister(_) => OperandKind::SystemRegister,
            Self::ShiftedRegister { .. } => OperandKind::ShiftedRegister,
            Self::Shift(_) => OperandKind::Shift,
            Self::Condition(_) => OperandKind::Condition,
        }
    }

    /// Returns true if this is a register operand.
    pub fn is_register(&self) -> bool {
        matches!(self, Self::Register(_))
    }

    /// Returns true if this is an immediate operand.
    pub fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }

    /// Returns true if this is a memory operand.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory(_))
    }

    /// Returns the register if this is a plain register operand.
    pub fn as_register(&self) -> Option<Register> {
        match self {
            Self::Register(reg) => Some(*reg),
            _ => None,
        }
    }

    /// Returns the immediate value if this is an immediate operand.
    pub fn as_immediate(&self) -> Option<i128> {
        match self {
            Self::Immediate(imm) => Some(imm.value),
            _ => None,
        }
    }

    /// Registers named directly by this operand (memory base/index excluded).
    pub fn direct_registers(&self) -> Vec<Register> {
        match self {
            Self::Register(reg) | Self::ShiftedRegister { reg, .. } => vec![*reg],
            Self::RegisterList(list) => list.registers.clone(),
            _ => Vec::new(),
        }
    }
}

/// Immediate value operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Immediate {
    /// The value (sign-extended to i128 for uniformity).
    pub value: i128,
    /// Original size in bits.
    pub size: u8,
    /// Whether this is a signed immediate.
    pub signed: bool,
}

impl Immediate {
    /// Returns the value as an unsigned u64.
    pub fn as_u64(&self) -> u64 {
        self.value as u64
    }

    /// Returns the value as a signed i64.
    pub fn as_i64(&self) -> i64 {
        self.value as i64
    }
}

/// Base register update performed by a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexMode {
    /// Plain offset, base is not written.
    #[default]
    None,
    /// Base is updated before the access.
    Pre,
    /// Base is updated after the access.
    Post,
}

/// Extension applied to a memory index register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extend {
    Lsl,
    Uxtw,
    Sxtw,
    Sxtx,
}

impl Extend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lsl => "lsl",
            Self::Uxtw => "uxtw",
            Self::Sxtw => "sxtw",
            Self::Sxtx => "sxtx",
        }
    }
}

/// Memory reference operand.
///
/// Represents addressing like `[base + index*scale + disp]`, with optional
/// pre/post update of the base. `displacement` is always in bytes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryRef {
    /// Base register (if any).
    pub base: Option<Register>,
    /// Index register (if any).
    pub index: Option<Register>,
    /// Scale factor for index or scaled constant offsets.
    pub scale: u8,
    /// Displacement/offset in bytes.
    pub displacement: i64,
    /// Access size in bytes.
    pub size: u8,
    /// Base register update.
    pub mode: IndexMode,
    /// Offset is subtracted from the base.
    pub subtract: bool,
    /// Extension applied to the index register.
    pub extend: Option<Extend>,
}

impl MemoryRef {
    /// Creates a simple memory reference with just a base register.
    pub fn base(reg: Register, size: u8) -> Self {
        Self::base_disp(reg, 0, size)
    }

    /// Creates a memory reference with base and displacement.
    pub fn base_disp(base: Register, displacement: i64, size: u8) -> Self {
        Self {
            base: Some(base),
            index: None,
            scale: 1,
            displacement,
            size,
            mode: IndexMode::None,
            subtract: false,
            extend: None,
        }
    }

    /// Creates a memory reference with base and index register.
    pub fn base_index(base: Register, index: Register, scale: u8, size: u8) -> Self {
        Self {
            index: Some(index),
            scale,
            ..Self::base(base, size)
        }
    }

    /// Sets the base update mode.
    pub fn with_mode(mut self, mode: IndexMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the index extension.
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = Some(extend);
        self
    }

    /// Marks the offset as subtracted.
    pub fn with_subtract(mut self, subtract: bool) -> Self {
        self.subtract = subtract;
        self
    }

    /// Returns true if the base register is written back.
    pub fn writeback(&self) -> bool {
        self.mode != IndexMode::None
    }
}

/// Vector element arrangement (`16b`, `4s`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VectorArrangement {
    B8,
    B16,
    H4,
    H8,
    S2,
    S4,
    D1,
    D2,
}

impl VectorArrangement {
    pub fn name(&self) -> &'static str {
        match self {
            Self::B8 => "8b",
            Self::B16 => "16b",
            Self::H4 => "4h",
            Self::H8 => "8h",
            Self::S2 => "2s",
            Self::S4 => "4s",
            Self::D1 => "1d",
            Self::D2 => "2d",
        }
    }
}

/// How a register list is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListStyle {
    /// `{v0, v1, v2}`
    #[default]
    Sequence,
    /// `a5:a4` (high register first)
    Pair,
}

/// A list of registers (vector lists, register pairs).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterList {
    pub registers: Vec<Register>,
    pub arrangement: Option<VectorArrangement>,
    pub style: ListStyle,
}

impl RegisterList {
    pub fn new(registers: Vec<Register>) -> Self {
        Self {
            registers,
            arrangement: None,
            style: ListStyle::Sequence,
        }
    }

    pub fn pair(high: Register, low: Register) -> Self {
        Self {
            registers: vec![high, low],
            arrangement: None,
            style: ListStyle::Pair,
        }
    }

    pub fn with_arrangement(mut self, arrangement: VectorArrangement) -> Self {
        self.arrangement = Some(arrangement);
        self
    }
}

/// A named system register (AArch64 MRS/MSR operand, RISC-V CSR).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemRegister {
    /// Raw encoding as it appears in the instruction.
    pub encoding: u32,
    /// Display name.
    pub name: Cow<'static, str>,
}

/// Shift type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl ShiftKind {
    /// Decodes the common 2-bit shift field.
    pub fn from_bits(bits: u64) -> Self {
        match bits & 3 {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            _ => Self::Ror,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
            Self::Ror => "ror",
        }
    }
}

/// A shift kind and amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    pub kind: ShiftKind,
    pub amount: u8,
}

impl Shift {
    pub fn new(kind: ShiftKind, amount: u8) -> Self {
        Self { kind, amount }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.kind.name(), self.amount)
    }
}

// Generic rendering; architecture printers override the syntax.
impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{}", reg.name()),
            Self::Immediate(imm) => {
                if imm.signed && imm.value < 0 {
                    write!(f, "-{:#x}", -imm.value)
                } else {
                    write!(f, "{:#x}", imm.value)
                }
            }
            Self::Memory(mem) => {
                write!(f, "[")?;
                let mut has_content = false;

                if let Some(ref base) = mem.base {
                    write!(f, "{}", base.name())?;
                    has_content = true;
                }

                if let Some(ref index) = mem.index {
                    if has_content {
                        f.write_str(if mem.subtract { " - " } else { " + " })?;
                    }
                    write!(f, "{}", index.name())?;
                    if mem.scale > 1 {
                        write!(f, "*{}", mem.scale)?;
                    }
                    has_content = true;
                }

                if mem.displacement != 0 {
                    if has_content {
                        if mem.displacement > 0 {
                            write!(f, " + {:#x}", mem.displacement)?;
                        } else {
                            write!(f, " - {:#x}", -mem.displacement)?;
                        }
                    } else {
                        write!(f, "{:#x}", mem.displacement)?;
                    }
                }

                write!(f, "]")?;
                match mem.mode {
                    IndexMode::None => Ok(()),
                    IndexMode::Pre => write!(f, "!"),
                    IndexMode::Post => write!(f, "+"),
                }
            }
            Self::PcRelative { target, .. } => write!(f, "{:#x}", target),
            Self::RegisterList(list) => match list.style {
                ListStyle::Pair => {
                    let names: Vec<_> = list.registers.iter().map(|r| r.name()).collect();
                    write!(f, "{}", names.join(":"))
                }
                ListStyle::Sequence => {
                    write!(f, "{{")?;
                    for (i, reg) in list.registers.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", reg.name())?;
                        if let Some(arrangement) = list.arrangement {
                            write!(f, ".{}", arrangement.name())?;
                        }
                    }
                    write!(f, "}}")
                }
            },
            Self::FpImmediate(value) => write!(f, "{:.8}", value),
            Self::SystemRegister(sys) => write!(f, "{}", sys.name),
            Self::ShiftedRegister { reg, shift } => write!(f, "{}, {}", reg.name(), shift),
            Self::Shift(shift) => write!(f, "{}", shift),
            Self::Condition(cond) => write!(f, "{}", cond.name()),
        }
    }
}
