//! Detail records: per-operand access, implicit registers, groups and the
//! architecture extension.

use bitflags::bitflags;

use crate::{Condition, Error, Operand, OperandKind, Register};

bitflags! {
    /// How an operand is accessed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct Access: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

bitflags! {
    /// Instruction group tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct Groups: u32 {
        const JUMP = 1 << 0;
        const CALL = 1 << 1;
        const RETURN = 1 << 2;
        const INTERRUPT = 1 << 3;
        const PRIVILEGE = 1 << 4;
        const BRANCH_RELATIVE = 1 << 5;
        const FLOAT = 1 << 6;
        const VECTOR = 1 << 7;
        const UNIT_D = 1 << 8;
        const UNIT_L = 1 << 9;
        const UNIT_M = 1 << 10;
        const UNIT_S = 1 << 11;
        const UNIT_NONE = 1 << 12;
    }
}

const GROUP_NAMES: [(Groups, &str); 13] = [
    (Groups::JUMP, "jump"),
    (Groups::CALL, "call"),
    (Groups::RETURN, "return"),
    (Groups::INTERRUPT, "int"),
    (Groups::PRIVILEGE, "privilege"),
    (Groups::BRANCH_RELATIVE, "branch_relative"),
    (Groups::FLOAT, "float"),
    (Groups::VECTOR, "vector"),
    (Groups::UNIT_D, "funit_d"),
    (Groups::UNIT_L, "funit_l"),
    (Groups::UNIT_M, "funit_m"),
    (Groups::UNIT_S, "funit_s"),
    (Groups::UNIT_NONE, "funit_no"),
];

impl Groups {
    /// Names of the groups set in `self`, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        GROUP_NAMES
            .iter()
            .filter(|(group, _)| self.contains(*group))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Looks up a single group by name.
    pub fn lookup(name: &str) -> Result<Self, Error> {
        GROUP_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(group, _)| *group)
            .ok_or_else(|| Error::UnknownGroup(name.to_string()))
    }
}

/// An operand together with how the instruction accesses it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailOperand {
    pub operand: Operand,
    pub access: Access,
}

/// Structured detail for one instruction.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detail {
    /// Operands in decode order, with access flags.
    pub operands: Vec<DetailOperand>,
    /// Registers read implicitly.
    pub regs_read: Vec<Register>,
    /// Registers written implicitly.
    pub regs_write: Vec<Register>,
    /// Group tags.
    pub groups: Groups,
    /// Architecture specific extension.
    pub arch: ArchDetail,
}

fn push_unique(list: &mut Vec<Register>, reg: Register) {
    if !list.iter().any(|r| r.same_storage(&reg)) {
        list.push(reg);
    }
}

impl Detail {
    /// All registers read and written, explicit and implicit.
    ///
    /// Memory base and index registers count as reads; a base with
    /// writeback also counts as a write.
    pub fn regs_access(&self) -> (Vec<Register>, Vec<Register>) {
        let mut reads = Vec::new();
        let mut writes = Vec::new();

        for op in &self.operands {
            match &op.operand {
                Operand::Memory(mem) => {
                    if let Some(base) = mem.base {
                        push_unique(&mut reads, base);
                        if mem.writeback() {
                            push_unique(&mut writes, base);
                        }
                    }
                    if let Some(index) = mem.index {
                        push_unique(&mut reads, index);
                    }
                }
                other => {
                    for reg in other.direct_registers() {
                        if op.access.contains(Access::READ) {
                            push_unique(&mut reads, reg);
                        }
                        if op.access.contains(Access::WRITE) {
                            push_unique(&mut writes, reg);
                        }
                    }
                }
            }
        }

        for reg in self.arch.implicit_reads() {
            push_unique(&mut reads, reg);
        }
        for reg in &self.regs_read {
            push_unique(&mut reads, *reg);
        }
        for reg in &self.regs_write {
            push_unique(&mut writes, *reg);
        }

        (reads, writes)
    }

    /// Returns true if the instruction reads `reg`.
    pub fn reads_register(&self, reg: Register) -> bool {
        self.regs_access().0.iter().any(|r| r.same_storage(&reg))
    }

    /// Returns true if the instruction writes `reg`.
    pub fn writes_register(&self, reg: Register) -> bool {
        self.regs_access().1.iter().any(|r| r.same_storage(&reg))
    }

    /// Returns true if every group in `group` is set.
    pub fn in_group(&self, group: Groups) -> bool {
        self.groups.contains(group)
    }

    /// Number of operands of the given kind.
    pub fn operand_count(&self, kind: OperandKind) -> usize {
        self.operands
            .iter()
            .filter(|op| op.operand.kind() == kind)
            .count()
    }

    /// Position of the `n`-th (zero based) operand of the given kind.
    pub fn operand_index(&self, kind: OperandKind, n: usize) -> Option<usize> {
        self.operands
            .iter()
            .enumerate()
            .filter(|(_, op)| op.operand.kind() == kind)
            .nth(n)
            .map(|(i, _)| i)
    }

    pub fn group_names(&self) -> Vec<&'static str> {
        self.groups.names()
    }
}

/// Architecture specific detail.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArchDetail {
    #[default]
    None,
    Arm64(Arm64Detail),
    RiscV(RiscVDetail),
    Tms320C64x(Tms320C64xDetail),
}

impl ArchDetail {
    /// Execution condition, if the instruction is conditional.
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Self::Arm64(d) => d.cc,
            Self::Tms320C64x(d) => d.condition.map(|c| {
                if c.zero {
                    Condition::Equal
                } else {
                    Condition::NotEqual
                }
            }),
            _ => None,
        }
    }

    /// Registers read because of the encoding rather than an operand.
    pub fn implicit_reads(&self) -> Vec<Register> {
        match self {
            Self::Tms320C64x(Tms320C64xDetail {
                condition: Some(cond),
                ..
            }) => vec![cond.register],
            _ => Vec::new(),
        }
    }
}

/// AArch64 extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arm64Detail {
    /// Condition code of B.cond / CSEL family.
    pub cc: Option<Condition>,
    /// Instruction sets NZCV.
    pub update_flags: bool,
    /// Base register is written back.
    pub writeback: bool,
}

/// RISC-V floating point rounding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingMode {
    Rne,
    Rtz,
    Rdn,
    Rup,
    Rmm,
    Dynamic,
}

impl RoundingMode {
    /// Decodes the 3-bit `rm` field; `None` for the reserved values.
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(Self::Rne),
            1 => Some(Self::Rtz),
            2 => Some(Self::Rdn),
            3 => Some(Self::Rup),
            4 => Some(Self::Rmm),
            7 => Some(Self::Dynamic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rne => "rne",
            Self::Rtz => "rtz",
            Self::Rdn => "rdn",
            Self::Rup => "rup",
            Self::Rmm => "rmm",
            Self::Dynamic => "dyn",
        }
    }
}

/// RISC-V extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiscVDetail {
    pub rounding_mode: Option<RoundingMode>,
}

/// TMS320C64x functional unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionalUnit {
    D,
    L,
    M,
    S,
    #[default]
    None,
}

impl FunctionalUnit {
    pub fn name(&self) -> &'static str {
        match self {
            Self::D => "D",
            Self::L => "L",
            Self::M => "M",
            Self::S => "S",
            Self::None => "",
        }
    }

    /// Group tag for this unit.
    pub fn group(&self) -> Groups {
        match self {
            Self::D => Groups::UNIT_D,
            Self::L => Groups::UNIT_L,
            Self::M => Groups::UNIT_M,
            Self::S => Groups::UNIT_S,
            Self::None => Groups::UNIT_NONE,
        }
    }
}

/// TMS320C64x predicate: execute if `register` is zero (`zero`) or nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TmsCondition {
    pub register: Register,
    pub zero: bool,
}

/// TMS320C64x extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tms320C64xDetail {
    pub condition: Option<TmsCondition>,
    pub unit: FunctionalUnit,
    /// Unit side, 1 or 2.
    pub side: u8,
    /// Register file used for load/store data (`T1`/`T2`).
    pub data_path: Option<u8>,
    /// The second source operand comes from the other register file.
    pub cross_path: bool,
    /// Executes in parallel with the previous instruction.
    pub parallel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{arm64, tms320c64x};
    use crate::{Architecture, IndexMode, MemoryRef, RegisterClass};

    fn x(id: u16) -> Register {
        Register::new(Architecture::Arm64, RegisterClass::General, id, 64)
    }

    #[test]
    fn test_regs_access_writeback() {
        let mem = MemoryRef::base_disp(x(1), 16, 8).with_mode(IndexMode::Pre);
        let detail = Detail {
            operands: vec![
                DetailOperand {
                    operand: Operand::reg(x(0)),
                    access: Access::WRITE,
                },
                DetailOperand {
                    operand: Operand::Memory(mem),
                    access: Access::READ,
                },
            ],
            ..Default::default()
        };
        let (reads, writes) = detail.regs_access();
        assert_eq!(reads, vec![x(1)]);
        assert_eq!(writes, vec![x(0), x(1)]);
        assert!(detail.writes_register(x(1)));
        assert!(!detail.reads_register(x(0)));
    }

    #[test]
    fn test_regs_access_implicit() {
        let nzcv = Register::new(Architecture::Arm64, RegisterClass::Flags, arm64::NZCV, 32);
        let w0 = Register::new(Architecture::Arm64, RegisterClass::General, 0, 32);
        let detail = Detail {
            operands: vec![DetailOperand {
                operand: Operand::reg(w0),
                access: Access::READ_WRITE,
            }],
            regs_write: vec![nzcv],
            ..Default::default()
        };
        // w0 and x0 share storage
        assert!(detail.reads_register(x(0)));
        assert!(detail.writes_register(nzcv));
    }

    #[test]
    fn test_tms_condition() {
        let b0 = Register::new(
            Architecture::Tms320C64x,
            RegisterClass::General,
            tms320c64x::B0,
            32,
        );
        let arch = ArchDetail::Tms320C64x(Tms320C64xDetail {
            condition: Some(TmsCondition {
                register: b0,
                zero: true,
            }),
            ..Default::default()
        });
        assert_eq!(arch.condition(), Some(Condition::Equal));
        let detail = Detail {
            arch,
            ..Default::default()
        };
        assert!(detail.reads_register(b0));
    }

    #[test]
    fn test_operand_queries() {
        let detail = Detail {
            operands: vec![
                DetailOperand {
                    operand: Operand::reg(x(0)),
                    access: Access::WRITE,
                },
                DetailOperand {
                    operand: Operand::imm(1, 12),
                    access: Access::READ,
                },
                DetailOperand {
                    operand: Operand::reg(x(1)),
                    access: Access::READ,
                },
            ],
            groups: Groups::JUMP | Groups::BRANCH_RELATIVE,
            ..Default::default()
        };
        assert_eq!(detail.operand_count(OperandKind::Register), 2);
        assert_eq!(detail.operand_index(OperandKind::Register, 1), Some(2));
        assert_eq!(detail.operand_index(OperandKind::Memory, 0), None);
        assert!(detail.in_group(Groups::JUMP));
        assert_eq!(detail.group_names(), vec!["jump", "branch_relative"]);
    }

    #[test]
    fn test_group_lookup() {
        assert_eq!(Groups::lookup("funit_l").ok(), Some(Groups::UNIT_L));
        assert!(Groups::lookup("bogus").is_err());
    }

    #[test]
    fn test_rounding_mode() {
        assert_eq!(RoundingMode::from_bits(0), Some(RoundingMode::Rne));
        assert_eq!(RoundingMode::from_bits(5), None);
        assert_eq!(RoundingMode::from_bits(7).map(|m| m.name()), Some("dyn"));
    }
}
