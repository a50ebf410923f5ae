//! RISC-V assembly syntax.

use opscope_core::{ArchDetail, Immediate, MemoryRef, Operand, RoundingMode};

use super::opcodes::Opcode;
use crate::engine::{Canonical, Rendering};
use crate::DisassemblerOptions;

pub(crate) fn render(
    canonical: &Canonical,
    arch: &ArchDetail,
    options: &DisassemblerOptions,
) -> Rendering {
    let opcode = Opcode::from_id(canonical.opcode);
    let mut parts: Vec<String> = match opcode {
        Some(Opcode::Fence) => canonical.operands.iter().map(fence_set).collect(),
        Some(Opcode::Lui | Opcode::Auipc | Opcode::CLui) => canonical
            .operands
            .iter()
            .map(|op| match op {
                Operand::Immediate(imm) => format!("{:#x}", imm.as_u64()),
                other => operand(other, options),
            })
            .collect(),
        _ => canonical
            .operands
            .iter()
            .map(|op| operand(op, options))
            .collect(),
    };

    if let ArchDetail::RiscV(detail) = arch {
        match detail.rounding_mode {
            Some(RoundingMode::Dynamic) | None => {}
            Some(mode) => parts.push(mode.name().to_string()),
        }
    }

    Rendering {
        prefix: None,
        op_str: parts.join(", "),
    }
}

fn operand(op: &Operand, options: &DisassemblerOptions) -> String {
    match op {
        Operand::Register(reg) => reg.name().to_string(),
        Operand::Immediate(imm) => immediate(imm, options.unsigned_immediates),
        Operand::Memory(mem) => memory(mem),
        Operand::PcRelative { target, .. } => format!("{target:#x}"),
        Operand::SystemRegister(csr) => csr.name.to_string(),
        Operand::FpImmediate(value) => value.to_string(),
        Operand::RegisterList(list) => list
            .registers
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(", "),
        Operand::ShiftedRegister { reg, .. } => reg.name().to_string(),
        Operand::Shift(shift) => shift.to_string(),
        Operand::Condition(cond) => cond.name().to_string(),
    }
}

fn immediate(imm: &Immediate, unsigned: bool) -> String {
    if unsigned && imm.value < 0 {
        format!("{:#x}", imm.as_u64())
    } else {
        imm.value.to_string()
    }
}

/// `offset(base)`
fn memory(mem: &MemoryRef) -> String {
    let base = mem.base.map(|r| r.name()).unwrap_or_default();
    format!("{}({base})", mem.displacement)
}

/// FENCE predecessor/successor sets: `iorw` letters for the set bits.
fn fence_set(op: &Operand) -> String {
    let bits = op.as_immediate().unwrap_or(0);
    let set: String = [(8, 'i'), (4, 'o'), (2, 'r'), (1, 'w')]
        .iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, c)| *c)
        .collect();
    if set.is_empty() {
        "0".to_string()
    } else {
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_sets() {
        assert_eq!(fence_set(&Operand::imm_unsigned(0b1111, 4)), "iorw");
        assert_eq!(fence_set(&Operand::imm_unsigned(0b0011, 4)), "rw");
        assert_eq!(fence_set(&Operand::imm_unsigned(0, 4)), "0");
    }

    #[test]
    fn test_negative_immediates() {
        let imm = Immediate {
            value: -4,
            size: 12,
            signed: true,
        };
        assert_eq!(immediate(&imm, false), "-4");
        assert_eq!(immediate(&imm, true), "0xfffffffffffffffc");
    }
}
