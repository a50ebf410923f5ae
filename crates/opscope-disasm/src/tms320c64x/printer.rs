//! TI assembly syntax: `[!b0] ldw .D1T1 *+a4[3], a5`.

use opscope_core::{
    ArchDetail, FunctionalUnit, IndexMode, MemoryRef, Operand, Tms320C64xDetail,
};

use super::opcodes::Opcode;
use crate::engine::{Canonical, Rendering};
use crate::DisassemblerOptions;

pub(crate) fn render(
    canonical: &Canonical,
    arch: &ArchDetail,
    options: &DisassemblerOptions,
) -> Rendering {
    let hex_immediates = Opcode::from_id(canonical.opcode) == Some(Opcode::Mvkh);
    let operands = canonical
        .operands
        .iter()
        .map(|op| operand(op, hex_immediates, options))
        .collect::<Vec<_>>()
        .join(", ");

    let detail = match arch {
        ArchDetail::Tms320C64x(detail) => Some(detail),
        _ => None,
    };
    let unit = detail.map(unit).unwrap_or_default();

    let mut op_str = match (unit.is_empty(), operands.is_empty()) {
        (true, _) => operands,
        (false, true) => unit,
        (false, false) => format!("{unit} {operands}"),
    };
    if detail.is_some_and(|d| d.parallel) {
        if !op_str.is_empty() {
            op_str.push(' ');
        }
        op_str.push_str("||");
    }

    Rendering {
        prefix: detail.and_then(predicate),
        op_str,
    }
}

fn predicate(detail: &Tms320C64xDetail) -> Option<String> {
    detail.condition.map(|cond| {
        let bang = if cond.zero { "!" } else { "" };
        format!("[{bang}{}]", cond.register.name())
    })
}

/// `.L1`, `.S2X`, `.D1T2`
fn unit(detail: &Tms320C64xDetail) -> String {
    if detail.unit == FunctionalUnit::None {
        return String::new();
    }
    let mut out = format!(".{}{}", detail.unit.name(), detail.side);
    if let Some(path) = detail.data_path {
        out.push_str(&format!("T{path}"));
    }
    if detail.cross_path {
        out.push('X');
    }
    out
}

fn operand(op: &Operand, hex: bool, options: &DisassemblerOptions) -> String {
    match op {
        Operand::Register(reg) => reg.name().to_string(),
        Operand::RegisterList(list) => list
            .registers
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(":"),
        Operand::Immediate(imm) => {
            if hex || (options.unsigned_immediates && imm.value < 0) {
                format!("{:#x}", imm.as_u64() & 0xffff_ffff)
            } else {
                imm.value.to_string()
            }
        }
        Operand::Memory(mem) => memory(mem),
        Operand::PcRelative { target, .. } => format!("{target:#x}"),
        other => other.to_string(),
    }
}

/// `*+a4[3]`, `*--b15[a1]`, `*b4++[1]`
fn memory(mem: &MemoryRef) -> String {
    let base = mem.base.map(|r| r.name()).unwrap_or_default();
    let sign = if mem.subtract { '-' } else { '+' };
    let offset = match mem.index {
        Some(index) => index.name().to_string(),
        None => (mem.displacement.unsigned_abs() / u64::from(mem.scale.max(1))).to_string(),
    };
    match mem.mode {
        IndexMode::None => format!("*{sign}{base}[{offset}]"),
        IndexMode::Pre => format!("*{sign}{sign}{base}[{offset}]"),
        IndexMode::Post => format!("*{base}{sign}{sign}[{offset}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opscope_core::register::tms320c64x::{A0, B0};
    use opscope_core::{Architecture, Register, RegisterClass};

    fn reg(id: u16) -> Register {
        Register::new(Architecture::Tms320C64x, RegisterClass::General, id, 32)
    }

    #[test]
    fn test_memory_forms() {
        let a4 = reg(A0 + 4);
        let plain = MemoryRef {
            scale: 4,
            ..MemoryRef::base_disp(a4, 12, 4)
        };
        assert_eq!(memory(&plain), "*+a4[3]");

        let post = MemoryRef {
            scale: 4,
            ..MemoryRef::base_disp(reg(B0 + 4), 4, 4)
        }
        .with_mode(IndexMode::Post);
        assert_eq!(memory(&post), "*b4++[1]");

        let pre = MemoryRef::base_index(reg(B0 + 15), reg(A0 + 1), 8, 8)
            .with_mode(IndexMode::Pre)
            .with_subtract(true);
        assert_eq!(memory(&pre), "*--b15[a1]");
    }

    #[test]
    fn test_unit_names() {
        let detail = Tms320C64xDetail {
            unit: FunctionalUnit::D,
            side: 1,
            data_path: Some(2),
            ..Default::default()
        };
        assert_eq!(unit(&detail), ".D1T2");
        let detail = Tms320C64xDetail {
            unit: FunctionalUnit::L,
            side: 2,
            cross_path: true,
            ..Default::default()
        };
        assert_eq!(unit(&detail), ".L2X");
        assert_eq!(unit(&Tms320C64xDetail::default()), "");
    }
}
