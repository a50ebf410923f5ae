//! AArch64 assembly syntax.

use opscope_core::{Extend, IndexMode, MemoryRef, Operand, RegisterList};

use crate::engine::{Canonical, Rendering};
use crate::DisassemblerOptions;

pub(crate) fn render(canonical: &Canonical, options: &DisassemblerOptions) -> Rendering {
    let op_str = canonical
        .operands
        .iter()
        .map(|op| operand(op, options))
        .collect::<Vec<_>>()
        .join(", ");
    Rendering {
        prefix: None,
        op_str,
    }
}

fn operand(op: &Operand, options: &DisassemblerOptions) -> String {
    match op {
        Operand::Register(reg) => reg.name().to_string(),
        Operand::Immediate(imm) => immediate(imm.value, options.unsigned_immediates),
        Operand::Memory(mem) => memory(mem, options),
        Operand::PcRelative { target, .. } => format!("#{target:#x}"),
        Operand::RegisterList(list) => register_list(list),
        Operand::FpImmediate(value) => format!("#{value:.8}"),
        Operand::SystemRegister(sysreg) => sysreg.name.to_string(),
        Operand::ShiftedRegister { reg, shift } => format!("{}, {shift}", reg.name()),
        Operand::Shift(shift) => shift.to_string(),
        Operand::Condition(cond) => cond.name().to_string(),
    }
}

/// Small values print in decimal, everything else in hex.
fn immediate(value: i128, unsigned: bool) -> String {
    if unsigned && value < 0 {
        return format!("#{:#x}", value as u64);
    }
    match value {
        -9..=9 => format!("#{value}"),
        v if v < 0 => format!("#-{:#x}", v.unsigned_abs()),
        v => format!("#{v:#x}"),
    }
}

fn memory(mem: &MemoryRef, options: &DisassemblerOptions) -> String {
    let base = mem.base.map(|r| r.name()).unwrap_or_default();
    let offset = immediate(i128::from(mem.displacement), options.unsigned_immediates);

    if let Some(index) = mem.index {
        if mem.mode == IndexMode::Post {
            return format!("[{base}], {}", index.name());
        }
        let amount = mem.scale.trailing_zeros();
        let extend = match mem.extend {
            Some(Extend::Lsl) | None if amount == 0 => String::new(),
            Some(Extend::Lsl) | None => format!(", lsl #{amount}"),
            Some(ext) if amount == 0 => format!(", {}", ext.name()),
            Some(ext) => format!(", {} #{amount}", ext.name()),
        };
        return format!("[{base}, {}{extend}]", index.name());
    }

    match mem.mode {
        IndexMode::Post => format!("[{base}], {offset}"),
        IndexMode::Pre => format!("[{base}, {offset}]!"),
        IndexMode::None if mem.displacement == 0 => format!("[{base}]"),
        IndexMode::None => format!("[{base}, {offset}]"),
    }
}

fn register_list(list: &RegisterList) -> String {
    let suffix = list
        .arrangement
        .map(|a| format!(".{}", a.name()))
        .unwrap_or_default();
    let regs = list
        .registers
        .iter()
        .map(|r| format!("{}{suffix}", r.name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{regs}}}")
}
