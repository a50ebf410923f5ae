//! Pseudo-instructions from the assembler manual, in priority order.

use opscope_core::register::riscv::{RA, ZERO};
use opscope_core::{Operand, SystemRegister};

use super::csr::{CYCLE, INSTRET, TIME};
use super::opcodes::Opcode::{self, *};
use crate::engine::AliasRule;

type Rewrite = fn(&[Operand]) -> Option<Vec<Operand>>;

const fn rule(opcode: Opcode, alias: Opcode, rewrite: Rewrite) -> AliasRule {
    AliasRule {
        opcode: opcode.id(),
        alias: alias.id(),
        rewrite,
    }
}

pub(crate) static ALIASES: &[AliasRule] = &[
    rule(Addi, Nop, nop),
    rule(Addi, Li, li),
    rule(Addi, Mv, mv),
    rule(Xori, Not, not),
    rule(Sub, Neg, drop_zero_source),
    rule(Subw, Negw, drop_zero_source),
    rule(Addiw, SextW, mv),
    rule(Sltiu, Seqz, seqz),
    rule(Sltu, Snez, drop_zero_source),
    rule(Slt, Sltz, drop_zero_last),
    rule(Slt, Sgtz, drop_zero_source),
    rule(Beq, Beqz, branch_zero_rhs),
    rule(Bne, Bnez, branch_zero_rhs),
    rule(Bge, Blez, branch_zero_lhs),
    rule(Bge, Bgez, branch_zero_rhs),
    rule(Blt, Bltz, branch_zero_rhs),
    rule(Blt, Bgtz, branch_zero_lhs),
    rule(Jal, J, jal_link::<ZERO>),
    rule(Jal, JalRa, jal_link::<RA>),
    rule(Jalr, Ret, ret),
    rule(Jalr, Jr, jalr_link::<ZERO>),
    rule(Jalr, JalrRa, jalr_link::<RA>),
    rule(Csrrs, Rdcycle, counter::<CYCLE>),
    rule(Csrrs, Rdtime, counter::<TIME>),
    rule(Csrrs, Rdinstret, counter::<INSTRET>),
    rule(Csrrs, Csrr, csr_read),
    rule(Csrrw, Csrw, csr_write),
    rule(Csrrs, Csrs, csr_write),
    rule(Csrrc, Csrc, csr_write),
    rule(Csrrwi, Csrwi, csr_write),
    rule(Csrrsi, Csrsi, csr_write),
    rule(Csrrci, Csrci, csr_write),
    rule(Fence, FenceAll, fence_all),
];

fn is_reg(op: &Operand, id: u16) -> bool {
    matches!(op, Operand::Register(r) if r.id == id)
}

fn is_zero(op: &Operand) -> bool {
    is_reg(op, ZERO)
}

fn is_imm(op: &Operand, value: i128) -> bool {
    matches!(op, Operand::Immediate(imm) if imm.value == value)
}

fn nop(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_zero(rd) && is_zero(rs1) && is_imm(imm, 0) => Some(Vec::new()),
        _ => None,
    }
}

fn li(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_zero(rs1) => Some(vec![rd.clone(), imm.clone()]),
        _ => None,
    }
}

/// `addi rd, rs, 0` and `addiw rd, rs, 0`.
fn mv(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_imm(imm, 0) => Some(vec![rd.clone(), rs1.clone()]),
        _ => None,
    }
}

fn not(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_imm(imm, -1) => Some(vec![rd.clone(), rs1.clone()]),
        _ => None,
    }
}

fn seqz(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_imm(imm, 1) => Some(vec![rd.clone(), rs1.clone()]),
        _ => None,
    }
}

/// `op rd, zero, rs` becomes `alias rd, rs`.
fn drop_zero_source(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, rs2] if is_zero(rs1) => Some(vec![rd.clone(), rs2.clone()]),
        _ => None,
    }
}

/// `op rd, rs, zero` becomes `alias rd, rs`.
fn drop_zero_last(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, rs2] if is_zero(rs2) => Some(vec![rd.clone(), rs1.clone()]),
        _ => None,
    }
}

fn branch_zero_rhs(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rs1, rs2, target] if is_zero(rs2) => Some(vec![rs1.clone(), target.clone()]),
        _ => None,
    }
}

/// `bge zero, rs, t` is `blez rs, t`; `blt zero, rs, t` is `bgtz rs, t`.
fn branch_zero_lhs(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rs1, rs2, target] if is_zero(rs1) => Some(vec![rs2.clone(), target.clone()]),
        _ => None,
    }
}

fn jal_link<const LINK: u16>(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, target] if is_reg(rd, LINK) => Some(vec![target.clone()]),
        _ => None,
    }
}

fn ret(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_zero(rd) && is_reg(rs1, RA) && is_imm(imm, 0) => Some(Vec::new()),
        _ => None,
    }
}

fn jalr_link<const LINK: u16>(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, rs1, imm] if is_reg(rd, LINK) && is_imm(imm, 0) => Some(vec![rs1.clone()]),
        _ => None,
    }
}

fn csr_number(op: &Operand) -> Option<u32> {
    match op {
        Operand::SystemRegister(SystemRegister { encoding, .. }) => Some(*encoding),
        _ => None,
    }
}

fn counter<const CSR: u32>(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, csr, rs1] if csr_number(csr) == Some(CSR) && is_zero(rs1) => Some(vec![rd.clone()]),
        _ => None,
    }
}

fn csr_read(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, csr, rs1] if is_zero(rs1) => Some(vec![rd.clone(), csr.clone()]),
        _ => None,
    }
}

/// Writes that discard the old value drop `rd`.
fn csr_write(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [rd, csr, src] if is_zero(rd) => Some(vec![csr.clone(), src.clone()]),
        _ => None,
    }
}

fn fence_all(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [pred, succ] if is_imm(pred, 0b1111) && is_imm(succ, 0b1111) => Some(Vec::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::canonical::{canonicalize, rules_are_final};
    use crate::riscv::csr::csr;
    use opscope_core::{Architecture, Register, RegisterClass};

    fn x(id: u16) -> Operand {
        Operand::reg(Register::new(Architecture::RiscV64, RegisterClass::General, id, 64))
    }

    #[test]
    fn test_rules_are_final() {
        assert!(rules_are_final(ALIASES));
    }

    #[test]
    fn test_csrrs_zero_zero_is_csrr() {
        // csrrs zero, mstatus, zero reads into zero: csrr wins over csrs
        let mstatus = Operand::SystemRegister(csr(0x300));
        let out = canonicalize(ALIASES, Csrrs.id(), vec![x(ZERO), mstatus.clone(), x(ZERO)]);
        assert_eq!(out.opcode, Csrr.id());
        assert_eq!(out.operands, vec![x(ZERO), mstatus]);
    }

    #[test]
    fn test_branch_operand_order() {
        let target = Operand::pc_rel(8, 0x1008);
        let out = canonicalize(ALIASES, Blt.id(), vec![x(ZERO), x(10), target.clone()]);
        assert_eq!(out.opcode, Bgtz.id());
        assert_eq!(out.operands, vec![x(10), target]);
    }
}
