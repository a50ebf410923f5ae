//! Assembler idioms: `zero`, `mv`, `neg`, `not` and the single-cycle `nop`.

use opscope_core::Operand;

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
    rule(Sub, Zero, zero),
    rule(Add, Mv, mv),
    rule(Sub, Neg, neg),
    rule(Xor, Not, not),
    rule(Nop, NopOne, nop_one),
];

fn is_imm(op: &Operand, value: i128) -> bool {
    matches!(op, Operand::Immediate(imm) if imm.value == value)
}

/// `sub x, x, dst`
fn zero(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [Operand::Register(a), Operand::Register(b), dst] if a == b => Some(vec![dst.clone()]),
        _ => None,
    }
}

/// `add 0, src, dst` on .L/.S and `add src, 0, dst` on .D.
fn mv(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [zero, src @ Operand::Register(_), dst] | [src @ Operand::Register(_), zero, dst]
            if is_imm(zero, 0) =>
        {
            Some(vec![src.clone(), dst.clone()])
        }
        _ => None,
    }
}

fn neg(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [zero, src, dst] if is_imm(zero, 0) => Some(vec![src.clone(), dst.clone()]),
        _ => None,
    }
}

fn not(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [ones, src, dst] if is_imm(ones, -1) => Some(vec![src.clone(), dst.clone()]),
        _ => None,
    }
}

fn nop_one(ops: &[Operand]) -> Option<Vec<Operand>> {
    match ops {
        [count] if is_imm(count, 1) => Some(Vec::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::canonical::{canonicalize, rules_are_final};
    use opscope_core::{Architecture, Register, RegisterClass};

    fn a(id: u16) -> Operand {
        Operand::reg(Register::new(Architecture::Tms320C64x, RegisterClass::General, id, 32))
    }

    #[test]
    fn test_rules_are_final() {
        assert!(rules_are_final(ALIASES));
    }

    #[test]
    fn test_zero_wins_over_neg() {
        let out = canonicalize(ALIASES, Sub.id(), vec![a(1), a(1), a(3)]);
        assert_eq!(out.opcode, Zero.id());
        assert_eq!(out.operands, vec![a(3)]);
    }

    #[test]
    fn test_mv_either_position() {
        let imm = Operand::imm(0, 5);
        let out = canonicalize(ALIASES, Add.id(), vec![imm.clone(), a(2), a(3)]);
        assert_eq!(out.opcode, Mv.id());
        assert_eq!(out.operands, vec![a(2), a(3)]);
        let out = canonicalize(ALIASES, Add.id(), vec![a(2), imm, a(3)]);
        assert_eq!(out.opcode, Mv.id());

        let out = canonicalize(ALIASES, Add.id(), vec![a(1), a(2), a(3)]);
        assert_eq!(out.opcode, Add.id());
    }
}
