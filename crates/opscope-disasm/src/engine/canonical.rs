//! Alias canonicalization.

use opscope_core::Operand;

/// Rewrites instructions with opcode `opcode` into `alias` when `rewrite`
/// accepts the operands.
#[derive(Debug, Clone, Copy)]
pub struct AliasRule {
    pub opcode: u16,
    pub alias: u16,
    pub rewrite: fn(&[Operand]) -> Option<Vec<Operand>>,
}

/// The preferred form of an instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Canonical {
    pub opcode: u16,
    pub operands: Vec<Operand>,
}

/// Applies the first matching rule for `opcode`, in table order.
pub fn canonicalize(rules: &[AliasRule], opcode: u16, operands: Vec<Operand>) -> Canonical {
    for rule in rules.iter().filter(|rule| rule.opcode == opcode) {
        if let Some(rewritten) = (rule.rewrite)(&operands) {
            return Canonical {
                opcode: rule.alias,
                operands: rewritten,
            };
        }
    }
    Canonical { opcode, operands }
}

/// Returns true if no rule fires on an alias produced by another rule,
/// which makes [`canonicalize`] idempotent.
pub fn rules_are_final(rules: &[AliasRule]) -> bool {
    rules
        .iter()
        .all(|produced| rules.iter().all(|rule| rule.opcode != produced.alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADD: u16 = 0;
    const MV: u16 = 1;

    fn add_zero(ops: &[Operand]) -> Option<Vec<Operand>> {
        match ops {
            [dst, src, Operand::Immediate(imm)] if imm.value == 0 => {
                Some(vec![dst.clone(), src.clone()])
            }
            _ => None,
        }
    }

    const RULES: &[AliasRule] = &[AliasRule {
        opcode: ADD,
        alias: MV,
        rewrite: add_zero,
    }];

    #[test]
    fn test_canonicalize() {
        let ops = vec![Operand::imm(1, 5), Operand::imm(2, 5), Operand::imm(0, 12)];
        let first = canonicalize(RULES, ADD, ops);
        assert_eq!(first.opcode, MV);
        assert_eq!(first.operands.len(), 2);

        let again = canonicalize(RULES, first.opcode, first.operands.clone());
        assert_eq!(again, first);
        assert!(rules_are_final(RULES));
    }

    #[test]
    fn test_no_match_is_identity() {
        let ops = vec![Operand::imm(1, 5), Operand::imm(2, 5), Operand::imm(3, 12)];
        let out = canonicalize(RULES, ADD, ops.clone());
        assert_eq!(out.opcode, ADD);
        assert_eq!(out.operands, ops);
    }
}
