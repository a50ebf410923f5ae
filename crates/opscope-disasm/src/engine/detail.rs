//! Per-opcode descriptions and detail record assembly.

use opscope_core::{
    Access, ArchDetail, Condition, Detail, DetailOperand, Groups, Operand, Operation, Register,
};

/// Static description of one opcode (raw or alias).
#[derive(Debug)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub operation: Operation,
    /// Access of each operand, in operand order.
    pub access: &'static [Access],
    pub implicit_reads: &'static [Register],
    pub implicit_writes: &'static [Register],
    pub groups: Groups,
    /// Branch condition fixed by the opcode itself.
    pub condition: Option<Condition>,
}

/// Builds the detail record for `operands`.
///
/// Operands past the end of the access list get an empty access.
pub fn emit(info: &OpcodeInfo, operands: &[Operand], arch: ArchDetail) -> Detail {
    let operands = operands
        .iter()
        .enumerate()
        .map(|(i, operand)| DetailOperand {
            operand: operand.clone(),
            access: info.access.get(i).copied().unwrap_or(Access::empty()),
        })
        .collect();

    Detail {
        operands,
        regs_read: info.implicit_reads.to_vec(),
        regs_write: info.implicit_writes.to_vec(),
        groups: info.groups,
        arch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opscope_core::{Architecture, RegisterClass};

    const FLAGS: Register = Register::new(Architecture::Arm64, RegisterClass::Flags, 33, 32);

    static CMP: OpcodeInfo = OpcodeInfo {
        mnemonic: "cmp",
        operation: Operation::Compare,
        access: &[Access::READ],
        implicit_reads: &[],
        implicit_writes: &[FLAGS],
        groups: Groups::empty(),
        condition: None,
    };

    #[test]
    fn test_emit_positional_access() {
        let x0 = Register::new(Architecture::Arm64, RegisterClass::General, 0, 64);
        let detail = emit(
            &CMP,
            &[Operand::reg(x0), Operand::imm(5, 12)],
            ArchDetail::None,
        );
        assert_eq!(detail.operands.len(), 2);
        assert_eq!(detail.operands[0].access, Access::READ);
        assert_eq!(detail.operands[1].access, Access::empty());
        assert_eq!(detail.regs_write, vec![FLAGS]);
        assert!(detail.reads_register(x0));
    }
}
