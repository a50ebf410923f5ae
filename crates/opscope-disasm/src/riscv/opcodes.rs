//! RISC-V opcode ids and their static descriptions.
//!
//! Implicit registers are listed with their RV64 identity;
//! [`finish_detail`](crate::engine::Isa::finish_detail) narrows them for RV32.

use opscope_core::register::riscv::RA as RA_ID;
use opscope_core::{Architecture, Operation, Register, RegisterClass};

pub(crate) const RA: Register =
    Register::new(Architecture::RiscV64, RegisterClass::General, RA_ID, 64);

opcode_table! {
    /// RISC-V opcodes. Preferred aliases have ids of their own.
    pub enum Opcode in OPCODE_INFO {
        // RV32I/RV64I
        Lui => "lui", Operation::Move, [WRITE, READ];
        Auipc => "auipc", Operation::LoadEffectiveAddress, [WRITE, READ];
        Jal => "jal", Operation::Call, [WRITE, READ] groups [CALL, BRANCH_RELATIVE];
        Jalr => "jalr", Operation::Call, [WRITE, READ, READ] groups [CALL];
        Beq => "beq", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Equal;
        Bne => "bne", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond NotEqual;
        Blt => "blt", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Less;
        Bge => "bge", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond GreaterOrEqual;
        Bltu => "bltu", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Below;
        Bgeu => "bgeu", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond AboveOrEqual;
        Lb => "lb", Operation::Load, [WRITE, READ];
        Lh => "lh", Operation::Load, [WRITE, READ];
        Lw => "lw", Operation::Load, [WRITE, READ];
        Ld => "ld", Operation::Load, [WRITE, READ];
        Lbu => "lbu", Operation::Load, [WRITE, READ];
        Lhu => "lhu", Operation::Load, [WRITE, READ];
        Lwu => "lwu", Operation::Load, [WRITE, READ];
        Sb => "sb", Operation::Store, [READ, WRITE];
        Sh => "sh", Operation::Store, [READ, WRITE];
        Sw => "sw", Operation::Store, [READ, WRITE];
        Sd => "sd", Operation::Store, [READ, WRITE];
        Addi => "addi", Operation::Add, [WRITE, READ, READ];
        Slti => "slti", Operation::Compare, [WRITE, READ, READ];
        Sltiu => "sltiu", Operation::Compare, [WRITE, READ, READ];
        Xori => "xori", Operation::Xor, [WRITE, READ, READ];
        Ori => "ori", Operation::Or, [WRITE, READ, READ];
        Andi => "andi", Operation::And, [WRITE, READ, READ];
        Slli => "slli", Operation::Shl, [WRITE, READ, READ];
        Srli => "srli", Operation::Shr, [WRITE, READ, READ];
        Srai => "srai", Operation::Sar, [WRITE, READ, READ];
        Addiw => "addiw", Operation::Add, [WRITE, READ, READ];
        Slliw => "slliw", Operation::Shl, [WRITE, READ, READ];
        Srliw => "srliw", Operation::Shr, [WRITE, READ, READ];
        Sraiw => "sraiw", Operation::Sar, [WRITE, READ, READ];
        Add => "add", Operation::Add, [WRITE, READ, READ];
        Sub => "sub", Operation::Sub, [WRITE, READ, READ];
        Sll => "sll", Operation::Shl, [WRITE, READ, READ];
        Slt => "slt", Operation::Compare, [WRITE, READ, READ];
        Sltu => "sltu", Operation::Compare, [WRITE, READ, READ];
        Xor => "xor", Operation::Xor, [WRITE, READ, READ];
        Srl => "srl", Operation::Shr, [WRITE, READ, READ];
        Sra => "sra", Operation::Sar, [WRITE, READ, READ];
        Or => "or", Operation::Or, [WRITE, READ, READ];
        And => "and", Operation::And, [WRITE, READ, READ];
        Addw => "addw", Operation::Add, [WRITE, READ, READ];
        Subw => "subw", Operation::Sub, [WRITE, READ, READ];
        Sllw => "sllw", Operation::Shl, [WRITE, READ, READ];
        Srlw => "srlw", Operation::Shr, [WRITE, READ, READ];
        Sraw => "sraw", Operation::Sar, [WRITE, READ, READ];
        Fence => "fence", Operation::Fence, [READ, READ];
        FenceI => "fence.i", Operation::Fence, [];
        Ecall => "ecall", Operation::Syscall, [] groups [INTERRUPT];
        Ebreak => "ebreak", Operation::Interrupt, [] groups [INTERRUPT];
        Sret => "sret", Operation::Return, [] groups [RETURN, PRIVILEGE];
        Mret => "mret", Operation::Return, [] groups [RETURN, PRIVILEGE];
        Wfi => "wfi", Operation::Halt, [] groups [PRIVILEGE];

        // Zicsr
        Csrrw => "csrrw", Operation::SystemAccess, [WRITE, READ_WRITE, READ];
        Csrrs => "csrrs", Operation::SystemAccess, [WRITE, READ_WRITE, READ];
        Csrrc => "csrrc", Operation::SystemAccess, [WRITE, READ_WRITE, READ];
        Csrrwi => "csrrwi", Operation::SystemAccess, [WRITE, READ_WRITE, READ];
        Csrrsi => "csrrsi", Operation::SystemAccess, [WRITE, READ_WRITE, READ];
        Csrrci => "csrrci", Operation::SystemAccess, [WRITE, READ_WRITE, READ];

        // M
        Mul => "mul", Operation::Mul, [WRITE, READ, READ];
        Mulh => "mulh", Operation::Mul, [WRITE, READ, READ];
        Mulhsu => "mulhsu", Operation::Mul, [WRITE, READ, READ];
        Mulhu => "mulhu", Operation::Mul, [WRITE, READ, READ];
        Div => "div", Operation::Div, [WRITE, READ, READ];
        Divu => "divu", Operation::Div, [WRITE, READ, READ];
        Rem => "rem", Operation::Div, [WRITE, READ, READ];
        Remu => "remu", Operation::Div, [WRITE, READ, READ];
        Mulw => "mulw", Operation::Mul, [WRITE, READ, READ];
        Divw => "divw", Operation::Div, [WRITE, READ, READ];
        Divuw => "divuw", Operation::Div, [WRITE, READ, READ];
        Remw => "remw", Operation::Div, [WRITE, READ, READ];
        Remuw => "remuw", Operation::Div, [WRITE, READ, READ];

        // F and D
        Flw => "flw", Operation::Load, [WRITE, READ] groups [FLOAT];
        Fld => "fld", Operation::Load, [WRITE, READ] groups [FLOAT];
        Fsw => "fsw", Operation::Store, [READ, WRITE] groups [FLOAT];
        Fsd => "fsd", Operation::Store, [READ, WRITE] groups [FLOAT];
        FaddS => "fadd.s", Operation::Add, [WRITE, READ, READ] groups [FLOAT];
        FsubS => "fsub.s", Operation::Sub, [WRITE, READ, READ] groups [FLOAT];
        FmulS => "fmul.s", Operation::Mul, [WRITE, READ, READ] groups [FLOAT];
        FdivS => "fdiv.s", Operation::Div, [WRITE, READ, READ] groups [FLOAT];
        FaddD => "fadd.d", Operation::Add, [WRITE, READ, READ] groups [FLOAT];
        FsubD => "fsub.d", Operation::Sub, [WRITE, READ, READ] groups [FLOAT];
        FmulD => "fmul.d", Operation::Mul, [WRITE, READ, READ] groups [FLOAT];
        FdivD => "fdiv.d", Operation::Div, [WRITE, READ, READ] groups [FLOAT];
        FmvXW => "fmv.x.w", Operation::Move, [WRITE, READ] groups [FLOAT];
        FmvWX => "fmv.w.x", Operation::Move, [WRITE, READ] groups [FLOAT];
        FmvXD => "fmv.x.d", Operation::Move, [WRITE, READ] groups [FLOAT];
        FmvDX => "fmv.d.x", Operation::Move, [WRITE, READ] groups [FLOAT];

        // C
        CAddi4spn => "c.addi4spn", Operation::Add, [WRITE, READ, READ];
        CFld => "c.fld", Operation::Load, [WRITE, READ] groups [FLOAT];
        CLw => "c.lw", Operation::Load, [WRITE, READ];
        CLd => "c.ld", Operation::Load, [WRITE, READ];
        CFlw => "c.flw", Operation::Load, [WRITE, READ] groups [FLOAT];
        CFsd => "c.fsd", Operation::Store, [READ, WRITE] groups [FLOAT];
        CSw => "c.sw", Operation::Store, [READ, WRITE];
        CSd => "c.sd", Operation::Store, [READ, WRITE];
        CFsw => "c.fsw", Operation::Store, [READ, WRITE] groups [FLOAT];
        CNop => "c.nop", Operation::Nop, [];
        CAddi => "c.addi", Operation::Add, [READ_WRITE, READ];
        CAddiw => "c.addiw", Operation::Add, [READ_WRITE, READ];
        CJal => "c.jal", Operation::Call, [READ] writes [RA] groups [CALL, BRANCH_RELATIVE];
        CLi => "c.li", Operation::Move, [WRITE, READ];
        CAddi16sp => "c.addi16sp", Operation::Add, [READ_WRITE, READ];
        CLui => "c.lui", Operation::Move, [WRITE, READ];
        CSrli => "c.srli", Operation::Shr, [READ_WRITE, READ];
        CSrai => "c.srai", Operation::Sar, [READ_WRITE, READ];
        CAndi => "c.andi", Operation::And, [READ_WRITE, READ];
        CSub => "c.sub", Operation::Sub, [READ_WRITE, READ];
        CXor => "c.xor", Operation::Xor, [READ_WRITE, READ];
        COr => "c.or", Operation::Or, [READ_WRITE, READ];
        CAnd => "c.and", Operation::And, [READ_WRITE, READ];
        CSubw => "c.subw", Operation::Sub, [READ_WRITE, READ];
        CAddw => "c.addw", Operation::Add, [READ_WRITE, READ];
        CJ => "c.j", Operation::Jump, [READ] groups [JUMP, BRANCH_RELATIVE];
        CBeqz => "c.beqz", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Equal;
        CBnez => "c.bnez", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond NotEqual;
        CSlli => "c.slli", Operation::Shl, [READ_WRITE, READ];
        CFldsp => "c.fldsp", Operation::Load, [WRITE, READ] groups [FLOAT];
        CLwsp => "c.lwsp", Operation::Load, [WRITE, READ];
        CLdsp => "c.ldsp", Operation::Load, [WRITE, READ];
        CFlwsp => "c.flwsp", Operation::Load, [WRITE, READ] groups [FLOAT];
        CJr => "c.jr", Operation::Jump, [READ] groups [JUMP];
        CMv => "c.mv", Operation::Move, [WRITE, READ];
        CEbreak => "c.ebreak", Operation::Interrupt, [] groups [INTERRUPT];
        CJalr => "c.jalr", Operation::Call, [READ] writes [RA] groups [CALL];
        CAdd => "c.add", Operation::Add, [READ_WRITE, READ];
        CFsdsp => "c.fsdsp", Operation::Store, [READ, WRITE] groups [FLOAT];
        CSwsp => "c.swsp", Operation::Store, [READ, WRITE];
        CSdsp => "c.sdsp", Operation::Store, [READ, WRITE];
        CFswsp => "c.fswsp", Operation::Store, [READ, WRITE] groups [FLOAT];

        // aliases
        Nop => "nop", Operation::Nop, [];
        Li => "li", Operation::Move, [WRITE, READ];
        Mv => "mv", Operation::Move, [WRITE, READ];
        Not => "not", Operation::Not, [WRITE, READ];
        Neg => "neg", Operation::Neg, [WRITE, READ];
        Negw => "negw", Operation::Neg, [WRITE, READ];
        SextW => "sext.w", Operation::Move, [WRITE, READ];
        Seqz => "seqz", Operation::Compare, [WRITE, READ];
        Snez => "snez", Operation::Compare, [WRITE, READ];
        Sltz => "sltz", Operation::Compare, [WRITE, READ];
        Sgtz => "sgtz", Operation::Compare, [WRITE, READ];
        Beqz => "beqz", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Equal;
        Bnez => "bnez", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond NotEqual;
        Blez => "blez", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond LessOrEqual;
        Bgez => "bgez", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond GreaterOrEqual;
        Bltz => "bltz", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Less;
        Bgtz => "bgtz", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Greater;
        J => "j", Operation::Jump, [READ] groups [JUMP, BRANCH_RELATIVE];
        JalRa => "jal", Operation::Call, [READ] writes [RA] groups [CALL, BRANCH_RELATIVE];
        Ret => "ret", Operation::Return, [] reads [RA] groups [RETURN];
        Jr => "jr", Operation::Jump, [READ] groups [JUMP];
        JalrRa => "jalr", Operation::Call, [READ] writes [RA] groups [CALL];
        Rdcycle => "rdcycle", Operation::SystemAccess, [WRITE];
        Rdtime => "rdtime", Operation::SystemAccess, [WRITE];
        Rdinstret => "rdinstret", Operation::SystemAccess, [WRITE];
        Csrr => "csrr", Operation::SystemAccess, [WRITE, READ];
        Csrw => "csrw", Operation::SystemAccess, [WRITE, READ];
        Csrs => "csrs", Operation::SystemAccess, [READ_WRITE, READ];
        Csrc => "csrc", Operation::SystemAccess, [READ_WRITE, READ];
        Csrwi => "csrwi", Operation::SystemAccess, [WRITE, READ];
        Csrsi => "csrsi", Operation::SystemAccess, [READ_WRITE, READ];
        Csrci => "csrci", Operation::SystemAccess, [READ_WRITE, READ];
        FenceAll => "fence", Operation::Fence, [];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_covers_every_opcode() {
        assert_eq!(OPCODE_INFO.len(), Opcode::COUNT);
        assert_eq!(OPCODE_INFO[usize::from(Opcode::FaddS.id())].mnemonic, "fadd.s");
        assert_eq!(OPCODE_INFO[usize::from(Opcode::JalRa.id())].mnemonic, "jal");
    }
}
