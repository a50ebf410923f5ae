//! AArch64 opcode ids and their static descriptions.
//!
//! Operand order in the access lists follows the decoded (or aliased)
//! operand order.

use opscope_core::register::arm64::{NZCV as NZCV_ID, X30};
use opscope_core::{Architecture, Operation, Register, RegisterClass};

pub(crate) const NZCV: Register =
    Register::new(Architecture::Arm64, RegisterClass::Flags, NZCV_ID, 32);
pub(crate) const LR: Register = Register::new(Architecture::Arm64, RegisterClass::General, X30, 64);

opcode_table! {
    /// AArch64 opcodes. Preferred aliases have ids of their own.
    pub enum Opcode in OPCODE_INFO {
        // data processing, immediate
        Adr => "adr", Operation::LoadEffectiveAddress, [WRITE, READ];
        Adrp => "adrp", Operation::LoadEffectiveAddress, [WRITE, READ];
        AddImm => "add", Operation::Add, [WRITE, READ, READ, READ];
        AddsImm => "adds", Operation::Add, [WRITE, READ, READ, READ] writes [NZCV];
        SubImm => "sub", Operation::Sub, [WRITE, READ, READ, READ];
        SubsImm => "subs", Operation::Sub, [WRITE, READ, READ, READ] writes [NZCV];
        AndImm => "and", Operation::And, [WRITE, READ, READ];
        OrrImm => "orr", Operation::Or, [WRITE, READ, READ];
        EorImm => "eor", Operation::Xor, [WRITE, READ, READ];
        AndsImm => "ands", Operation::And, [WRITE, READ, READ] writes [NZCV];
        Movz => "movz", Operation::Move, [WRITE, READ, READ];
        Movn => "movn", Operation::Move, [WRITE, READ, READ];
        Movk => "movk", Operation::Move, [READ_WRITE, READ, READ];
        Sbfm => "sbfm", Operation::BitField, [WRITE, READ, READ, READ];
        Bfm => "bfm", Operation::BitField, [READ_WRITE, READ, READ, READ];
        Ubfm => "ubfm", Operation::BitField, [WRITE, READ, READ, READ];
        Extr => "extr", Operation::BitField, [WRITE, READ, READ, READ];

        // branches, exceptions and system
        B => "b", Operation::Jump, [READ] groups [JUMP, BRANCH_RELATIVE];
        Bl => "bl", Operation::Call, [READ] writes [LR] groups [CALL, BRANCH_RELATIVE];
        BEq => "b.eq", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Equal;
        BNe => "b.ne", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond NotEqual;
        BHs => "b.hs", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond AboveOrEqual;
        BLo => "b.lo", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Below;
        BMi => "b.mi", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Sign;
        BPl => "b.pl", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond NotSign;
        BVs => "b.vs", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Overflow;
        BVc => "b.vc", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond NotOverflow;
        BHi => "b.hi", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Above;
        BLs => "b.ls", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond BelowOrEqual;
        BGe => "b.ge", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond GreaterOrEqual;
        BLt => "b.lt", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Less;
        BGt => "b.gt", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond Greater;
        BLe => "b.le", Operation::ConditionalJump, [READ] reads [NZCV] groups [JUMP, BRANCH_RELATIVE] cond LessOrEqual;
        BAl => "b.al", Operation::ConditionalJump, [READ] groups [JUMP, BRANCH_RELATIVE] cond Always;
        BNv => "b.nv", Operation::ConditionalJump, [READ] groups [JUMP, BRANCH_RELATIVE] cond Never;
        Cbz => "cbz", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Equal;
        Cbnz => "cbnz", Operation::ConditionalJump, [READ, READ] groups [JUMP, BRANCH_RELATIVE] cond NotEqual;
        Tbz => "tbz", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond Equal;
        Tbnz => "tbnz", Operation::ConditionalJump, [READ, READ, READ] groups [JUMP, BRANCH_RELATIVE] cond NotEqual;
        Br => "br", Operation::Jump, [READ] groups [JUMP];
        Blr => "blr", Operation::Call, [READ] writes [LR] groups [CALL];
        Ret => "ret", Operation::Return, [READ] groups [RETURN];
        Eret => "eret", Operation::Return, [] groups [RETURN, PRIVILEGE];
        Svc => "svc", Operation::Syscall, [READ] groups [INTERRUPT];
        Hvc => "hvc", Operation::Syscall, [READ] groups [INTERRUPT, PRIVILEGE];
        Smc => "smc", Operation::Syscall, [READ] groups [INTERRUPT, PRIVILEGE];
        Brk => "brk", Operation::Interrupt, [READ] groups [INTERRUPT];
        Hlt => "hlt", Operation::Halt, [READ] groups [INTERRUPT];
        Hint => "hint", Operation::Nop, [READ];
        Mrs => "mrs", Operation::SystemAccess, [WRITE, READ];
        Msr => "msr", Operation::SystemAccess, [WRITE, READ];

        // loads and stores
        Strb => "strb", Operation::Store, [READ, WRITE];
        Ldrb => "ldrb", Operation::Load, [WRITE, READ];
        Strh => "strh", Operation::Store, [READ, WRITE];
        Ldrh => "ldrh", Operation::Load, [WRITE, READ];
        Str => "str", Operation::Store, [READ, WRITE];
        Ldr => "ldr", Operation::Load, [WRITE, READ];
        Ldrsw => "ldrsw", Operation::Load, [WRITE, READ];
        Stp => "stp", Operation::Store, [READ, READ, WRITE];
        Ldp => "ldp", Operation::Load, [WRITE, WRITE, READ];
        Ldxr => "ldxr", Operation::Load, [WRITE, READ];
        Ldaxr => "ldaxr", Operation::Load, [WRITE, READ];
        Ldar => "ldar", Operation::Load, [WRITE, READ];
        Stxr => "stxr", Operation::Store, [WRITE, READ, WRITE];
        Stlxr => "stlxr", Operation::Store, [WRITE, READ, WRITE];
        Stlr => "stlr", Operation::Store, [READ, WRITE];
        Ld1 => "ld1", Operation::Load, [WRITE, READ] groups [VECTOR];
        St1 => "st1", Operation::Store, [READ, WRITE] groups [VECTOR];

        // data processing, register
        AndReg => "and", Operation::And, [WRITE, READ, READ];
        BicReg => "bic", Operation::And, [WRITE, READ, READ];
        OrrReg => "orr", Operation::Or, [WRITE, READ, READ];
        OrnReg => "orn", Operation::Or, [WRITE, READ, READ];
        EorReg => "eor", Operation::Xor, [WRITE, READ, READ];
        EonReg => "eon", Operation::Xor, [WRITE, READ, READ];
        AndsReg => "ands", Operation::And, [WRITE, READ, READ] writes [NZCV];
        BicsReg => "bics", Operation::And, [WRITE, READ, READ] writes [NZCV];
        AddReg => "add", Operation::Add, [WRITE, READ, READ];
        AddsReg => "adds", Operation::Add, [WRITE, READ, READ] writes [NZCV];
        SubReg => "sub", Operation::Sub, [WRITE, READ, READ];
        SubsReg => "subs", Operation::Sub, [WRITE, READ, READ] writes [NZCV];
        Csel => "csel", Operation::Select, [WRITE, READ, READ, READ] reads [NZCV];
        Csinc => "csinc", Operation::Select, [WRITE, READ, READ, READ] reads [NZCV];
        Csinv => "csinv", Operation::Select, [WRITE, READ, READ, READ] reads [NZCV];
        Csneg => "csneg", Operation::Select, [WRITE, READ, READ, READ] reads [NZCV];
        Madd => "madd", Operation::Mul, [WRITE, READ, READ, READ];
        Msub => "msub", Operation::Mul, [WRITE, READ, READ, READ];
        Udiv => "udiv", Operation::Div, [WRITE, READ, READ];
        Sdiv => "sdiv", Operation::Div, [WRITE, READ, READ];
        Lslv => "lslv", Operation::Shl, [WRITE, READ, READ];
        Lsrv => "lsrv", Operation::Shr, [WRITE, READ, READ];
        Asrv => "asrv", Operation::Sar, [WRITE, READ, READ];
        Rorv => "rorv", Operation::Ror, [WRITE, READ, READ];

        // scalar floating point
        FmovImm => "fmov", Operation::Move, [WRITE, READ] groups [FLOAT];
        Fadd => "fadd", Operation::Add, [WRITE, READ, READ] groups [FLOAT];
        Fsub => "fsub", Operation::Sub, [WRITE, READ, READ] groups [FLOAT];
        Fmul => "fmul", Operation::Mul, [WRITE, READ, READ] groups [FLOAT];
        Fdiv => "fdiv", Operation::Div, [WRITE, READ, READ] groups [FLOAT];

        // preferred aliases
        MovSp => "mov", Operation::Move, [WRITE, READ];
        CmpImm => "cmp", Operation::Compare, [READ, READ, READ] writes [NZCV];
        CmnImm => "cmn", Operation::Compare, [READ, READ, READ] writes [NZCV];
        TstImm => "tst", Operation::Test, [READ, READ] writes [NZCV];
        MovBitmask => "mov", Operation::Move, [WRITE, READ];
        MovWide => "mov", Operation::Move, [WRITE, READ];
        MovWideNot => "mov", Operation::Move, [WRITE, READ];
        Sxtb => "sxtb", Operation::BitField, [WRITE, READ];
        Sxth => "sxth", Operation::BitField, [WRITE, READ];
        Sxtw => "sxtw", Operation::BitField, [WRITE, READ];
        Uxtb => "uxtb", Operation::BitField, [WRITE, READ];
        Uxth => "uxth", Operation::BitField, [WRITE, READ];
        LslImm => "lsl", Operation::Shl, [WRITE, READ, READ];
        LsrImm => "lsr", Operation::Shr, [WRITE, READ, READ];
        AsrImm => "asr", Operation::Sar, [WRITE, READ, READ];
        RorImm => "ror", Operation::Ror, [WRITE, READ, READ];
        Sbfiz => "sbfiz", Operation::BitField, [WRITE, READ, READ, READ];
        Sbfx => "sbfx", Operation::BitField, [WRITE, READ, READ, READ];
        Ubfiz => "ubfiz", Operation::BitField, [WRITE, READ, READ, READ];
        Ubfx => "ubfx", Operation::BitField, [WRITE, READ, READ, READ];
        Bfi => "bfi", Operation::BitField, [READ_WRITE, READ, READ, READ];
        Bfxil => "bfxil", Operation::BitField, [READ_WRITE, READ, READ, READ];
        RetLr => "ret", Operation::Return, [] reads [LR] groups [RETURN];
        Nop => "nop", Operation::Nop, [];
        Yield => "yield", Operation::Nop, [];
        Wfe => "wfe", Operation::Nop, [];
        Wfi => "wfi", Operation::Nop, [];
        Sev => "sev", Operation::Nop, [];
        Sevl => "sevl", Operation::Nop, [];
        MovReg => "mov", Operation::Move, [WRITE, READ];
        Mvn => "mvn", Operation::Not, [WRITE, READ];
        TstReg => "tst", Operation::Test, [READ, READ] writes [NZCV];
        CmpReg => "cmp", Operation::Compare, [READ, READ] writes [NZCV];
        CmnReg => "cmn", Operation::Compare, [READ, READ] writes [NZCV];
        Neg => "neg", Operation::Neg, [WRITE, READ];
        Negs => "negs", Operation::Neg, [WRITE, READ] writes [NZCV];
        Cset => "cset", Operation::Select, [WRITE, READ] reads [NZCV];
        Csetm => "csetm", Operation::Select, [WRITE, READ] reads [NZCV];
        Cinc => "cinc", Operation::Select, [WRITE, READ, READ] reads [NZCV];
        Cinv => "cinv", Operation::Select, [WRITE, READ, READ] reads [NZCV];
        Cneg => "cneg", Operation::Select, [WRITE, READ, READ] reads [NZCV];
        Mul => "mul", Operation::Mul, [WRITE, READ, READ];
        Mneg => "mneg", Operation::Mul, [WRITE, READ, READ];
        LslReg => "lsl", Operation::Shl, [WRITE, READ, READ];
        LsrReg => "lsr", Operation::Shr, [WRITE, READ, READ];
        AsrReg => "asr", Operation::Sar, [WRITE, READ, READ];
        RorReg => "ror", Operation::Ror, [WRITE, READ, READ];
    }
}
