//! TMS320C64x opcode ids and their static descriptions.
//!
//! One opcode serves every functional unit that implements it; unit groups
//! are added per instruction from the decoded unit.

use opscope_core::Operation;

opcode_table! {
    /// TMS320C64x opcodes. Preferred aliases have ids of their own.
    pub enum Opcode in OPCODE_INFO {
        // arithmetic and logic (.L/.S/.D)
        Add => "add", Operation::Add, [READ, READ, WRITE];
        Sub => "sub", Operation::Sub, [READ, READ, WRITE];
        And => "and", Operation::And, [READ, READ, WRITE];
        Or => "or", Operation::Or, [READ, READ, WRITE];
        Xor => "xor", Operation::Xor, [READ, READ, WRITE];
        Cmpeq => "cmpeq", Operation::Compare, [READ, READ, WRITE];
        Cmpgt => "cmpgt", Operation::Compare, [READ, READ, WRITE];
        Cmplt => "cmplt", Operation::Compare, [READ, READ, WRITE];
        Abs => "abs", Operation::Other(0), [READ, WRITE];
        Shl => "shl", Operation::Shl, [READ, READ, WRITE];
        Shr => "shr", Operation::Sar, [READ, READ, WRITE];
        Shru => "shru", Operation::Shr, [READ, READ, WRITE];
        Addab => "addab", Operation::Add, [READ, READ, WRITE];
        Addah => "addah", Operation::Add, [READ, READ, WRITE];
        Addaw => "addaw", Operation::Add, [READ, READ, WRITE];
        Subab => "subab", Operation::Sub, [READ, READ, WRITE];
        Subah => "subah", Operation::Sub, [READ, READ, WRITE];
        Subaw => "subaw", Operation::Sub, [READ, READ, WRITE];

        // multiplies (.M)
        Mpy => "mpy", Operation::Mul, [READ, READ, WRITE];
        Mpyh => "mpyh", Operation::Mul, [READ, READ, WRITE];
        Mpyhl => "mpyhl", Operation::Mul, [READ, READ, WRITE];
        Mpylh => "mpylh", Operation::Mul, [READ, READ, WRITE];
        Mpyu => "mpyu", Operation::Mul, [READ, READ, WRITE];
        Smpy => "smpy", Operation::Mul, [READ, READ, WRITE];

        // constants
        Mvk => "mvk", Operation::Move, [READ, WRITE];
        Mvkh => "mvkh", Operation::Move, [READ, READ_WRITE];
        Addk => "addk", Operation::Add, [READ, READ_WRITE];

        // control
        B => "b", Operation::Jump, [READ] groups [JUMP, BRANCH_RELATIVE];
        BReg => "b", Operation::Jump, [READ] groups [JUMP];
        BReturn => "b", Operation::Return, [READ] groups [JUMP, RETURN];
        Mvc => "mvc", Operation::SystemAccess, [READ, WRITE];
        Nop => "nop", Operation::Nop, [READ];
        Idle => "idle", Operation::Halt, [];

        // loads and stores (.D)
        Ldb => "ldb", Operation::Load, [READ, WRITE];
        Ldbu => "ldbu", Operation::Load, [READ, WRITE];
        Ldh => "ldh", Operation::Load, [READ, WRITE];
        Ldhu => "ldhu", Operation::Load, [READ, WRITE];
        Ldw => "ldw", Operation::Load, [READ, WRITE];
        Ldnw => "ldnw", Operation::Load, [READ, WRITE];
        Lddw => "lddw", Operation::Load, [READ, WRITE];
        Ldndw => "ldndw", Operation::Load, [READ, WRITE];
        Stb => "stb", Operation::Store, [READ, WRITE];
        Sth => "sth", Operation::Store, [READ, WRITE];
        Stw => "stw", Operation::Store, [READ, WRITE];
        Stnw => "stnw", Operation::Store, [READ, WRITE];
        Stdw => "stdw", Operation::Store, [READ, WRITE];
        Stndw => "stndw", Operation::Store, [READ, WRITE];

        // aliases
        Mv => "mv", Operation::Move, [READ, WRITE];
        Neg => "neg", Operation::Neg, [READ, WRITE];
        Not => "not", Operation::Not, [READ, WRITE];
        Zero => "zero", Operation::Move, [WRITE];
        NopOne => "nop", Operation::Nop, [];
    }
}
