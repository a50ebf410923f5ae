//! RISC-V register files for both XLENs.

use opscope_core::register::riscv::F0;
use opscope_core::{Architecture, Register, RegisterClass};

use super::Xlen;
use crate::engine::registers::sequential;
use crate::engine::RegisterTable;

static X64_REGS: [Option<Register>; 32] =
    sequential::<32>(Architecture::RiscV64, RegisterClass::General, 0, 64);
static X32_REGS: [Option<Register>; 32] =
    sequential::<32>(Architecture::RiscV32, RegisterClass::General, 0, 32);
static F64_REGS: [Option<Register>; 32] =
    sequential::<32>(Architecture::RiscV64, RegisterClass::FloatingPoint, F0, 64);
static F32_REGS: [Option<Register>; 32] =
    sequential::<32>(Architecture::RiscV32, RegisterClass::FloatingPoint, F0, 64);

// x8-x15 and f8-f15, reachable from the 3-bit fields of compressed forms
static CX64_REGS: [Option<Register>; 8] =
    sequential::<8>(Architecture::RiscV64, RegisterClass::General, 8, 64);
static CX32_REGS: [Option<Register>; 8] =
    sequential::<8>(Architecture::RiscV32, RegisterClass::General, 8, 32);
static CF64_REGS: [Option<Register>; 8] =
    sequential::<8>(Architecture::RiscV64, RegisterClass::FloatingPoint, F0 + 8, 64);
static CF32_REGS: [Option<Register>; 8] =
    sequential::<8>(Architecture::RiscV32, RegisterClass::FloatingPoint, F0 + 8, 64);

static X64: RegisterTable = RegisterTable::new("x", &X64_REGS);
static X32: RegisterTable = RegisterTable::new("x", &X32_REGS);
static F64: RegisterTable = RegisterTable::new("f", &F64_REGS);
static F32: RegisterTable = RegisterTable::new("f", &F32_REGS);
static CX64: RegisterTable = RegisterTable::new("x'", &CX64_REGS);
static CX32: RegisterTable = RegisterTable::new("x'", &CX32_REGS);
static CF64: RegisterTable = RegisterTable::new("f'", &CF64_REGS);
static CF32: RegisterTable = RegisterTable::new("f'", &CF32_REGS);

/// Register files of one XLEN.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Files {
    pub gpr: &'static RegisterTable,
    pub fpr: &'static RegisterTable,
    /// `x8`-`x15` by 3-bit field.
    pub gpr_c: &'static RegisterTable,
    pub fpr_c: &'static RegisterTable,
}

pub(crate) fn files(xlen: Xlen) -> Files {
    match xlen {
        Xlen::Rv64 => Files {
            gpr: &X64,
            fpr: &F64,
            gpr_c: &CX64,
            fpr_c: &CF64,
        },
        Xlen::Rv32 => Files {
            gpr: &X32,
            fpr: &F32,
            gpr_c: &CX32,
            fpr_c: &CF32,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_names() {
        let rv64 = files(Xlen::Rv64);
        assert_eq!(rv64.gpr.resolve(0).map(|r| r.name()), Some("zero"));
        assert_eq!(rv64.gpr.resolve(10).map(|r| r.name()), Some("a0"));
        assert_eq!(rv64.fpr.resolve(11).map(|r| r.name()), Some("fa1"));
        assert_eq!(rv64.gpr_c.resolve(0).map(|r| r.name()), Some("s0"));
        assert_eq!(rv64.gpr_c.resolve(8), None);
        assert_eq!(rv64.fpr_c.resolve(2).map(|r| r.name()), Some("fa0"));
    }

    #[test]
    fn test_xlen_sizes() {
        let rv32 = files(Xlen::Rv32);
        let a0 = rv32.gpr.resolve(10).unwrap();
        assert_eq!(a0.size, 32);
        assert_eq!(a0.arch, Architecture::RiscV32);
        assert_eq!(files(Xlen::Rv64).gpr.resolve(10).unwrap().size, 64);
    }
}
