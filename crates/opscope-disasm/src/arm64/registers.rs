//! AArch64 register files.
//!
//! Encoding 31 names the zero register in data operands and the stack
//! pointer in base/destination operands of the immediate arithmetic forms,
//! so both readings get their own table.

use opscope_core::register::arm64::{SP, V0, ZR};
use opscope_core::{Architecture, Register, RegisterClass};

use crate::engine::registers::sequential;
use crate::engine::RegisterTable;
use crate::error::OperandError;

const fn gpr(size: u16, slot31: u16, class31: RegisterClass) -> [Option<Register>; 32] {
    let mut out = sequential::<32>(Architecture::Arm64, RegisterClass::General, 0, size);
    out[31] = Some(Register::new(Architecture::Arm64, class31, slot31, size));
    out
}

const fn simd(class: RegisterClass, size: u16) -> [Option<Register>; 32] {
    sequential::<32>(Architecture::Arm64, class, V0, size)
}

static X_REGS: [Option<Register>; 32] = gpr(64, ZR, RegisterClass::General);
static W_REGS: [Option<Register>; 32] = gpr(32, ZR, RegisterClass::General);
static XSP_REGS: [Option<Register>; 32] = gpr(64, SP, RegisterClass::StackPointer);
static WSP_REGS: [Option<Register>; 32] = gpr(32, SP, RegisterClass::StackPointer);
static H_REGS: [Option<Register>; 32] = simd(RegisterClass::FloatingPoint, 16);
static S_REGS: [Option<Register>; 32] = simd(RegisterClass::FloatingPoint, 32);
static D_REGS: [Option<Register>; 32] = simd(RegisterClass::FloatingPoint, 64);
static V_REGS: [Option<Register>; 32] = simd(RegisterClass::Vector, 128);

pub(crate) static X: RegisterTable = RegisterTable::new("x", &X_REGS);
pub(crate) static W: RegisterTable = RegisterTable::new("w", &W_REGS);
pub(crate) static XSP: RegisterTable = RegisterTable::new("x|sp", &XSP_REGS);
pub(crate) static WSP: RegisterTable = RegisterTable::new("w|wsp", &WSP_REGS);
pub(crate) static H: RegisterTable = RegisterTable::new("h", &H_REGS);
pub(crate) static S: RegisterTable = RegisterTable::new("s", &S_REGS);
pub(crate) static D: RegisterTable = RegisterTable::new("d", &D_REGS);
pub(crate) static V: RegisterTable = RegisterTable::new("v", &V_REGS);

/// General register file where 31 is the zero register.
pub(crate) fn gpr_zr(is_64bit: bool) -> &'static RegisterTable {
    if is_64bit {
        &X
    } else {
        &W
    }
}

/// General register file where 31 is the stack pointer.
pub(crate) fn gpr_sp(is_64bit: bool) -> &'static RegisterTable {
    if is_64bit {
        &XSP
    } else {
        &WSP
    }
}

/// Scalar FP register file selected by `ftype`.
pub(crate) fn fpr(ftype: u64) -> Result<&'static RegisterTable, OperandError> {
    match ftype {
        0b00 => Ok(&S),
        0b01 => Ok(&D),
        0b11 => Ok(&H),
        _ => Err(OperandError::Reserved {
            field: "ftype",
            value: ftype,
        }),
    }
}
