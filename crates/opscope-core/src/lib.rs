//! # opscope-core
//!
//! Core abstractions for the opscope disassembler. This crate defines
//! architecture-agnostic types for instructions, operands, registers and
//! the structured detail records produced on request.

pub mod arch;
pub mod detail;
pub mod error;
pub mod instruction;
pub mod operand;
pub mod register;

pub use arch::{Architecture, Bitness, Endianness};
pub use detail::{
    Access, ArchDetail, Arm64Detail, Detail, DetailOperand, FunctionalUnit, Groups, RiscVDetail,
    RoundingMode, TmsCondition, Tms320C64xDetail,
};
pub use error::Error;
pub use instruction::{Condition, ControlFlow, Instruction, Operation};
pub use operand::{
    Extend, Immediate, IndexMode, ListStyle, MemoryRef, Operand, OperandKind, RegisterList, Shift,
    ShiftKind, SystemRegister, VectorArrangement,
};
pub use register::{Register, RegisterClass};
