//! # opscope-disasm
//!
//! Table-driven instruction decoders for opscope.
//!
//! Every backend is an [`engine::Isa`] plugged into the shared
//! [`engine::Engine`]: decode tables built once at first use, operand
//! decoders, alias rules and a printer. Backends:
//! - ARM64 (AArch64)
//! - RISC-V (RV64/RV32 with M, F, D, Zicsr and C)
//! - TMS320C64x

#[macro_use]
mod macros;

pub mod engine;
pub mod error;
pub mod options;
pub mod traits;

#[cfg(feature = "arm64")]
pub mod arm64;

#[cfg(feature = "riscv")]
pub mod riscv;

#[cfg(feature = "tms320c64x")]
pub mod tms320c64x;

pub use engine::Engine;
pub use error::{DecodeError, OperandError, TableError};
pub use options::{DisassemblerOptions, Features};
pub use traits::{DecodeStatus, DecodedInstruction, Disassembler, Instructions};

#[cfg(feature = "arm64")]
pub use arm64::Arm64Disassembler;

#[cfg(feature = "riscv")]
pub use riscv::RiscVDisassembler;

#[cfg(feature = "tms320c64x")]
pub use tms320c64x::Tms320C64xDisassembler;
