//! Architecture-agnostic register representation.

use crate::Architecture;

/// Register class (general purpose, floating point, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterClass {
    /// General purpose register (x0, a0, b15, etc.)
    General,
    /// Floating point register (d0, fa0, etc.)
    FloatingPoint,
    /// Vector/SIMD register (v0, etc.)
    Vector,
    /// Control register (amr, csr, etc.)
    Control,
    /// Stack pointer (sp)
    StackPointer,
    /// Program counter / instruction pointer (pc)
    ProgramCounter,
    /// Flags / status register (nzcv)
    Flags,
    /// Other special registers
    Other,
}

/// Architecture-agnostic register representation.
///
/// Each register is identified by its architecture, class, and a numeric ID.
/// The ID is architecture-specific and should be interpreted accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Register {
    /// The architecture this register belongs to.
    pub arch: Architecture,
    /// The class of register.
    pub class: RegisterClass,
    /// Architecture-specific register ID.
    pub id: u16,
    /// Size of the register in bits.
    pub size: u16,
}

impl Register {
    /// Creates a new register.
    pub const fn new(arch: Architecture, class: RegisterClass, id: u16, size: u16) -> Self {
        Self {
            arch,
            class,
            id,
            size,
        }
    }

    /// Returns the canonical name for this register.
    pub fn name(&self) -> &'static str {
        match self.arch {
            Architecture::Arm64 => arm64_reg_name(self.id, self.size, self.class),
            Architecture::RiscV64 | Architecture::RiscV32 => riscv_reg_name(self.id),
            Architecture::Tms320C64x => tms320c64x_reg_name(self.id),
            Architecture::Unknown(_) => "unknown",
        }
    }

    /// Returns true if this register names the same storage as `other`,
    /// ignoring the access width (`w3` aliases `x3`).
    pub fn same_storage(&self, other: &Register) -> bool {
        self.arch == other.arch && self.id == other.id
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ARM64 register IDs
pub mod arm64 {
    pub const X0: u16 = 0;
    pub const X29: u16 = 29; // frame pointer
    pub const X30: u16 = 30; // link register
    /// Encoding 31 in "zero register" contexts (xzr/wzr).
    pub const ZR: u16 = 31;
    /// Encoding 31 in "stack pointer" contexts (sp/wsp).
    pub const SP: u16 = 32;
    pub const NZCV: u16 = 33;
    pub const V0: u16 = 64;
    pub const V31: u16 = 95;
}

// RISC-V register IDs (x0-x31, f0-f31)
pub mod riscv {
    pub const ZERO: u16 = 0;
    pub const RA: u16 = 1;
    pub const SP: u16 = 2;
    pub const PC: u16 = 32;
    pub const F0: u16 = 64;
    pub const F31: u16 = 95;
}

// TMS320C64x register IDs: A file, B file, then the control register space.
pub mod tms320c64x {
    pub const A0: u16 = 0;
    pub const A31: u16 = 31;
    pub const B0: u16 = 32;
    pub const B14: u16 = 46;
    pub const B15: u16 = 47;
    pub const B31: u16 = 63;
    /// First control register; control register `n` has ID `CONTROL + n`.
    pub const CONTROL: u16 = 64;
    pub const AMR: u16 = CONTROL;
    pub const CSR: u16 = CONTROL + 1;
    pub const IRP: u16 = CONTROL + 6;
    pub const NRP: u16 = CONTROL + 7;
    pub const PCE1: u16 = CONTROL + 16;
}

fn arm64_reg_name(id: u16, size: u16, class: RegisterClass) -> &'static str {
    let index = usize::from(id);
    match id {
        0..=30 => {
            if size == 32 {
                W_NAMES[index]
            } else {
                X_NAMES[index]
            }
        }
        arm64::ZR => {
            if size == 32 {
                "wzr"
            } else {
                "xzr"
            }
        }
        arm64::SP => {
            if size == 32 {
                "wsp"
            } else {
                "sp"
            }
        }
        arm64::NZCV => "nzcv",
        arm64::V0..=arm64::V31 => {
            let names = match (class, size) {
                (RegisterClass::Vector, _) => &V_NAMES,
                (_, 8) => &B_NAMES,
                (_, 16) => &H_NAMES,
                (_, 32) => &S_NAMES,
                (_, 64) => &D_NAMES,
                (_, 128) => &Q_NAMES,
                _ => return "unknown",
            };
            names[index - usize::from(arm64::V0)]
        }
        _ => "unknown",
    }
}

fn riscv_reg_name(id: u16) -> &'static str {
    match id {
        0..=31 => RISCV_X_NAMES[usize::from(id)],
        riscv::PC => "pc",
        riscv::F0..=riscv::F31 => RISCV_F_NAMES[usize::from(id - riscv::F0)],
        _ => "unknown",
    }
}

fn tms320c64x_reg_name(id: u16) -> &'static str {
    match id {
        tms320c64x::A0..=tms320c64x::A31 => TMS_A_NAMES[usize::from(id)],
        tms320c64x::B0..=tms320c64x::B31 => TMS_B_NAMES[usize::from(id - tms320c64x::B0)],
        _ => TMS_CONTROL_NAMES
            .get(usize::from(id.wrapping_sub(tms320c64x::CONTROL)))
            .copied()
            .flatten()
            .unwrap_or("unknown"),
    }
}

/// Control register names by MVC encoding; `None` marks unassigned slots.
const TMS_CONTROL_NAMES: [Option<&str>; 32] = [
    Some("amr"),
    Some("csr"),
    Some("isr"),
    Some("icr"),
    Some("ier"),
    Some("istp"),
    Some("irp"),
    Some("nrp"),
    None,
    None,
    Some("tscl"),
    Some("tsch"),
    None,
    Some("ilc"),
    Some("rilc"),
    Some("rep"),
    Some("pce1"),
    Some("dnum"),
    None,
    None,
    None,
    Some("ssr"),
    Some("gplya"),
    Some("gplyb"),
    Some("gfpgfr"),
    None,
    Some("tsr"),
    Some("itsr"),
    Some("ntsr"),
    Some("efr"),
    None,
    Some("ierr"),
];

/// Returns true if `index` is an assigned TMS320C64x control register.
pub fn tms320c64x_control_exists(index: u16) -> bool {
    TMS_CONTROL_NAMES
        .get(usize::from(index))
        .is_some_and(|name| name.is_some())
}

const X_NAMES: [&str; 31] = [
    "x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7",
    "x8", "x9", "x10", "x11", "x12", "x13", "x14", "x15",
    "x16", "x17", "x18", "x19", "x20", "x21", "x22", "x23",
    "x24", "x25", "x26", "x27", "x28", "x29", "x30",
];

const W_NAMES: [&str; 31] = [
    "w0", "w1", "w2", "w3", "w4", "w5", "w6", "w7",
    "w8", "w9", "w10", "w11", "w12", "w13", "w14", "w15",
    "w16", "w17", "w18", "w19", "w20", "w21", "w22", "w23",
    "w24", "w25", "w26", "w27", "w28", "w29", "w30",
];

const B_NAMES: [&str; 32] = [
    "b0", "b1", "b2", "b3", "b4", "b5", "b6", "b7",
    "b8", "b9", "b10", "b11", "b12", "b13", "b14", "b15",
    "b16", "b17", "b18", "b19", "b20", "b21", "b22", "b23",
    "b24", "b25", "b26", "b27", "b28", "b29", "b30", "b31",
];

const H_NAMES: [&str; 32] = [
    "h0", "h1", "h2", "h3", "h4", "h5", "h6", "h7",
    "h8", "h9", "h10", "h11", "h12", "h13", "h14", "h15",
    "h16", "h17", "h18", "h19", "h20", "h21", "h22", "h23",
    "h24", "h25", "h26", "h27", "h28", "h29", "h30", "h31",
];

const S_NAMES: [&str; 32] = [
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "s12", "s13", "s14", "s15",
    "s16", "s17", "s18", "s19", "s20", "s21", "s22", "s23",
    "s24", "s25", "s26", "s27", "s28", "s29", "s30", "s31",
];

const D_NAMES: [&str; 32] = [
    "d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7",
    "d8", "d9", "d10", "d11", "d12", "d13", "d14", "d15",
    "d16", "d17", "d18", "d19", "d20", "d21", "d22", "d23",
    "d24", "d25", "d26", "d27", "d28", "d29", "d30", "d31",
];

const Q_NAMES: [&str; 32] = [
    "q0", "q1", "q2", "q3", "q4", "q5", "q6", "q7",
    "q8", "q9", "q10", "q11", "q12", "q13", "q14", "q15",
    "q16", "q17", "q18", "q19", "q20", "q21", "q22", "q23",
    "q24", "q25", "q26", "q27", "q28", "q29", "q30", "q31",
];

const V_NAMES: [&str; 32] = [
    "v0", "v1", "v2", "v3", "v4", "v5", "v6", "v7",
    "v8", "v9", "v10", "v11", "v12", "v13", "v14", "v15",
    "v16", "v17", "v18", "v19", "v20", "v21", "v22", "v23",
    "v24", "v25", "v26", "v27", "v28", "v29", "v30", "v31",
];

const RISCV_X_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2",
    "s0", "s1", "a0", "a1", "a2", "a3", "a4", "a5",
    "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

const RISCV_F_NAMES: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7",
    "fs0", "fs1", "fa0", "fa1", "fa2", "fa3", "fa4", "fa5",
    "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7",
    "fs8", "fs9", "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

const TMS_A_NAMES: [&str; 32] = [
    "a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7",
    "a8", "a9", "a10", "a11", "a12", "a13", "a14", "a15",
    "a16", "a17", "a18", "a19", "a20", "a21", "a22", "a23",
    "a24", "a25", "a26", "a27", "a28", "a29", "a30", "a31",
];

const TMS_B_NAMES: [&str; 32] = [
    "b0", "b1", "b2", "b3", "b4", "b5", "b6", "b7",
    "b8", "b9", "b10", "b11", "b12", "b13", "b14", "b15",
    "b16", "b17", "b18", "b19", "b20", "b21", "b22", "b23",
    "b24", "b25", "b26", "b27", "b28", "b29", "b30", "b31",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm64_names() {
        let x3 = Register::new(Architecture::Arm64, RegisterClass::General, 3, 64);
        let w3 = Register::new(Architecture::Arm64, RegisterClass::General, 3, 32);
        let zr = Register::new(Architecture::Arm64, RegisterClass::General, arm64::ZR, 32);
        let sp = Register::new(Architecture::Arm64, RegisterClass::StackPointer, arm64::SP, 64);
        assert_eq!(x3.name(), "x3");
        assert_eq!(w3.name(), "w3");
        assert_eq!(zr.name(), "wzr");
        assert_eq!(sp.name(), "sp");
        assert!(x3.same_storage(&w3));
    }

    #[test]
    fn test_arm64_vector_names() {
        let d7 = Register::new(Architecture::Arm64, RegisterClass::FloatingPoint, arm64::V0 + 7, 64);
        let v31 = Register::new(Architecture::Arm64, RegisterClass::Vector, arm64::V31, 128);
        let q2 = Register::new(Architecture::Arm64, RegisterClass::FloatingPoint, arm64::V0 + 2, 128);
        assert_eq!(d7.name(), "d7");
        assert_eq!(v31.name(), "v31");
        assert_eq!(q2.name(), "q2");
    }

    #[test]
    fn test_riscv_names() {
        let a0 = Register::new(Architecture::RiscV64, RegisterClass::General, 10, 64);
        let fa1 = Register::new(Architecture::RiscV64, RegisterClass::FloatingPoint, riscv::F0 + 11, 64);
        assert_eq!(a0.name(), "a0");
        assert_eq!(fa1.name(), "fa1");
        assert_eq!(
            Register::new(Architecture::RiscV32, RegisterClass::Other, 99, 32).name(),
            "unknown"
        );
    }

    #[test]
    fn test_tms320c64x_names() {
        let b15 = Register::new(Architecture::Tms320C64x, RegisterClass::General, tms320c64x::B15, 32);
        let pce1 = Register::new(Architecture::Tms320C64x, RegisterClass::Control, tms320c64x::PCE1, 32);
        let hole = Register::new(Architecture::Tms320C64x, RegisterClass::Control, tms320c64x::CONTROL + 8, 32);
        assert_eq!(b15.name(), "b15");
        assert_eq!(pce1.name(), "pce1");
        assert_eq!(hole.name(), "unknown");
        assert!(tms320c64x_control_exists(31));
        assert!(!tms320c64x_control_exists(30));
        assert!(!tms320c64x_control_exists(64));
    }
}
