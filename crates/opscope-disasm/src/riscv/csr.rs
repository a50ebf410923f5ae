//! Control and status register names.

use std::borrow::Cow;

use opscope_core::SystemRegister;

pub(crate) const CYCLE: u32 = 0xc00;
pub(crate) const TIME: u32 = 0xc01;
pub(crate) const INSTRET: u32 = 0xc02;

const CSR_NAMES: &[(u32, &str)] = &[
    // floating point
    (0x001, "fflags"),
    (0x002, "frm"),
    (0x003, "fcsr"),
    // counters
    (CYCLE, "cycle"),
    (TIME, "time"),
    (INSTRET, "instret"),
    // supervisor
    (0x100, "sstatus"),
    (0x104, "sie"),
    (0x105, "stvec"),
    (0x140, "sscratch"),
    (0x141, "sepc"),
    (0x142, "scause"),
    (0x143, "stval"),
    (0x144, "sip"),
    (0x180, "satp"),
    // machine
    (0x300, "mstatus"),
    (0x301, "misa"),
    (0x304, "mie"),
    (0x305, "mtvec"),
    (0x340, "mscratch"),
    (0x341, "mepc"),
    (0x342, "mcause"),
    (0x343, "mtval"),
    (0x344, "mip"),
    (0xf14, "mhartid"),
];

/// Names a 12-bit CSR number; unknown CSRs print as hex.
pub(crate) fn csr(encoding: u32) -> SystemRegister {
    let name = CSR_NAMES
        .iter()
        .find(|(number, _)| *number == encoding)
        .map(|(_, name)| Cow::Borrowed(*name))
        .unwrap_or_else(|| Cow::Owned(format!("{encoding:#x}")));
    SystemRegister { encoding, name }
}
