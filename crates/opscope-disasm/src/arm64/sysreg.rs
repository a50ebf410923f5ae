//! MRS/MSR system register names.

use std::borrow::Cow;

use opscope_core::SystemRegister;

/// Known registers by their `op0:op1:CRn:CRm:op2` encoding.
const SYSTEM_REGISTERS: &[(u32, &str)] = &[
    (0xc000, "midr_el1"),
    (0xc005, "mpidr_el1"),
    (0xc080, "sctlr_el1"),
    (0xc100, "ttbr0_el1"),
    (0xc200, "spsr_el1"),
    (0xc201, "elr_el1"),
    (0xc210, "spsel"),
    (0xc212, "currentel"),
    (0xc290, "esr_el1"),
    (0xc600, "vbar_el1"),
    (0xc684, "tpidr_el1"),
    (0xd801, "ctr_el0"),
    (0xda10, "nzcv"),
    (0xda11, "daif"),
    (0xda20, "fpcr"),
    (0xda21, "fpsr"),
    (0xde82, "tpidr_el0"),
    (0xdf02, "cntvct_el0"),
];

/// Names a system register; unknown encodings use the generic
/// `s<op0>_<op1>_c<n>_c<m>_<op2>` form.
pub(crate) fn system_register(encoding: u32) -> SystemRegister {
    let name = match SYSTEM_REGISTERS.iter().find(|(enc, _)| *enc == encoding) {
        Some((_, name)) => Cow::Borrowed(*name),
        None => Cow::Owned(format!(
            "s{}_{}_c{}_c{}_{}",
            (encoding >> 14) & 0x3,
            (encoding >> 11) & 0x7,
            (encoding >> 7) & 0xf,
            (encoding >> 3) & 0xf,
            encoding & 0x7
        )),
    };
    SystemRegister { encoding, name }
}
