//! TMS320C64x register files: the A and B general files and the control
//! registers reachable through MVC.

use opscope_core::register::tms320c64x::{A0, B0, CONTROL};
use opscope_core::{Architecture, Register, RegisterClass};

use crate::engine::registers::sequential;
use crate::engine::{BankedRegisters, RegisterTable};

static A_REGS: [Option<Register>; 32] =
    sequential::<32>(Architecture::Tms320C64x, RegisterClass::General, A0, 32);
static B_REGS: [Option<Register>; 32] =
    sequential::<32>(Architecture::Tms320C64x, RegisterClass::General, B0, 32);

static A: RegisterTable = RegisterTable::new("a", &A_REGS);
static B: RegisterTable = RegisterTable::new("b", &B_REGS);

/// Side 1 is the A file, side 2 the B file.
pub(crate) static FILES: BankedRegisters = BankedRegisters::new(&A, &B);

/// Assigned control register encodings.
const ASSIGNED: [u16; 24] = [
    0, 1, 2, 3, 4, 5, 6, 7, 10, 11, 13, 14, 15, 16, 17, 21, 22, 23, 24, 26, 27, 28, 29, 31,
];

const fn control_registers() -> [Option<Register>; 32] {
    let mut out = [None; 32];
    let mut i = 0;
    while i < ASSIGNED.len() {
        let index = ASSIGNED[i];
        out[index as usize] = Some(Register::new(
            Architecture::Tms320C64x,
            RegisterClass::Control,
            CONTROL + index,
            32,
        ));
        i += 1;
    }
    out
}

static CONTROL_REGS: [Option<Register>; 32] = control_registers();

pub(crate) static CONTROL_FILE: RegisterTable = RegisterTable::new("control", &CONTROL_REGS);
