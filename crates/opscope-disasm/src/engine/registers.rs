//! Register class resolution.

use opscope_core::{Architecture, Register, RegisterClass};

/// Maps raw register encodings of one class to registers.
///
/// Entries set to `None` are invalid encodings.
#[derive(Debug)]
pub struct RegisterTable {
    name: &'static str,
    entries: &'static [Option<Register>],
}

impl RegisterTable {
    pub const fn new(name: &'static str, entries: &'static [Option<Register>]) -> Self {
        Self { name, entries }
    }

    /// Class name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of encodings (valid or not) the table covers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `raw`; out-of-range and invalid encodings give `None`.
    pub fn resolve(&self, raw: u64) -> Option<Register> {
        let index = usize::try_from(raw).ok()?;
        self.entries.get(index).copied().flatten()
    }
}

/// Two register files selected by a side bit.
#[derive(Debug)]
pub struct BankedRegisters {
    banks: [&'static RegisterTable; 2],
}

impl BankedRegisters {
    pub const fn new(side1: &'static RegisterTable, side2: &'static RegisterTable) -> Self {
        Self {
            banks: [side1, side2],
        }
    }

    /// Register file for `side` (0 or 1).
    pub fn bank(&self, side: u64) -> Option<&'static RegisterTable> {
        usize::try_from(side)
            .ok()
            .and_then(|s| self.banks.get(s))
            .copied()
    }

    pub fn resolve(&self, side: u64, raw: u64) -> Option<Register> {
        self.bank(side)?.resolve(raw)
    }

    /// Resolves `raw` in the opposite file when `cross` is set.
    pub fn resolve_crossed(&self, side: u64, cross: bool, raw: u64) -> Option<Register> {
        self.resolve(side ^ u64::from(cross), raw)
    }
}

/// Builds `N` consecutive registers starting at id `first`.
pub const fn sequential<const N: usize>(
    arch: Architecture,
    class: RegisterClass,
    first: u16,
    size: u16,
) -> [Option<Register>; N] {
    let mut out = [None; N];
    let mut i = 0;
    while i < N {
        out[i] = Some(Register::new(arch, class, first + i as u16, size));
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    static FOUR: [Option<Register>; 4] =
        sequential::<4>(Architecture::Tms320C64x, RegisterClass::General, 0, 32);
    static HOLES: [Option<Register>; 3] = [
        Some(Register::new(Architecture::Tms320C64x, RegisterClass::Control, 64, 32)),
        None,
        Some(Register::new(Architecture::Tms320C64x, RegisterClass::Control, 66, 32)),
    ];
    static SIDE_A: RegisterTable = RegisterTable::new("a", &FOUR);
    static SIDE_B: RegisterTable = RegisterTable::new("b", &HOLES);

    #[test]
    fn test_resolve_bounds() {
        assert_eq!(SIDE_A.len(), 4);
        assert_eq!(SIDE_A.resolve(3).map(|r| r.id), Some(3));
        assert_eq!(SIDE_A.resolve(4), None);
        assert_eq!(SIDE_A.resolve(u64::MAX), None);
        assert_eq!(SIDE_B.resolve(1), None);
    }

    #[test]
    fn test_banked_crossing() {
        let banks = BankedRegisters::new(&SIDE_A, &SIDE_B);
        assert_eq!(banks.resolve(0, 2).map(|r| r.id), Some(2));
        assert_eq!(banks.resolve_crossed(0, true, 2).map(|r| r.id), Some(66));
        assert_eq!(banks.resolve_crossed(1, true, 2).map(|r| r.id), Some(2));
        assert_eq!(banks.resolve(2, 0), None);
    }
}
