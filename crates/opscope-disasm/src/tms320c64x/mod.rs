//! TMS320C64x instruction decoder.
//!
//! Fixed 32-bit big-endian instructions, each with an execution predicate
//! (`creg`/`z`), a side bit and a parallel bit. This backend covers:
//! - .L, .S and .M arithmetic, logic, compares, shifts and multiplies
//! - .D address arithmetic and loads/stores in all addressing modes,
//!   including the 15-bit B14/B15 form and doubleword pairs
//! - MVK/MVKH/ADDK, NOP/IDLE, MVC and the branch forms
//!
//! The cross path (`x`) only ever redirects `src2` to the other register
//! file.

mod aliases;
mod decoders;
pub mod opcodes;
mod printer;
mod registers;
mod tables;

use opscope_core::{ArchDetail, Architecture, Detail};

use crate::engine::{
    AliasRule, Canonical, DecodeTable, Engine, Isa, OpcodeInfo, OperandContext, Rendering,
    WidthRule,
};
use crate::error::OperandError;
use crate::options::{DisassemblerOptions, Features};

pub use opcodes::Opcode;

use decoders::Dec;
use opcodes::OPCODE_INFO;

/// The TMS320C64x instruction set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tms320C64x;

/// TMS320C64x disassembler.
pub type Tms320C64xDisassembler = Engine<Tms320C64x>;

impl Engine<Tms320C64x> {
    /// Creates a new TMS320C64x disassembler with default options.
    pub fn new() -> Self {
        Self::with_options(DisassemblerOptions::default())
    }

    pub fn with_options(options: DisassemblerOptions) -> Self {
        Engine::from_isa(Tms320C64x, options)
    }
}

impl Default for Engine<Tms320C64x> {
    fn default() -> Self {
        Self::new()
    }
}

impl Isa for Tms320C64x {
    fn architecture(&self) -> Architecture {
        Architecture::Tms320C64x
    }

    fn width_rule(&self) -> WidthRule {
        WidthRule::Fixed(4)
    }

    fn table(&self, size: usize) -> Option<&'static DecodeTable> {
        (size == 4).then(tables::decode_table)
    }

    // no optional extensions
    fn check_predicate(&self, _index: u16, _features: Features) -> bool {
        false
    }

    fn decode_operands(
        &self,
        decoder: u16,
        ctx: &mut OperandContext<'_>,
    ) -> Result<(), OperandError> {
        let dec = Dec::from_id(decoder).ok_or(OperandError::UnknownDecoder(decoder))?;
        decoders::decode(dec, ctx)
    }

    fn opcode_info(&self, opcode: u16) -> Option<&'static OpcodeInfo> {
        OPCODE_INFO.get(usize::from(opcode))
    }

    fn aliases(&self) -> &'static [AliasRule] {
        aliases::ALIASES
    }

    fn render(
        &self,
        canonical: &Canonical,
        arch: &ArchDetail,
        options: &DisassemblerOptions,
    ) -> Rendering {
        printer::render(canonical, arch, options)
    }

    fn skip_data_size(&self, _features: Features) -> usize {
        4
    }

    fn finish_detail(&self, detail: &mut Detail) {
        if let ArchDetail::Tms320C64x(tms) = &detail.arch {
            detail.groups |= tms.unit.group();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeError, DecodeStatus, Disassembler};
    use opscope_core::register::tms320c64x::B0;
    use opscope_core::{
        Condition, ControlFlow, FunctionalUnit, Groups, Operand, Register, RegisterClass,
    };

    fn decode_at(word: u32, address: u64) -> crate::DecodedInstruction {
        Tms320C64xDisassembler::new()
            .decode_instruction(&word.to_be_bytes(), address)
            .unwrap()
    }

    fn text(word: u32) -> String {
        decode_at(word, 0x1000).instruction.text()
    }

    fn fails(word: u32) -> bool {
        Tms320C64xDisassembler::new()
            .decode_instruction(&word.to_be_bytes(), 0)
            .is_err()
    }

    #[test]
    fn test_l_unit() {
        assert_eq!(text(0x01882078), "add .L1 a1, a2, a3");
        assert_eq!(text(0x01883078), "add .L1X a1, b2, a3");
        assert_eq!(text(0x01880058), "mv .L1 a2, a3");
    }

    #[test]
    fn test_long_destination() {
        assert_eq!(text(0x02082478), "add .L1 a1, a2, a5:a4");
        // odd pair
        assert!(fails(0x02882478));
    }

    #[test]
    fn test_predicates() {
        assert_eq!(text(0x31882078), "[!b0] add .L1 a1, a2, a3");
        assert!(fails(0xe1882078));
        // creg 000 with z set
        assert!(fails(0x11882078));
    }

    #[test]
    fn test_s_unit_and_constants() {
        assert_eq!(text(0x018821e2), "add .S2 b1, b2, b3");
        assert_eq!(text(0x02091a28), "mvk .S1 4660, a4");
        assert_eq!(text(0x02091a68), "mvkh .S1 0x12340000, a4");
    }

    #[test]
    fn test_branch_displacement() {
        // relative to the 32-byte fetch packet
        for address in [0x1000, 0x1004] {
            let b = decode_at(0x00000190, address);
            assert_eq!(b.instruction.text(), "b .S1 0x100c");
            assert_eq!(
                b.instruction.control_flow,
                ControlFlow::UnconditionalBranch { target: 0x100c }
            );
        }
    }

    #[test]
    fn test_conditional_branch() {
        // [b0] b .S1
        let b = decode_at(0x20000190, 0x1000);
        assert_eq!(b.instruction.text(), "[b0] b .S1 0x100c");
        assert_eq!(
            b.instruction.control_flow,
            ControlFlow::ConditionalBranch {
                target: 0x100c,
                condition: Condition::NotEqual,
                fallthrough: 0x1004
            }
        );
    }

    #[test]
    fn test_register_branches() {
        assert_eq!(text(0x000c0362), "b .S2 b3");
        let irp = decode_at(0x001800e2, 0);
        assert_eq!(irp.instruction.text(), "b .S2 irp");
        assert!(irp.instruction.is_return());
        assert_eq!(text(0x001c00e2), "b .S2 nrp");
    }

    #[test]
    fn test_mvc() {
        assert_eq!(text(0x001003a2), "mvc .S2 b4, amr");
        assert_eq!(text(0x020003e2), "mvc .S2 amr, b4");
        // .S1 has no MVC
        assert!(fails(0x001003a0));
    }

    #[test]
    fn test_nop_and_idle() {
        assert_eq!(text(0x00004000), "nop 3");
        assert_eq!(text(0x00000000), "nop");
        assert_eq!(text(0x0001e000), "idle");
        // nop 10 and above is reserved
        assert!(fails(0x00012000));
    }

    #[test]
    fn test_loads_and_stores() {
        assert_eq!(text(0x02906264), "ldw .D1T1 *+a4[3], a5");
        assert_eq!(text(0x029036f6), "stw .D2T2 b5, *b4++[1]");
        assert_eq!(text(0x03102364), "lddw .D1T1 *+a4[1], a7:a6");
        assert_eq!(text(0x0290c864), "ldw .D1T1 *-a4[a6], a5");
        assert_eq!(text(0x02800a6c), "ldw .D2T1 *+b14[10], a5");
        // mode 2 is reserved
        assert!(fails(0x02906464));
    }

    #[test]
    fn test_m_and_d_units() {
        assert_eq!(text(0x01882c80), "mpy .M1 a1, a2, a3");
        assert_eq!(text(0x01882840), "add .D1 a2, a1, a3");
    }

    #[test]
    fn test_big_endian_words() {
        let add = Tms320C64xDisassembler::new()
            .decode_instruction(&[0x01, 0x88, 0x20, 0x78], 0)
            .unwrap();
        assert_eq!(add.instruction.mnemonic, "add");
        let err = Tms320C64xDisassembler::new()
            .decode_instruction(&[0x01, 0x88], 0)
            .unwrap_err();
        assert_eq!(err, DecodeError::insufficient_input(0, 4, 2));
    }

    #[test]
    fn test_abs_soft_fail() {
        let abs = decode_at(0x01880358, 0);
        assert_eq!(abs.instruction.text(), "abs .L1 a2, a3");
        assert_eq!(abs.status, DecodeStatus::Success);
        // nonzero src1 field
        let abs = decode_at(0x01882358, 0);
        assert_eq!(abs.status, DecodeStatus::SoftFail);
    }

    #[test]
    fn test_detail() {
        let disasm =
            Tms320C64xDisassembler::with_options(DisassemblerOptions::new().with_detail(true));
        let add = disasm
            .decode_instruction(&0x31883079u32.to_be_bytes(), 0)
            .unwrap()
            .instruction;
        let detail = add.detail.as_ref().unwrap();
        let ArchDetail::Tms320C64x(tms) = &detail.arch else {
            panic!("expected tms320c64x detail");
        };
        assert_eq!(tms.unit, FunctionalUnit::L);
        assert_eq!(tms.side, 1);
        assert!(tms.cross_path);
        assert!(tms.parallel);
        assert!(detail.in_group(Groups::UNIT_L));
        let b0 = Register::new(Architecture::Tms320C64x, RegisterClass::General, B0, 32);
        assert!(detail.reads_register(b0));
        assert_eq!(add.text(), "[!b0] add .L1X a1, b2, a3 ||");

        let ldw = disasm
            .decode_instruction(&0x029036f6u32.to_be_bytes(), 0)
            .unwrap()
            .instruction;
        let detail = ldw.detail.unwrap();
        assert!(detail.in_group(Groups::UNIT_D));
        let (_, writes) = detail.regs_access();
        assert!(writes.iter().any(|r| r.name() == "b4"));
        assert!(matches!(ldw.operands[1], Operand::Memory(_)));

        let nop = disasm
            .decode_instruction(&0x00004000u32.to_be_bytes(), 0)
            .unwrap()
            .instruction;
        assert_eq!(nop.detail.unwrap().group_names(), vec!["funit_no"]);
    }
}
