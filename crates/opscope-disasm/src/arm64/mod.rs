//! ARM64 (AArch64) instruction decoder.
//!
//! ARM64 uses fixed 32-bit little-endian instructions. This backend covers:
//! - Data processing (ADD, SUB, logical, MOVZ/MOVN/MOVK, bitfield, EXTR)
//! - Branches (B, BL, B.cond, CBZ, CBNZ, TBZ, TBNZ, BR, BLR, RET)
//! - Exceptions and system (SVC, BRK, hints, MRS, MSR)
//! - Loads and stores (LDR/STR forms, LDP/STP, exclusives, LD1/ST1)
//! - Register data processing (shifted logical/arithmetic, CSEL, MADD, DIV)
//! - Scalar floating point (FMOV immediate, FADD, FSUB, FMUL, FDIV)
//!
//! Preferred aliases (`mov`, `cmp`, `lsl`, `cset`, ...) replace the base
//! instruction when their conditions hold.

mod aliases;
mod decoders;
pub mod opcodes;
mod printer;
mod registers;
mod sysreg;
mod tables;

use opscope_core::{ArchDetail, Architecture, Detail, Groups, Operand};

use crate::engine::{
    AliasRule, Canonical, DecodeTable, Engine, Isa, OpcodeInfo, OperandContext, Rendering,
    WidthRule,
};
use crate::error::OperandError;
use crate::options::{DisassemblerOptions, Features};

pub use opcodes::Opcode;

use decoders::Dec;
use opcodes::{NZCV, OPCODE_INFO};
use tables::Pred;

/// The AArch64 instruction set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arm64;

/// ARM64 disassembler.
pub type Arm64Disassembler = Engine<Arm64>;

impl Engine<Arm64> {
    /// Creates a new ARM64 disassembler with default options.
    pub fn new() -> Self {
        Self::with_options(DisassemblerOptions::default())
    }

    pub fn with_options(options: DisassemblerOptions) -> Self {
        Engine::from_isa(Arm64, options)
    }
}

impl Default for Engine<Arm64> {
    fn default() -> Self {
        Self::new()
    }
}

impl Isa for Arm64 {
    fn architecture(&self) -> Architecture {
        Architecture::Arm64
    }

    fn width_rule(&self) -> WidthRule {
        WidthRule::Fixed(4)
    }

    fn table(&self, size: usize) -> Option<&'static DecodeTable> {
        (size == 4).then(tables::decode_table)
    }

    fn check_predicate(&self, index: u16, features: Features) -> bool {
        match Pred::from_id(index) {
            Some(Pred::Fp) => features.contains(Features::ARM64_FP),
            Some(Pred::Fp16) => features.contains(Features::ARM64_FP16),
            Some(Pred::Neon) => features.contains(Features::ARM64_NEON),
            None => false,
        }
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
        _arch: &ArchDetail,
        options: &DisassemblerOptions,
    ) -> Rendering {
        printer::render(canonical, options)
    }

    fn skip_data_size(&self, _features: Features) -> usize {
        4
    }

    fn finish_detail(&self, detail: &mut Detail) {
        let sets_flags = detail.regs_write.contains(&NZCV);
        if let ArchDetail::Arm64(arm64) = &mut detail.arch {
            arm64.update_flags = sets_flags;
        }

        // op1 = 3 registers are reachable from EL0
        let privileged = detail.operands.iter().any(|op| {
            matches!(&op.operand, Operand::SystemRegister(reg) if (reg.encoding >> 11) & 0x7 != 3)
        });
        if privileged {
            detail.groups |= Groups::PRIVILEGE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeError, Disassembler};
    use opscope_core::{Access, ControlFlow};

    fn decode(word: u32) -> crate::DecodedInstruction {
        Arm64Disassembler::new()
            .decode_instruction(&word.to_le_bytes(), 0x1000)
            .unwrap()
    }

    fn text(word: u32) -> String {
        decode(word).instruction.text()
    }

    #[test]
    fn test_nop() {
        let disasm = Arm64Disassembler::new();
        // NOP: 0xD503201F
        let bytes = [0x1F, 0x20, 0x03, 0xD5];
        let result = disasm.decode_instruction(&bytes, 0x1000).unwrap();
        assert_eq!(result.instruction.mnemonic, "nop");
        assert_eq!(result.size, 4);
    }

    #[test]
    fn test_ret() {
        let result = decode(0xd65f03c0);
        assert_eq!(result.instruction.mnemonic, "ret");
        assert_eq!(result.instruction.op_str, "");
        assert!(result.instruction.is_return());
    }

    #[test]
    fn test_bl() {
        let result = decode(0x94000040);
        assert_eq!(result.instruction.mnemonic, "bl");
        assert!(result.instruction.is_call());
        assert_eq!(
            result.instruction.control_flow,
            ControlFlow::Call {
                target: 0x1100,
                return_addr: 0x1004
            }
        );
    }

    #[test]
    fn test_arithmetic_aliases() {
        assert_eq!(text(0x91000420), "add x0, x1, #1");
        assert_eq!(text(0x910003fd), "mov x29, sp");
        assert_eq!(text(0xf100141f), "cmp x0, #5");
        assert_eq!(text(0xd2824680), "mov x0, #0x1234");
        assert_eq!(text(0xf2aacf00), "movk x0, #0x5678, lsl #16");
    }

    #[test]
    fn test_orr_immediate_mov_alias() {
        // movz could build these, so the orr form stays
        assert_eq!(text(0xb2403fe0), "orr x0, xzr, #0xffff");
        assert_eq!(text(0x32103fe0), "orr w0, wzr, #0xffff0000");
        // a replicated pattern only a bitmask immediate can express
        assert_eq!(text(0xb200f3e0), "mov x0, #0x5555555555555555");
    }

    #[test]
    fn test_bitfield_aliases() {
        assert_eq!(text(0x53007c20), "lsr w0, w1, #0");
        assert_eq!(text(0xd37df020), "lsl x0, x1, #3");
        assert_eq!(text(0x9343fc20), "asr x0, x1, #3");
        assert_eq!(text(0x93407c20), "sxtw x0, w1");
        assert_eq!(text(0x53001c20), "uxtb w0, w1");
        assert_eq!(text(0xd3442c20), "ubfx x0, x1, #4, #8");
        assert_eq!(text(0x33180c20), "bfi w0, w1, #8, #4");
        assert_eq!(text(0x92401c20), "and x0, x1, #0xff");
    }

    #[test]
    fn test_pc_relative_addresses() {
        assert_eq!(text(0x10000040), "adr x0, #0x1008");
        assert_eq!(text(0xb0000000), "adrp x0, #0x2000");
    }

    #[test]
    fn test_conditional_branches() {
        let beq = decode(0x54000040);
        assert_eq!(beq.instruction.text(), "b.eq #0x1008");
        assert_eq!(
            beq.instruction.control_flow,
            ControlFlow::ConditionalBranch {
                target: 0x1008,
                condition: opscope_core::Condition::Equal,
                fallthrough: 0x1004
            }
        );
        assert_eq!(text(0xb4000040), "cbz x0, #0x1008");
        assert_eq!(text(0x36180040), "tbz w0, #3, #0x1008");
    }

    #[test]
    fn test_loads_and_stores() {
        assert_eq!(text(0xf9400420), "ldr x0, [x1, #8]");
        assert_eq!(text(0xf8410c20), "ldr x0, [x1, #0x10]!");
        assert_eq!(text(0xf8410420), "ldr x0, [x1], #0x10");
        assert_eq!(text(0xf8627820), "ldr x0, [x1, x2, lsl #3]");
        assert_eq!(text(0xf862c820), "ldr x0, [x1, w2, sxtw]");
        assert_eq!(text(0xa9bf7bfd), "stp x29, x30, [sp, #-0x10]!");
        assert_eq!(text(0xa8c17bfd), "ldp x29, x30, [sp], #0x10");
        assert_eq!(text(0x58000040), "ldr x0, #0x1008");
    }

    #[test]
    fn test_reserved_extend_option() {
        let err = Arm64Disassembler::new()
            .decode_instruction(&0xf8620820u32.to_le_bytes(), 0)
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidOperand { .. }));
    }

    #[test]
    fn test_soft_fail() {
        let ldp = decode(0xa9400020);
        assert_eq!(ldp.instruction.text(), "ldp x0, x0, [x1]");
        assert!(ldp.is_soft_fail());

        assert!(!decode(0xc85f7c20).is_soft_fail());
        assert_eq!(text(0xc85f7c20), "ldxr x0, [x1]");
        assert!(decode(0xc8407c20).is_soft_fail());
    }

    #[test]
    fn test_vector_lists() {
        assert_eq!(text(0x4c407000), "ld1 {v0.16b}, [x0]");
        assert_eq!(text(0x4c40a83f), "ld1 {v31.4s, v0.4s}, [x1]");
    }

    #[test]
    fn test_register_aliases() {
        assert_eq!(text(0xaa0103e0), "mov x0, x1");
        assert_eq!(text(0x2a2103e0), "mvn w0, w1");
        assert_eq!(text(0xea01001f), "tst x0, x1");
        assert_eq!(text(0xeb01001f), "cmp x0, x1");
        assert_eq!(text(0xcb0103e0), "neg x0, x1");
        assert_eq!(text(0x9a820020), "csel x0, x1, x2, eq");
        assert_eq!(text(0x1a9f17e0), "cset w0, eq");
        assert_eq!(text(0x9a81a420), "cinc x0, x1, lt");
        assert_eq!(text(0x9b027c20), "mul x0, x1, x2");
        assert_eq!(text(0x9ac22020), "lsl x0, x1, x2");
    }

    #[test]
    fn test_reserved_shift() {
        let result = Arm64Disassembler::new().decode_instruction(&0x8bc20020u32.to_le_bytes(), 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_system_registers() {
        assert_eq!(text(0xd53b4200), "mrs x0, nzcv");
        assert_eq!(text(0xd53bd040), "mrs x0, tpidr_el0");
    }

    #[test]
    fn test_system_register_privilege() {
        let disasm = Arm64Disassembler::with_options(DisassemblerOptions::new().with_detail(true));
        let privileged = |word: u32| {
            disasm
                .decode_instruction(&word.to_le_bytes(), 0)
                .unwrap()
                .instruction
                .detail
                .unwrap()
                .in_group(Groups::PRIVILEGE)
        };
        // msr nzcv, x0 / msr tpidr_el0, x0 / mrs x0, tpidr_el0
        assert!(!privileged(0xd51b4200));
        assert!(!privileged(0xd51bd040));
        assert!(!privileged(0xd53bd040));
        // msr sctlr_el1, x0 / mrs x0, tpidr_el1
        assert!(privileged(0xd5181000));
        assert!(privileged(0xd538d080));
    }

    #[test]
    fn test_fadd_scalar() {
        assert_eq!(text(0x1e622820), "fadd d0, d1, d2");
        assert_eq!(text(0x1e620820), "fmul d0, d1, d2");
        assert_eq!(text(0x1e6e1000), "fmov d0, #1.00000000");
    }

    #[test]
    fn test_fp_feature_gates() {
        // half precision needs FP16
        let no_fp16 = Arm64Disassembler::with_options(
            DisassemblerOptions::default().with_features(Features::ARM64_FP),
        );
        let half = 0x1eee1000u32.to_le_bytes();
        assert!(no_fp16.decode_instruction(&half, 0).is_err());
        assert_eq!(
            Arm64Disassembler::new()
                .decode_instruction(&half, 0)
                .unwrap()
                .instruction
                .text(),
            "fmov h0, #1.00000000"
        );
        // ftype 10 is reserved
        assert!(Arm64Disassembler::new()
            .decode_instruction(&0x1eae1000u32.to_le_bytes(), 0)
            .is_err());
    }

    #[test]
    fn test_detail() {
        let disasm = Arm64Disassembler::with_options(DisassemblerOptions::new().with_detail(true));
        let cmp = disasm
            .decode_instruction(&0xf100141fu32.to_le_bytes(), 0)
            .unwrap()
            .instruction;
        let detail = cmp.detail.unwrap();
        assert!(detail.writes_register(NZCV));
        assert_eq!(detail.arch, ArchDetail::Arm64(opscope_core::Arm64Detail {
            cc: None,
            update_flags: true,
            writeback: false,
        }));
        assert_eq!(detail.operands.len(), 2);
        assert_eq!(detail.operands[0].access, Access::READ);

        let stp = disasm
            .decode_instruction(&0xa9bf7bfdu32.to_le_bytes(), 0)
            .unwrap()
            .instruction;
        let detail = stp.detail.unwrap();
        let (reads, writes) = detail.regs_access();
        assert!(reads.iter().any(|r| r.name() == "x29"));
        assert!(writes.iter().any(|r| r.name() == "sp"));
        assert!(matches!(stp.operands[2], Operand::Memory(_)));

        let bl = disasm
            .decode_instruction(&0x94000040u32.to_le_bytes(), 0)
            .unwrap()
            .instruction;
        assert!(bl.detail.unwrap().in_group(Groups::CALL));
    }

    #[test]
    fn test_unknown_opcode() {
        let err = Arm64Disassembler::new()
            .decode_instruction(&[0, 0, 0, 0], 0x40)
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownOpcode { address: 0x40, .. }));
    }
}
