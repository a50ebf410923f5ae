//! End-to-end decoding scenarios across the supported architectures.

use std::sync::Arc;
use std::thread;

use opscope_core::{Architecture, ControlFlow};
use opscope_disasm::{
    Arm64Disassembler, DecodeError, Disassembler, OperandError, RiscVDisassembler,
    Tms320C64xDisassembler,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn le_words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn be_words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn listing<D: Disassembler>(disasm: &D, bytes: &[u8], address: u64) -> Vec<String> {
    disasm
        .disassemble_block(bytes, address)
        .into_iter()
        .map(|r| match r {
            Ok(insn) => format!("{:#x}: {}", insn.address, insn.text()),
            Err(e) => format!("error: {e}"),
        })
        .collect()
}

#[test]
fn arm64_function_listing() {
    init_tracing();
    let code = le_words(&[
        0xa9bf7bfd, // stp x29, x30, [sp, #-0x10]!
        0x910003fd, // mov x29, sp
        0x91000420, // add x0, x1, #1
        0xf100141f, // cmp x0, #5
        0x54000040, // b.eq
        0xa8c17bfd, // ldp x29, x30, [sp], #0x10
        0xd65f03c0, // ret
    ]);
    assert_eq!(
        listing(&Arm64Disassembler::new(), &code, 0x1000),
        vec![
            "0x1000: stp x29, x30, [sp, #-0x10]!",
            "0x1004: mov x29, sp",
            "0x1008: add x0, x1, #1",
            "0x100c: cmp x0, #5",
            "0x1010: b.eq #0x1018",
            "0x1014: ldp x29, x30, [sp], #0x10",
            "0x1018: ret",
        ]
    );
}

#[test]
fn riscv_mixed_width_listing() {
    init_tracing();
    let mut code = Vec::new();
    code.extend_from_slice(&0x0505u16.to_le_bytes()); // c.addi a0, 1
    code.extend_from_slice(&0x00150513u32.to_le_bytes()); // addi a0, a0, 1
    code.extend_from_slice(&0x4532u16.to_le_bytes()); // c.lwsp a0, 12(sp)
    code.extend_from_slice(&0x00b50863u32.to_le_bytes()); // beq a0, a1, +16
    code.extend_from_slice(&0x00008067u32.to_le_bytes()); // ret

    let disasm = RiscVDisassembler::new();
    assert_eq!(
        listing(&disasm, &code, 0x1000),
        vec![
            "0x1000: c.addi a0, 1",
            "0x1002: addi a0, a0, 1",
            "0x1006: c.lwsp a0, 12(sp)",
            "0x1008: beq a0, a1, 0x1018",
            "0x100c: ret",
        ]
    );

    let sizes: Vec<usize> = disasm
        .iter(&code, 0x1000)
        .map(|r| r.unwrap().size)
        .collect();
    assert_eq!(sizes, vec![2, 4, 2, 4, 4]);
}

#[test]
fn tms320c64x_fetch_packet_listing() {
    init_tracing();
    let code = be_words(&[
        0x02091a28, // mvk .S1 0x1234, a4
        0x02091a68, // mvkh .S1 0x12340000, a4
        0x01882078, // add .L1 a1, a2, a3
        0x00000190, // b .S1
        0x00004000, // nop 3
        0x02906264, // ldw .D1T1 *+a4[3], a5
        0x029036f6, // stw .D2T2 b5, *b4++[1]
        0x0001e000, // idle
    ]);
    assert_eq!(
        listing(&Tms320C64xDisassembler::new(), &code, 0x2000),
        vec![
            "0x2000: mvk .S1 4660, a4",
            "0x2004: mvkh .S1 0x12340000, a4",
            "0x2008: add .L1 a1, a2, a3",
            "0x200c: b .S1 0x200c",
            "0x2010: nop 3",
            "0x2014: ldw .D1T1 *+a4[3], a5",
            "0x2018: stw .D2T2 b5, *b4++[1]",
            "0x201c: idle",
        ]
    );
}

#[test]
fn pc_relative_target_uses_scaled_field() {
    // displacement field 3, scaled by 4, from address 0x1000
    let b = Tms320C64xDisassembler::new()
        .decode_instruction(&0x00000190u32.to_be_bytes(), 0x1000)
        .unwrap();
    assert_eq!(
        b.instruction.control_flow,
        ControlFlow::UnconditionalBranch { target: 0x100c }
    );
}

#[test]
fn ubfm_canonicalizes_to_lsr() {
    // ubfm w0, w1, #0, #31
    let disasm = Arm64Disassembler::new();
    let decoded = disasm
        .decode_instruction(&0x53007c20u32.to_le_bytes(), 0)
        .unwrap();
    let insn = decoded.instruction;
    assert_eq!(insn.mnemonic, "lsr");
    assert_eq!(insn.text(), "lsr w0, w1, #0");
    assert_eq!(insn.operands.len(), 3);
    assert_eq!(insn.operands[2].as_immediate(), Some(0));
    assert_eq!(disasm.instruction_name(insn.opcode.unwrap()), Some("lsr"));
}

#[test]
fn reserved_addressing_mode_fails_instruction() {
    // ldw with mode 0b0010
    let err = Tms320C64xDisassembler::new()
        .decode_instruction(&0x02906464u32.to_be_bytes(), 0x40)
        .unwrap_err();
    assert_eq!(
        err,
        DecodeError::InvalidOperand {
            address: 0x40,
            source: OperandError::Reserved {
                field: "addressing mode",
                value: 2
            },
        }
    );
    assert!(err.is_fail());
    assert_eq!(err.address(), Some(0x40));

    // ldr with extend option 0b010
    let err = Arm64Disassembler::new()
        .decode_instruction(&0xf8620820u32.to_le_bytes(), 0)
        .unwrap_err();
    assert!(matches!(err, DecodeError::InvalidOperand { .. }));
}

#[test]
fn truncated_input_reports_needed_bytes() {
    let arm = Arm64Disassembler::new();
    assert_eq!(
        arm.decode_instruction(&[0x1f, 0x20], 0x10).unwrap_err(),
        DecodeError::insufficient_input(0x10, 4, 2)
    );
    let riscv = RiscVDisassembler::new();
    assert_eq!(
        riscv.decode_instruction(&[0x13], 0).unwrap_err(),
        DecodeError::insufficient_input(0, 2, 1)
    );
    let tms = Tms320C64xDisassembler::new();
    assert!(!tms.decode_instruction(&[], 0).unwrap_err().is_fail());
}

#[test]
fn control_flow_terminators() {
    let arm = Arm64Disassembler::new();
    let code = le_words(&[
        0x94000040, // bl
        0xd65f03c0, // ret
    ]);
    let flows: Vec<ControlFlow> = arm
        .iter(&code, 0x1000)
        .map(|r| r.unwrap().control_flow)
        .collect();
    assert_eq!(
        flows,
        vec![
            ControlFlow::Call {
                target: 0x1100,
                return_addr: 0x1004
            },
            ControlFlow::Return,
        ]
    );

    let tms = Tms320C64xDisassembler::new();
    let irp = tms
        .decode_instruction(&0x001800e2u32.to_be_bytes(), 0)
        .unwrap()
        .instruction;
    assert!(irp.is_terminator());
    let reg = tms
        .decode_instruction(&0x000c0362u32.to_be_bytes(), 0)
        .unwrap()
        .instruction;
    assert!(matches!(reg.control_flow, ControlFlow::IndirectBranch { .. }));
}

#[test]
fn disassemblers_behind_trait_objects() {
    let disasms: Vec<Box<dyn Disassembler>> = vec![
        Box::new(Arm64Disassembler::new()),
        Box::new(RiscVDisassembler::new()),
        Box::new(RiscVDisassembler::new_rv32()),
        Box::new(Tms320C64xDisassembler::new()),
    ];
    let summary: Vec<(Architecture, usize, usize, bool)> = disasms
        .iter()
        .map(|d| {
            (
                d.architecture(),
                d.min_instruction_size(),
                d.max_instruction_size(),
                d.is_fixed_width(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (Architecture::Arm64, 4, 4, true),
            (Architecture::RiscV64, 2, 8, false),
            (Architecture::RiscV32, 2, 8, false),
            (Architecture::Tms320C64x, 4, 4, true),
        ]
    );
}

#[test]
fn concurrent_decoding_shares_tables() {
    init_tracing();
    let disasm = Arc::new(Tms320C64xDisassembler::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let disasm = Arc::clone(&disasm);
            thread::spawn(move || {
                let address = 0x1000 + i * 4;
                disasm
                    .decode_instruction(&0x01882078u32.to_be_bytes(), address)
                    .map(|d| d.instruction.text())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "add .L1 a1, a2, a3");
    }
}
