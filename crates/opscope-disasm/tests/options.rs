//! Runtime options: skip-data sweeps, unsigned immediates and feature sets.

use opscope_disasm::riscv::Xlen;
use opscope_disasm::{
    Arm64Disassembler, DecodeError, Disassembler, DisassemblerOptions, Features,
    RiscVDisassembler, Tms320C64xDisassembler,
};

fn texts<D: Disassembler>(disasm: &D, bytes: &[u8]) -> Vec<String> {
    disasm
        .disassemble_block(bytes, 0x1000)
        .into_iter()
        .map(|r| r.map(|i| i.text()).unwrap_or_else(|e| format!("error: {e}")))
        .collect()
}

fn skipping() -> DisassemblerOptions {
    DisassemblerOptions::new().with_skip_data(true)
}

#[test]
fn skip_data_covers_bad_words() {
    let mut code = Vec::new();
    code.extend_from_slice(&0xe1882078u32.to_be_bytes()); // creg 111
    code.extend_from_slice(&0x01882078u32.to_be_bytes()); // add .L1 a1, a2, a3
    code.extend_from_slice(&[0x01, 0x02]);

    let tms = Tms320C64xDisassembler::with_options(skipping());
    assert_eq!(
        texts(&tms, &code),
        vec![
            ".byte 0xe1, 0x88, 0x20, 0x78",
            "add .L1 a1, a2, a3",
            ".byte 0x01, 0x02",
        ]
    );

    let results = tms.disassemble_block(&code, 0x1000);
    assert!(results[0].as_ref().unwrap().is_data());
    assert_eq!(results[0].as_ref().unwrap().opcode, None);
}

#[test]
fn skip_data_disabled_reports_errors() {
    let code = 0xe1882078u32.to_be_bytes();
    let results = Tms320C64xDisassembler::new().disassemble_block(&code, 0x1000);
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(DecodeError::InvalidOperand { address: 0x1000, .. })
    ));
}

#[test]
fn riscv_skip_size_follows_compressed_extension() {
    // illegal all-zero parcel, then c.addi a0, 1
    let code = [0x00, 0x00, 0x05, 0x05];
    let with_c = RiscVDisassembler::with_options(skipping());
    assert_eq!(with_c.skip_data_size(), 2);
    assert_eq!(texts(&with_c, &code), vec![".byte 0x00, 0x00", "c.addi a0, 1"]);

    let without_c = RiscVDisassembler::with_options(
        skipping().with_features(Features::all().difference(Features::RISCV_C)),
    );
    assert_eq!(without_c.skip_data_size(), 4);
    assert_eq!(
        texts(&without_c, &code),
        vec![".byte 0x00, 0x00, 0x05, 0x05"]
    );
}

#[test]
fn custom_skip_data_mnemonic() {
    let arm = Arm64Disassembler::with_options(skipping().with_skip_data_mnemonic(".word"));
    let code = [0u8; 4];
    assert_eq!(texts(&arm, &code), vec![".word 0x00, 0x00, 0x00, 0x00"]);
}

#[test]
fn disassemble_count_stops_early() {
    let code: Vec<u8> = [0xd503201fu32; 8]
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    let arm = Arm64Disassembler::new();
    let first = arm.disassemble_count(&code, 0x1000, 3);
    assert_eq!(first.len(), 3);
    assert_eq!(first[2].as_ref().unwrap().address, 0x1008);
    assert_eq!(arm.disassemble_count(&code, 0x1000, 100).len(), 8);
}

#[test]
fn unsigned_immediates() {
    let unsigned = DisassemblerOptions::new().with_unsigned_immediates(true);

    // addi a0, a0, -1
    let addi = 0xfff50513u32.to_le_bytes();
    let signed = RiscVDisassembler::new().decode_instruction(&addi, 0).unwrap();
    assert_eq!(signed.instruction.text(), "addi a0, a0, -1");
    let plain = RiscVDisassembler::with_options(unsigned.clone())
        .decode_instruction(&addi, 0)
        .unwrap();
    assert_eq!(plain.instruction.text(), "addi a0, a0, 0xffffffffffffffff");

    // mvk .S1 -1, a4
    let mvk = 0x027fffa8u32.to_be_bytes();
    assert_eq!(
        Tms320C64xDisassembler::new()
            .decode_instruction(&mvk, 0)
            .unwrap()
            .instruction
            .text(),
        "mvk .S1 -1, a4"
    );
    assert_eq!(
        Tms320C64xDisassembler::with_options(unsigned.clone())
            .decode_instruction(&mvk, 0)
            .unwrap()
            .instruction
            .text(),
        "mvk .S1 0xffffffff, a4"
    );

    // stp x29, x30, [sp, #-0x10]!
    let stp = 0xa9bf7bfdu32.to_le_bytes();
    assert_eq!(
        Arm64Disassembler::with_options(unsigned)
            .decode_instruction(&stp, 0)
            .unwrap()
            .instruction
            .text(),
        "stp x29, x30, [sp, #0xfffffffffffffff0]!"
    );
}

#[test]
fn features_parse_from_text() {
    let features = Features::parse("ARM64_FP | ARM64_NEON").unwrap();
    assert_eq!(features, Features::ARM64_FP | Features::ARM64_NEON);
    assert!(Features::parse("ARM64_NOPE").is_err());
    assert_eq!(Features::default(), Features::all());
}

#[test]
fn features_gate_extensions() {
    // mul a0, a1, a2
    let mul = 0x02c58533u32.to_le_bytes();
    let no_m = RiscVDisassembler::with_xlen(
        Xlen::Rv64,
        DisassemblerOptions::new().with_features(Features::parse("RISCV_C | RISCV_ZICSR").unwrap()),
    );
    let err = no_m.decode_instruction(&mul, 0).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownOpcode { .. }));
    assert_eq!(
        RiscVDisassembler::new()
            .decode_instruction(&mul, 0)
            .unwrap()
            .instruction
            .mnemonic,
        "mul"
    );

    // fmov h0, #1.0 needs half precision
    let half = 0x1eee1000u32.to_le_bytes();
    let fp_only =
        Arm64Disassembler::with_options(DisassemblerOptions::new().with_features(Features::ARM64_FP));
    assert!(fp_only.decode_instruction(&half, 0).is_err());
    assert!(Arm64Disassembler::new().decode_instruction(&half, 0).is_ok());
}

#[test]
fn instruction_names_by_opcode() {
    let arm = Arm64Disassembler::new();
    let nop = arm
        .decode_instruction(&0xd503201fu32.to_le_bytes(), 0)
        .unwrap()
        .instruction;
    assert_eq!(arm.instruction_name(nop.opcode.unwrap()), Some("nop"));
    assert_eq!(arm.instruction_name(u16::MAX), None);
}
