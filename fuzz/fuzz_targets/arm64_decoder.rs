#![no_main]

use libfuzzer_sys::fuzz_target;
use opscope_disasm::arm64::Arm64Disassembler;
use opscope_disasm::traits::Disassembler;
use opscope_disasm::DisassemblerOptions;

fuzz_target!(|data: &[u8]| {
    // ARM64 instructions are fixed 32-bit
    if data.len() < 4 {
        return;
    }

    let disasm = Arm64Disassembler::with_options(DisassemblerOptions::new().with_detail(true));

    // Decode single instruction, with detail
    if let Ok(decoded) = disasm.decode_instruction(data, 0x1000) {
        assert_eq!(decoded.size, 4);
        let _ = decoded.instruction.text();
        if let Some(detail) = &decoded.instruction.detail {
            let _ = detail.regs_access();
        }
    }

    // Sweep the buffer
    let mut offset = 0;
    for result in disasm.iter(data, 0x1000).take(100) {
        match result {
            Ok(insn) => {
                assert_eq!(insn.address, 0x1000 + offset as u64);
                offset += insn.size;
            }
            Err(_) => offset += 4,
        }
    }
});
