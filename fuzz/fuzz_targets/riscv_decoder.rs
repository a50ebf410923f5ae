#![no_main]

use libfuzzer_sys::fuzz_target;
use opscope_disasm::riscv::RiscVDisassembler;
use opscope_disasm::traits::Disassembler;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Test both RV64 and RV32 variants
    let disasm_rv64 = RiscVDisassembler::new();
    let disasm_rv32 = RiscVDisassembler::new_rv32();

    let _ = disasm_rv32.decode_instruction(data, 0x1000);

    if let Ok(decoded) = disasm_rv64.decode_instruction(data, 0x1000) {
        // Only 16 and 32-bit encodings have tables
        assert!(decoded.size == 2 || decoded.size == 4);
        // The low bits of the first parcel select the length
        assert_eq!(decoded.size == 2, data[0] & 0x03 != 0x03);
    }

    // Sweep with the engine's own step so the skip size is exercised
    let mut offset = 0;
    let mut count = 0;
    while offset < data.len() && count < 100 {
        let (consumed, _) = disasm_rv64.step(&data[offset..], 0x1000 + offset as u64);
        assert!(consumed > 0);
        offset += consumed;
        count += 1;
    }
});
