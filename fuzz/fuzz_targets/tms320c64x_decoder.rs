#![no_main]

use libfuzzer_sys::fuzz_target;
use opscope_disasm::tms320c64x::Tms320C64xDisassembler;
use opscope_disasm::traits::Disassembler;
use opscope_disasm::DisassemblerOptions;

fuzz_target!(|data: &[u8]| {
    // TMS320C64x instructions are fixed 32-bit, big-endian
    if data.len() < 4 {
        return;
    }

    let disasm = Tms320C64xDisassembler::with_options(
        DisassemblerOptions::new()
            .with_detail(true)
            .with_skip_data(true),
    );

    // Every step succeeds in skip-data mode
    for result in disasm.iter(data, 0x1000).take(100) {
        let insn = match result {
            Ok(insn) => insn,
            Err(e) => panic!("skip-data sweep returned an error: {e}"),
        };
        let _ = insn.text();
        if let Some(detail) = &insn.detail {
            let _ = detail.regs_access();
            let _ = detail.group_names();
        }
    }
});
