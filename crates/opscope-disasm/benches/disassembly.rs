//! Benchmarks for disassembly performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use opscope_disasm::{Disassembler, DisassemblerOptions};

#[cfg(feature = "arm64")]
use opscope_disasm::Arm64Disassembler;
#[cfg(feature = "riscv")]
use opscope_disasm::RiscVDisassembler;
#[cfg(feature = "tms320c64x")]
use opscope_disasm::Tms320C64xDisassembler;

/// Sample ARM64 code: a small function with a prologue, arithmetic, a
/// conditional branch and an epilogue.
#[cfg(feature = "arm64")]
const ARM64_CODE: &[u32] = &[
    0xa9bf7bfd, // stp x29, x30, [sp, #-0x10]!
    0x910003fd, // mov x29, sp
    0xf9400420, // ldr x0, [x1, #8]
    0x91000420, // add x0, x1, #1
    0xf100141f, // cmp x0, #5
    0x54000040, // b.eq
    0x9b027c20, // mul x0, x1, x2
    0x53007c20, // lsr w0, w1, #0
    0xa8c17bfd, // ldp x29, x30, [sp], #0x10
    0xd65f03c0, // ret
];

/// Sample RISC-V code mixing compressed and full-width encodings.
#[cfg(feature = "riscv")]
const RISCV_CODE: &[u8] = &[
    0x05, 0x05, // c.addi a0, 1
    0x13, 0x05, 0x15, 0x00, // addi a0, a0, 1
    0x32, 0x45, // c.lwsp a0, 12(sp)
    0x03, 0x25, 0x81, 0x00, // lw a0, 8(sp)
    0x33, 0x85, 0xc5, 0x02, // mul a0, a1, a2
    0x63, 0x08, 0xb5, 0x00, // beq a0, a1
    0x73, 0x25, 0x00, 0x30, // csrr a0, mstatus
    0x82, 0x80, // c.jr ra
];

/// Sample TMS320C64x fetch packet.
#[cfg(feature = "tms320c64x")]
const TMS320C64X_CODE: &[u32] = &[
    0x02091a28, // mvk .S1 0x1234, a4
    0x02091a68, // mvkh .S1 0x12340000, a4
    0x01882078, // add .L1 a1, a2, a3
    0x02906264, // ldw .D1T1 *+a4[3], a5
    0x01882c80, // mpy .M1 a1, a2, a3
    0x31882078, // [!b0] add .L1 a1, a2, a3
    0x00000190, // b .S1
    0x00004000, // nop 3
];

/// Repeats `pattern` to `size` bytes for throughput runs.
fn repeat_block(pattern: &[u8], size: usize) -> Vec<u8> {
    pattern.iter().copied().cycle().take(size).collect()
}

fn bench_disassembler<D: Disassembler>(c: &mut Criterion, name: &str, disasm: &D, code: &[u8]) {
    let mut group = c.benchmark_group(name);
    let first = disasm.min_instruction_size().max(4).min(code.len());

    group.bench_function("single_instruction", |b| {
        b.iter(|| {
            let _ = disasm.decode_instruction(black_box(&code[..first]), 0x1000);
        })
    });

    group.bench_function("small_function", |b| {
        b.iter(|| {
            let _ = disasm.disassemble_block(black_box(code), 0x1000);
        })
    });

    for size in [1024, 4096, 16384, 65536] {
        let block = repeat_block(code, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("throughput", size), &block, |b, block| {
            b.iter(|| {
                let _ = disasm.disassemble_block(black_box(block), 0x1000);
            })
        });
    }

    group.finish();
}

#[cfg(feature = "arm64")]
fn bench_arm64_disassembly(c: &mut Criterion) {
    let code: Vec<u8> = ARM64_CODE.iter().flat_map(|w| w.to_le_bytes()).collect();
    bench_disassembler(c, "arm64_disassembly", &Arm64Disassembler::new(), &code);

    let detailed = Arm64Disassembler::with_options(DisassemblerOptions::new().with_detail(true));
    bench_disassembler(c, "arm64_disassembly_detail", &detailed, &code);
}

#[cfg(feature = "riscv")]
fn bench_riscv_disassembly(c: &mut Criterion) {
    bench_disassembler(c, "riscv_disassembly", &RiscVDisassembler::new(), RISCV_CODE);
}

#[cfg(feature = "tms320c64x")]
fn bench_tms320c64x_disassembly(c: &mut Criterion) {
    let code: Vec<u8> = TMS320C64X_CODE
        .iter()
        .flat_map(|w| w.to_be_bytes())
        .collect();
    bench_disassembler(c, "tms320c64x_disassembly", &Tms320C64xDisassembler::new(), &code);

    let detailed =
        Tms320C64xDisassembler::with_options(DisassemblerOptions::new().with_detail(true));
    bench_disassembler(c, "tms320c64x_disassembly_detail", &detailed, &code);
}

fn benches(c: &mut Criterion) {
    #[cfg(feature = "arm64")]
    bench_arm64_disassembly(c);
    #[cfg(feature = "riscv")]
    bench_riscv_disassembly(c);
    #[cfg(feature = "tms320c64x")]
    bench_tms320c64x_disassembly(c);
}

criterion_group!(disassembly, benches);
criterion_main!(disassembly);
