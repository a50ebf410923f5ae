//! Detail records: operand access, implicit registers, groups and the
//! architecture extensions.

use opscope_core::register::{arm64, riscv, tms320c64x};
use opscope_core::{
    Access, ArchDetail, Architecture, Detail, FunctionalUnit, Groups, Operand, OperandKind,
    Register, RegisterClass, TmsCondition,
};
use opscope_disasm::{
    Arm64Disassembler, Disassembler, DisassemblerOptions, RiscVDisassembler,
    Tms320C64xDisassembler,
};

fn detailed() -> DisassemblerOptions {
    DisassemblerOptions::new().with_detail(true)
}

fn arm64_detail(word: u32) -> Detail {
    Arm64Disassembler::with_options(detailed())
        .decode_instruction(&word.to_le_bytes(), 0x1000)
        .unwrap()
        .instruction
        .detail
        .unwrap()
}

fn riscv_detail(word: u32) -> Detail {
    RiscVDisassembler::with_options(detailed())
        .decode_instruction(&word.to_le_bytes(), 0x1000)
        .unwrap()
        .instruction
        .detail
        .unwrap()
}

fn tms_detail(word: u32) -> Detail {
    Tms320C64xDisassembler::with_options(detailed())
        .decode_instruction(&word.to_be_bytes(), 0x1000)
        .unwrap()
        .instruction
        .detail
        .unwrap()
}

fn names(regs: &[Register]) -> Vec<&'static str> {
    regs.iter().map(|r| r.name()).collect()
}

#[test]
fn detail_is_opt_in() {
    let plain = Arm64Disassembler::new()
        .decode_instruction(&0x91000420u32.to_le_bytes(), 0)
        .unwrap();
    assert!(plain.instruction.detail.is_none());

    // explicit request wins over the options
    let forced = Arm64Disassembler::new()
        .decode(&0x91000420u32.to_le_bytes(), 0, true)
        .unwrap();
    assert!(forced.instruction.detail.is_some());
}

#[test]
fn arm64_flags_and_link_register() {
    let nzcv = Register::new(Architecture::Arm64, RegisterClass::Flags, arm64::NZCV, 32);
    let lr = Register::new(Architecture::Arm64, RegisterClass::General, arm64::X30, 64);

    // cmp x0, #5
    let cmp = arm64_detail(0xf100141f);
    assert!(cmp.writes_register(nzcv));
    assert_eq!(cmp.operands[0].access, Access::READ);

    // b.eq reads the flags it tests
    let beq = arm64_detail(0x54000040);
    assert!(beq.reads_register(nzcv));
    assert!(beq.in_group(Groups::JUMP));

    // bl
    let bl = arm64_detail(0x94000040);
    assert!(bl.writes_register(lr));
    assert_eq!(bl.group_names(), vec!["call", "branch_relative"]);

    // ret
    let ret = arm64_detail(0xd65f03c0);
    assert!(ret.reads_register(lr));
    assert!(ret.in_group(Groups::RETURN));
}

#[test]
fn arm64_writeback_counts_as_write() {
    // stp x29, x30, [sp, #-0x10]!
    let stp = arm64_detail(0xa9bf7bfd);
    let (reads, writes) = stp.regs_access();
    assert_eq!(names(&reads), vec!["x29", "x30", "sp"]);
    assert_eq!(names(&writes), vec!["sp"]);
    assert_eq!(stp.operand_index(OperandKind::Memory, 0), Some(2));
    assert!(matches!(&stp.arch, ArchDetail::Arm64(d) if d.writeback));

    // ldr x0, [x1, #8]
    let ldr = arm64_detail(0xf9400420);
    let (reads, writes) = ldr.regs_access();
    assert_eq!(names(&reads), vec!["x1"]);
    assert_eq!(names(&writes), vec!["x0"]);
}

#[test]
fn riscv_operand_kinds() {
    // lw a0, 8(sp)
    let lw = riscv_detail(0x00812503);
    assert_eq!(lw.operand_count(OperandKind::Register), 1);
    assert_eq!(lw.operand_index(OperandKind::Memory, 0), Some(1));
    let sp = Register::new(Architecture::RiscV64, RegisterClass::General, riscv::SP, 64);
    assert!(lw.reads_register(sp));
    assert!(!lw.writes_register(sp));

    // mul a0, a1, a2
    let mul = riscv_detail(0x02c58533);
    assert_eq!(mul.operand_count(OperandKind::Register), 3);
    assert_eq!(
        mul.operands.iter().map(|op| op.access).collect::<Vec<_>>(),
        vec![Access::WRITE, Access::READ, Access::READ]
    );
}

#[test]
fn riscv_call_writes_return_address() {
    // jal 0x1008
    let jal = riscv_detail(0x008000ef);
    let ra = Register::new(Architecture::RiscV64, RegisterClass::General, riscv::RA, 64);
    assert!(jal.writes_register(ra));
    assert!(jal.in_group(Groups::CALL));
    assert_eq!(jal.operand_count(OperandKind::PcRelative), 1);
}

#[test]
fn tms320c64x_unit_and_paths() {
    // ldw .D2T1 *+b14[10], a5
    let ldw = tms_detail(0x02800a6c);
    let ArchDetail::Tms320C64x(tms) = &ldw.arch else {
        panic!("expected tms320c64x detail");
    };
    assert_eq!(tms.unit, FunctionalUnit::D);
    assert_eq!(tms.side, 2);
    assert_eq!(tms.data_path, Some(1));
    assert!(!tms.cross_path);
    assert_eq!(ldw.group_names(), vec!["funit_d"]);

    let (reads, writes) = ldw.regs_access();
    assert_eq!(names(&reads), vec!["b14"]);
    assert_eq!(names(&writes), vec!["a5"]);

    // mpy .M1 a1, a2, a3
    let mpy = tms_detail(0x01882c80);
    assert!(mpy.in_group(Groups::UNIT_M));
}

#[test]
fn tms320c64x_predicate_register_is_read() {
    // [!b0] add .L1 a1, a2, a3
    let add = tms_detail(0x31882078);
    let b0 = Register::new(
        Architecture::Tms320C64x,
        RegisterClass::General,
        tms320c64x::B0,
        32,
    );
    let ArchDetail::Tms320C64x(tms) = &add.arch else {
        panic!("expected tms320c64x detail");
    };
    assert_eq!(
        tms.condition,
        Some(TmsCondition {
            register: b0,
            zero: true
        })
    );
    assert!(add.reads_register(b0));
    // the predicate is not an operand
    assert_eq!(add.operands.len(), 3);
}

#[test]
fn tms320c64x_branch_groups() {
    // b .S1 with a displacement
    let b = tms_detail(0x00000190);
    assert_eq!(b.group_names(), vec!["jump", "branch_relative", "funit_s"]);
    assert!(matches!(b.operands[0].operand, Operand::PcRelative { .. }));

    // b .S2 irp
    let irp = tms_detail(0x001800e2);
    assert!(irp.in_group(Groups::RETURN | Groups::UNIT_S));
    let irp_reg = Register::new(
        Architecture::Tms320C64x,
        RegisterClass::Control,
        tms320c64x::IRP,
        32,
    );
    assert!(irp.reads_register(irp_reg));
}

#[test]
fn tms320c64x_mvc_control_register_access() {
    let amr = Register::new(
        Architecture::Tms320C64x,
        RegisterClass::Control,
        tms320c64x::AMR,
        32,
    );
    // mvc .S2 b4, amr
    let to = tms_detail(0x001003a2);
    assert!(to.writes_register(amr));
    // mvc .S2 amr, b4
    let from = tms_detail(0x020003e2);
    assert!(from.reads_register(amr));
    assert!(!from.writes_register(amr));
}
