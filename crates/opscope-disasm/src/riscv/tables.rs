//! RISC-V decode tables: one for 32-bit instructions keyed on the major
//! opcode, one for the 16-bit compressed forms keyed on quadrant and funct3.

use std::sync::OnceLock;

use super::decoders::Dec;
use super::opcodes::Opcode::{self, *};
use crate::engine::{DecodeTable, TableBuilder};
use crate::error::TableError;

id_enum! {
    /// Predicates named by the tables.
    pub enum Pred {
        M,
        F,
        D,
        C,
        Zicsr,
        Rv64,
    }
}

/// The 32-bit table, built on first use.
///
/// # Panics
///
/// Panics if the table fails validation, which only a bug in this module
/// can cause.
pub(crate) fn table32() -> &'static DecodeTable {
    static TABLE: OnceLock<DecodeTable> = OnceLock::new();
    TABLE.get_or_init(|| build32().unwrap_or_else(|e| panic!("riscv decode table: {e}")))
}

/// The compressed table, built on first use.
///
/// # Panics
///
/// As [`table32`].
pub(crate) fn table16() -> &'static DecodeTable {
    static TABLE: OnceLock<DecodeTable> = OnceLock::new();
    TABLE.get_or_init(|| build16().unwrap_or_else(|e| panic!("riscv compressed table: {e}")))
}

fn select(b: &mut TableBuilder, start: u8, len: u8, entries: &[(u64, Opcode)], decoder: Dec) {
    b.switch(start, len, |cases| {
        for &(value, opcode) in entries {
            cases.case(value, |b| {
                b.decode(opcode, decoder);
            });
        }
    });
}

pub(crate) fn build32() -> Result<DecodeTable, TableError> {
    let mut b = TableBuilder::new("riscv32", 32);
    b.check(0, 2, 0b11, |b| {
        b.switch(2, 5, |major| {
            major.case(0b01101, |b| {
                b.decode(Lui, Dec::Upper);
            });
            major.case(0b00101, |b| {
                b.decode(Auipc, Dec::Upper);
            });
            major.case(0b11011, |b| {
                b.decode(Jal, Dec::Jal);
            });
            major.case(0b11001, |b| {
                b.check(12, 3, 0, |b| {
                    b.decode(Jalr, Dec::Jalr);
                });
            });
            major.case(0b11000, |b| {
                let forms = [
                    (0b000, Beq),
                    (0b001, Bne),
                    (0b100, Blt),
                    (0b101, Bge),
                    (0b110, Bltu),
                    (0b111, Bgeu),
                ];
                select(b, 12, 3, &forms, Dec::Branch);
            });
            major.case(0b00000, loads);
            major.case(0b01000, stores);
            major.case(0b00100, op_imm);
            major.case(0b00110, |b| {
                b.predicate(Pred::Rv64, op_imm_32);
            });
            major.case(0b01100, op);
            major.case(0b01110, |b| {
                b.predicate(Pred::Rv64, op_32);
            });
            major.case(0b00011, misc_mem);
            major.case(0b11100, system);
            major.case(0b00001, |b| {
                b.switch(12, 3, |width| {
                    width.case(0b010, |b| {
                        b.predicate(Pred::F, |b| {
                            b.decode(Flw, Dec::FpLoad);
                        });
                    });
                    width.case(0b011, |b| {
                        b.predicate(Pred::D, |b| {
                            b.decode(Fld, Dec::FpLoad);
                        });
                    });
                });
            });
            major.case(0b01001, |b| {
                b.switch(12, 3, |width| {
                    width.case(0b010, |b| {
                        b.predicate(Pred::F, |b| {
                            b.decode(Fsw, Dec::FpStore);
                        });
                    });
                    width.case(0b011, |b| {
                        b.predicate(Pred::D, |b| {
                            b.decode(Fsd, Dec::FpStore);
                        });
                    });
                });
            });
            major.case(0b10100, op_fp);
        });
    });
    b.finish(Dec::COUNT, Pred::COUNT)
}

fn loads(b: &mut TableBuilder) {
    b.switch(12, 3, |width| {
        width.case(0b000, |b| {
            b.decode(Lb, Dec::Load);
        });
        width.case(0b001, |b| {
            b.decode(Lh, Dec::Load);
        });
        width.case(0b010, |b| {
            b.decode(Lw, Dec::Load);
        });
        width.case(0b011, |b| {
            b.predicate(Pred::Rv64, |b| {
                b.decode(Ld, Dec::Load);
            });
        });
        width.case(0b100, |b| {
            b.decode(Lbu, Dec::Load);
        });
        width.case(0b101, |b| {
            b.decode(Lhu, Dec::Load);
        });
        width.case(0b110, |b| {
            b.predicate(Pred::Rv64, |b| {
                b.decode(Lwu, Dec::Load);
            });
        });
    });
}

fn stores(b: &mut TableBuilder) {
    b.switch(12, 3, |width| {
        width.case(0b000, |b| {
            b.decode(Sb, Dec::Store);
        });
        width.case(0b001, |b| {
            b.decode(Sh, Dec::Store);
        });
        width.case(0b010, |b| {
            b.decode(Sw, Dec::Store);
        });
        width.case(0b011, |b| {
            b.predicate(Pred::Rv64, |b| {
                b.decode(Sd, Dec::Store);
            });
        });
    });
}

/// Shift-immediate encodings: `funct6` on RV64 (6-bit shamt), `funct7` on
/// RV32.
fn shift(b: &mut TableBuilder, funct7: u64, opcode: Opcode) {
    b.predicate(Pred::Rv64, |b| {
        b.check(26, 6, funct7 >> 1, |b| {
            b.decode(opcode, Dec::ShiftImm);
        });
    });
    b.check(25, 7, funct7, |b| {
        b.decode(opcode, Dec::ShiftImm);
    });
}

fn op_imm(b: &mut TableBuilder) {
    b.switch(12, 3, |funct3| {
        let forms = [
            (0b000, Addi),
            (0b010, Slti),
            (0b011, Sltiu),
            (0b100, Xori),
            (0b110, Ori),
            (0b111, Andi),
        ];
        for (value, opcode) in forms {
            funct3.case(value, |b| {
                b.decode(opcode, Dec::Imm);
            });
        }
        funct3.case(0b001, |b| shift(b, 0, Slli));
        funct3.case(0b101, |b| {
            shift(b, 0, Srli);
            shift(b, 0b010_0000, Srai);
        });
    });
}

fn op_imm_32(b: &mut TableBuilder) {
    b.switch(12, 3, |funct3| {
        funct3.case(0b000, |b| {
            b.decode(Addiw, Dec::Imm);
        });
        funct3.case(0b001, |b| {
            b.check(25, 7, 0, |b| {
                b.decode(Slliw, Dec::ShiftImmW);
            });
        });
        funct3.case(0b101, |b| {
            b.check(25, 7, 0, |b| {
                b.decode(Srliw, Dec::ShiftImmW);
            });
            b.check(25, 7, 0b010_0000, |b| {
                b.decode(Sraiw, Dec::ShiftImmW);
            });
        });
    });
}

fn op(b: &mut TableBuilder) {
    b.switch(25, 7, |funct7| {
        funct7.case(0b000_0000, |b| {
            let forms = [
                (0b000, Add),
                (0b001, Sll),
                (0b010, Slt),
                (0b011, Sltu),
                (0b100, Xor),
                (0b101, Srl),
                (0b110, Or),
                (0b111, And),
            ];
            select(b, 12, 3, &forms, Dec::Reg);
        });
        funct7.case(0b010_0000, |b| {
            select(b, 12, 3, &[(0b000, Sub), (0b101, Sra)], Dec::Reg);
        });
        funct7.case(0b000_0001, |b| {
            b.predicate(Pred::M, |b| {
                let forms = [
                    (0b000, Mul),
                    (0b001, Mulh),
                    (0b010, Mulhsu),
                    (0b011, Mulhu),
                    (0b100, Div),
                    (0b101, Divu),
                    (0b110, Rem),
                    (0b111, Remu),
                ];
                select(b, 12, 3, &forms, Dec::Reg);
            });
        });
    });
}

fn op_32(b: &mut TableBuilder) {
    b.switch(25, 7, |funct7| {
        funct7.case(0b000_0000, |b| {
            select(b, 12, 3, &[(0b000, Addw), (0b001, Sllw), (0b101, Srlw)], Dec::Reg);
        });
        funct7.case(0b010_0000, |b| {
            select(b, 12, 3, &[(0b000, Subw), (0b101, Sraw)], Dec::Reg);
        });
        funct7.case(0b000_0001, |b| {
            b.predicate(Pred::M, |b| {
                let forms = [
                    (0b000, Mulw),
                    (0b100, Divw),
                    (0b101, Divuw),
                    (0b110, Remw),
                    (0b111, Remuw),
                ];
                select(b, 12, 3, &forms, Dec::Reg);
            });
        });
    });
}

fn misc_mem(b: &mut TableBuilder) {
    // rd and rs1 are reserved; FENCE.I also reserves its immediate
    const RD_RS1: u64 = (0x1f << 15) | (0x1f << 7);
    const IMM12: u64 = 0xfff << 20;
    b.switch(12, 3, |funct3| {
        funct3.case(0b000, |b| {
            b.decode_checked(Fence, Dec::Fence, RD_RS1, 0);
        });
        funct3.case(0b001, |b| {
            b.decode_checked(FenceI, Dec::NoOperands, RD_RS1 | IMM12, 0);
        });
    });
}

fn system(b: &mut TableBuilder) {
    b.switch(12, 3, |funct3| {
        funct3.case(0b000, |b| {
            b.check(7, 5, 0, |b| {
                b.check(15, 5, 0, |b| {
                    let forms = [
                        (0x000, Ecall),
                        (0x001, Ebreak),
                        (0x102, Sret),
                        (0x302, Mret),
                        (0x105, Wfi),
                    ];
                    select(b, 20, 12, &forms, Dec::NoOperands);
                });
            });
        });
        let forms = [
            (0b001, Csrrw, Dec::Csr),
            (0b010, Csrrs, Dec::Csr),
            (0b011, Csrrc, Dec::Csr),
            (0b101, Csrrwi, Dec::CsrImm),
            (0b110, Csrrsi, Dec::CsrImm),
            (0b111, Csrrci, Dec::CsrImm),
        ];
        for (value, opcode, decoder) in forms {
            funct3.case(value, |b| {
                b.predicate(Pred::Zicsr, |b| {
                    b.decode(opcode, decoder);
                });
            });
        }
    });
}

fn op_fp(b: &mut TableBuilder) {
    b.switch(25, 7, |funct7| {
        let arith = [
            (0b000_0000, FaddS, Pred::F),
            (0b000_0100, FsubS, Pred::F),
            (0b000_1000, FmulS, Pred::F),
            (0b000_1100, FdivS, Pred::F),
            (0b000_0001, FaddD, Pred::D),
            (0b000_0101, FsubD, Pred::D),
            (0b000_1001, FmulD, Pred::D),
            (0b000_1101, FdivD, Pred::D),
        ];
        for (value, opcode, pred) in arith {
            funct7.case(value, |b| {
                b.predicate(pred, |b| {
                    b.decode(opcode, Dec::FpArith);
                });
            });
        }
        funct7.case(0b111_0000, |b| fp_move(b, Pred::F, false, FmvXW, Dec::FpToInt));
        funct7.case(0b111_1000, |b| fp_move(b, Pred::F, false, FmvWX, Dec::IntToFp));
        funct7.case(0b111_0001, |b| fp_move(b, Pred::D, true, FmvXD, Dec::FpToInt));
        funct7.case(0b111_1001, |b| fp_move(b, Pred::D, true, FmvDX, Dec::IntToFp));
    });
}

/// FMV between register files: `rs2` and `rm` must be zero.
fn fp_move(b: &mut TableBuilder, pred: Pred, rv64_only: bool, opcode: Opcode, decoder: Dec) {
    b.check(20, 5, 0, |b| {
        b.check(12, 3, 0, |b| {
            b.predicate(pred, |b| {
                if rv64_only {
                    b.predicate(Pred::Rv64, |b| {
                        b.decode(opcode, decoder);
                    });
                } else {
                    b.decode(opcode, decoder);
                }
            });
        });
    });
}

pub(crate) fn build16() -> Result<DecodeTable, TableError> {
    let mut b = TableBuilder::new("riscv16", 16);
    b.predicate(Pred::C, |b| {
        b.switch(0, 2, |quadrant| {
            quadrant.case(0b00, quadrant0);
            quadrant.case(0b01, quadrant1);
            quadrant.case(0b10, quadrant2);
        });
    });
    b.finish(Dec::COUNT, Pred::COUNT)
}

/// `funct3` slot shared by an RV64 integer form and an RV32 float form.
fn rv64_or_float(b: &mut TableBuilder, rv64: (Opcode, Dec), float: (Opcode, Dec)) {
    b.predicate(Pred::Rv64, |b| {
        b.decode(rv64.0, rv64.1);
    });
    b.predicate(Pred::F, |b| {
        b.decode(float.0, float.1);
    });
}

fn quadrant0(b: &mut TableBuilder) {
    b.switch(13, 3, |funct3| {
        funct3.case(0b000, |b| {
            // the all-zero parcel is defined illegal
            b.check(5, 8, 0, |b| {
                b.fail();
            });
            b.decode(CAddi4spn, Dec::CAddi4spn);
        });
        funct3.case(0b001, |b| {
            b.predicate(Pred::D, |b| {
                b.decode(CFld, Dec::CFpLoadDouble);
            });
        });
        funct3.case(0b010, |b| {
            b.decode(CLw, Dec::CLoadWord);
        });
        funct3.case(0b011, |b| {
            rv64_or_float(b, (CLd, Dec::CLoadDouble), (CFlw, Dec::CFpLoadWord))
        });
        funct3.case(0b101, |b| {
            b.predicate(Pred::D, |b| {
                b.decode(CFsd, Dec::CFpStoreDouble);
            });
        });
        funct3.case(0b110, |b| {
            b.decode(CSw, Dec::CStoreWord);
        });
        funct3.case(0b111, |b| {
            rv64_or_float(b, (CSd, Dec::CStoreDouble), (CFsw, Dec::CFpStoreWord))
        });
    });
}

fn quadrant1(b: &mut TableBuilder) {
    const CI_IMM: u64 = (1 << 12) | (0x1f << 2);
    b.switch(13, 3, |funct3| {
        funct3.case(0b000, |b| {
            b.check(7, 5, 0, |b| {
                b.decode_checked(CNop, Dec::NoOperands, CI_IMM, 0);
            });
            b.decode(CAddi, Dec::CAddi);
        });
        funct3.case(0b001, |b| {
            b.predicate(Pred::Rv64, |b| {
                b.decode(CAddiw, Dec::CAddiw);
            });
            b.decode(CJal, Dec::CJump);
        });
        funct3.case(0b010, |b| {
            b.decode(CLi, Dec::CLi);
        });
        funct3.case(0b011, |b| {
            b.check(7, 5, 2, |b| {
                b.decode(CAddi16sp, Dec::CAddi16sp);
            });
            b.decode(CLui, Dec::CLui);
        });
        funct3.case(0b100, |b| {
            b.switch(10, 2, |funct2| {
                funct2.case(0b00, |b| {
                    b.decode(CSrli, Dec::CShiftImm);
                });
                funct2.case(0b01, |b| {
                    b.decode(CSrai, Dec::CShiftImm);
                });
                funct2.case(0b10, |b| {
                    b.decode(CAndi, Dec::CAndi);
                });
                funct2.case(0b11, |b| {
                    b.switch(12, 1, |wide| {
                        wide.case(0, |b| {
                            let forms = [(0b00, CSub), (0b01, CXor), (0b10, COr), (0b11, CAnd)];
                            select(b, 5, 2, &forms, Dec::CArith);
                        });
                        wide.case(1, |b| {
                            b.predicate(Pred::Rv64, |b| {
                                select(b, 5, 2, &[(0b00, CSubw), (0b01, CAddw)], Dec::CArith);
                            });
                        });
                    });
                });
            });
        });
        funct3.case(0b101, |b| {
            b.decode(CJ, Dec::CJump);
        });
        funct3.case(0b110, |b| {
            b.decode(CBeqz, Dec::CBranch);
        });
        funct3.case(0b111, |b| {
            b.decode(CBnez, Dec::CBranch);
        });
    });
}

fn quadrant2(b: &mut TableBuilder) {
    b.switch(13, 3, |funct3| {
        funct3.case(0b000, |b| {
            b.decode(CSlli, Dec::CSlli);
        });
        funct3.case(0b001, |b| {
            b.predicate(Pred::D, |b| {
                b.decode(CFldsp, Dec::CFpLoadDoubleSp);
            });
        });
        funct3.case(0b010, |b| {
            b.decode(CLwsp, Dec::CLoadWordSp);
        });
        funct3.case(0b011, |b| {
            rv64_or_float(b, (CLdsp, Dec::CLoadDoubleSp), (CFlwsp, Dec::CFpLoadWordSp))
        });
        funct3.case(0b100, |b| {
            b.switch(12, 1, |bit12| {
                bit12.case(0, |b| {
                    b.check(2, 5, 0, |b| {
                        b.decode(CJr, Dec::CJr);
                    });
                    b.decode(CMv, Dec::CMv);
                });
                bit12.case(1, |b| {
                    b.check(2, 5, 0, |b| {
                        b.check(7, 5, 0, |b| {
                            b.decode(CEbreak, Dec::NoOperands);
                        });
                        b.decode(CJalr, Dec::CJr);
                    });
                    b.decode(CAdd, Dec::CAdd);
                });
            });
        });
        funct3.case(0b101, |b| {
            b.predicate(Pred::D, |b| {
                b.decode(CFsdsp, Dec::CFpStoreDoubleSp);
            });
        });
        funct3.case(0b110, |b| {
            b.decode(CSwsp, Dec::CStoreWordSp);
        });
        funct3.case(0b111, |b| {
            rv64_or_float(b, (CSdsp, Dec::CStoreDoubleSp), (CFswsp, Dec::CFpStoreWordSp))
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_build() {
        let wide = build32().unwrap();
        assert_eq!(wide.width(), 32);
        assert!(wide.validate(Dec::COUNT, Pred::COUNT).is_ok());

        let compressed = build16().unwrap();
        assert_eq!(compressed.width(), 16);
        assert!(compressed.validate(Dec::COUNT, Pred::COUNT).is_ok());
    }
}
