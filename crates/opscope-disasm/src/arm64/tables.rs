//! AArch64 decode table.
//!
//! The top level dispatches on `op0` (bits 28:25) like the encoding index
//! of the architecture reference; each group then narrows the class down
//! to a single opcode.

use std::sync::OnceLock;

use super::decoders::Dec;
use super::opcodes::Opcode::{self, *};
use crate::engine::{DecodeTable, TableBuilder};
use crate::error::TableError;

id_enum! {
    /// Extension predicates named by the table.
    pub enum Pred {
        Fp,
        Fp16,
        Neon,
    }
}

const B_COND: [Opcode; 16] = [
    BEq, BNe, BHs, BLo, BMi, BPl, BVs, BVc, BHi, BLs, BGe, BLt, BGt, BLe, BAl, BNv,
];

/// The 32-bit decode table, built on first use.
///
/// # Panics
///
/// Panics if the table fails validation, which only a bug in this module
/// can cause.
pub(crate) fn decode_table() -> &'static DecodeTable {
    static TABLE: OnceLock<DecodeTable> = OnceLock::new();
    TABLE.get_or_init(|| build().unwrap_or_else(|e| panic!("arm64 decode table: {e}")))
}

pub(crate) fn build() -> Result<DecodeTable, TableError> {
    let mut b = TableBuilder::new("arm64", 32);
    b.switch(25, 4, |op0| {
        op0.case_any(&[0b1000, 0b1001], data_processing_imm);
        op0.case_any(&[0b1010, 0b1011], branch_system);
        op0.case_any(&[0b0100, 0b0110, 0b1100, 0b1110], load_store);
        op0.case_any(&[0b0101, 0b1101], data_processing_reg);
        op0.case_any(&[0b0111, 0b1111], |b| {
            b.predicate(Pred::Fp, floating_point);
        });
    });
    b.finish(Dec::COUNT, Pred::COUNT)
}

/// One decoder for every listed value of a field.
fn select(b: &mut TableBuilder, start: u8, len: u8, entries: &[(u64, Opcode)], decoder: Dec) {
    b.switch(start, len, |cases| {
        for &(value, opcode) in entries {
            cases.case(value, |b| {
                b.decode(opcode, decoder);
            });
        }
    });
}

fn data_processing_imm(b: &mut TableBuilder) {
    b.switch(23, 3, |op| {
        op.case_any(&[0b000, 0b001], |b| {
            select(b, 31, 1, &[(0, Adr), (1, Adrp)], Dec::PcRelAddr);
        });
        op.case(0b010, |b| {
            let forms = [(0b00, AddImm), (0b01, AddsImm), (0b10, SubImm), (0b11, SubsImm)];
            select(b, 29, 2, &forms, Dec::AddSubImm);
        });
        op.case(0b100, |b| {
            let forms = [(0b00, AndImm), (0b01, OrrImm), (0b10, EorImm), (0b11, AndsImm)];
            select(b, 29, 2, &forms, Dec::LogicalImm);
        });
        op.case(0b101, |b| {
            select(b, 29, 2, &[(0b00, Movn), (0b10, Movz), (0b11, Movk)], Dec::MoveWide);
        });
        op.case(0b110, |b| {
            select(b, 29, 2, &[(0b00, Sbfm), (0b01, Bfm), (0b10, Ubfm)], Dec::Bitfield);
        });
        op.case(0b111, |b| {
            b.check(29, 2, 0, |b| {
                b.check(21, 1, 0, |b| {
                    b.decode(Extr, Dec::Extract);
                });
            });
        });
    });
}

fn branch_system(b: &mut TableBuilder) {
    b.switch(29, 3, |op0| {
        op0.case(0b000, |b| {
            b.decode(B, Dec::Branch26);
        });
        op0.case(0b100, |b| {
            b.decode(Bl, Dec::Branch26);
        });
        op0.case_any(&[0b001, 0b101], |b| {
            b.switch(24, 2, |op| {
                op.case(0b00, |b| {
                    b.decode(Cbz, Dec::CompareBranch);
                });
                op.case(0b01, |b| {
                    b.decode(Cbnz, Dec::CompareBranch);
                });
                op.case(0b10, |b| {
                    b.decode(Tbz, Dec::TestBranch);
                });
                op.case(0b11, |b| {
                    b.decode(Tbnz, Dec::TestBranch);
                });
            });
        });
        op0.case(0b010, |b| {
            b.check(24, 2, 0, |b| {
                b.check(4, 1, 0, |b| {
                    b.switch(0, 4, |cond| {
                        for (value, &opcode) in B_COND.iter().enumerate() {
                            cond.case(value as u64, |b| {
                                b.decode(opcode, Dec::CondBranch);
                            });
                        }
                    });
                });
            });
        });
        op0.case(0b110, |b| {
            b.switch(24, 2, |op1| {
                op1.case(0b00, exception);
                op1.case(0b01, |b| {
                    b.check(22, 2, 0, system);
                });
                op1.case(0b10, branch_register);
            });
        });
    });
}

fn exception(b: &mut TableBuilder) {
    b.switch(21, 3, |opc| {
        opc.case(0b000, |b| {
            b.check(2, 3, 0, |b| {
                select(b, 0, 2, &[(1, Svc), (2, Hvc), (3, Smc)], Dec::Exception);
            });
        });
        opc.case(0b001, |b| {
            b.check(0, 5, 0, |b| {
                b.decode(Brk, Dec::Exception);
            });
        });
        opc.case(0b010, |b| {
            b.check(0, 5, 0, |b| {
                b.decode(Hlt, Dec::Exception);
            });
        });
    });
}

fn system(b: &mut TableBuilder) {
    b.check(12, 10, 0b00_0011_0010, |b| {
        b.check(0, 5, 0b11111, |b| {
            b.decode(Hint, Dec::Hint);
        });
    });
    // L:op0<1>
    b.switch(20, 2, |l_op0| {
        l_op0.case(0b11, |b| {
            b.decode(Mrs, Dec::Mrs);
        });
        l_op0.case(0b01, |b| {
            b.decode(Msr, Dec::Msr);
        });
    });
}

fn branch_register(b: &mut TableBuilder) {
    b.check(16, 5, 0b11111, |b| {
        b.check(10, 6, 0, |b| {
            b.check(0, 5, 0, |b| {
                b.switch(21, 3, |opc| {
                    opc.case(0b000, |b| {
                        b.decode(Br, Dec::BranchReg);
                    });
                    opc.case(0b001, |b| {
                        b.decode(Blr, Dec::BranchReg);
                    });
                    opc.case(0b010, |b| {
                        b.decode(Ret, Dec::BranchReg);
                    });
                    opc.case(0b100, |b| {
                        b.check(5, 5, 0b11111, |b| {
                            b.decode(Eret, Dec::NoOperands);
                        });
                    });
                });
            });
        });
    });
}

fn load_store(b: &mut TableBuilder) {
    b.switch(27, 3, |op| {
        op.case(0b001, |b| {
            b.switch(24, 3, |class| {
                class.case(0b000, exclusive);
                class.case(0b100, |b| {
                    b.predicate(Pred::Neon, structures);
                });
            });
        });
        op.case(0b011, |b| {
            b.check(24, 1, 0, |b| {
                b.check(26, 1, 0, |b| {
                    let forms = [(0b00, Ldr), (0b01, Ldr), (0b10, Ldrsw)];
                    select(b, 30, 2, &forms, Dec::LoadLiteral);
                });
            });
        });
        op.case(0b101, |b| {
            b.check(26, 1, 0, |b| {
                b.switch(23, 2, |mode| {
                    // mode 00 is the non-temporal pair, not decoded here
                    mode.case_any(&[0b01, 0b10, 0b11], |b| {
                        select(b, 22, 1, &[(0, Stp), (1, Ldp)], Dec::Pair);
                    });
                });
            });
        });
        op.case(0b111, |b| {
            b.check(26, 1, 0, |b| {
                b.switch(24, 2, |form| {
                    form.case(0b01, |b| register_sizes(b, Dec::UnsignedOffset));
                    form.case(0b00, |b| {
                        b.switch(21, 1, |kind| {
                            kind.case(0, |b| {
                                b.switch(10, 2, |index| {
                                    index.case_any(&[0b01, 0b11], |b| {
                                        register_sizes(b, Dec::Indexed)
                                    });
                                });
                            });
                            kind.case(1, |b| {
                                b.check(10, 2, 0b10, |b| register_sizes(b, Dec::RegisterOffset));
                            });
                        });
                    });
                });
            });
        });
    });
}

/// `size:opc` selection shared by the single-register load/store forms.
fn register_sizes(b: &mut TableBuilder, decoder: Dec) {
    b.switch(30, 2, |size| {
        size.case(0b00, |b| select(b, 22, 2, &[(0b00, Strb), (0b01, Ldrb)], decoder));
        size.case(0b01, |b| select(b, 22, 2, &[(0b00, Strh), (0b01, Ldrh)], decoder));
        size.case(0b10, |b| {
            select(b, 22, 2, &[(0b00, Str), (0b01, Ldr), (0b10, Ldrsw)], decoder)
        });
        size.case(0b11, |b| select(b, 22, 2, &[(0b00, Str), (0b01, Ldr)], decoder));
    });
}

fn exclusive(b: &mut TableBuilder) {
    const RS: u64 = 0x1f << 16;
    const RT2: u64 = 0x1f << 10;
    b.check(31, 1, 1, |b| {
        b.switch(21, 3, |o2_l_o1| {
            o2_l_o1.case(0b000, |b| {
                b.switch(15, 1, |o0| {
                    o0.case(0, |b| {
                        b.decode_checked(Stxr, Dec::StoreExclusive, 0, RT2);
                    });
                    o0.case(1, |b| {
                        b.decode_checked(Stlxr, Dec::StoreExclusive, 0, RT2);
                    });
                });
            });
            o2_l_o1.case(0b010, |b| {
                b.switch(15, 1, |o0| {
                    o0.case(0, |b| {
                        b.decode_checked(Ldxr, Dec::LoadExclusive, 0, RS | RT2);
                    });
                    o0.case(1, |b| {
                        b.decode_checked(Ldaxr, Dec::LoadExclusive, 0, RS | RT2);
                    });
                });
            });
            o2_l_o1.case(0b100, |b| {
                b.check(15, 1, 1, |b| {
                    b.decode_checked(Stlr, Dec::LoadExclusive, 0, RS | RT2);
                });
            });
            o2_l_o1.case(0b110, |b| {
                b.check(15, 1, 1, |b| {
                    b.decode_checked(Ldar, Dec::LoadExclusive, 0, RS | RT2);
                });
            });
        });
    });
}

fn structures(b: &mut TableBuilder) {
    b.check(31, 1, 0, |b| {
        b.switch(23, 1, |post| {
            post.case(0, |b| {
                b.check(16, 6, 0, |b| {
                    select(b, 22, 1, &[(0, St1), (1, Ld1)], Dec::Structure)
                });
            });
            post.case(1, |b| {
                b.check(21, 1, 0, |b| {
                    select(b, 22, 1, &[(0, St1), (1, Ld1)], Dec::StructurePost)
                });
            });
        });
    });
}

fn data_processing_reg(b: &mut TableBuilder) {
    b.switch(28, 1, |op1| {
        op1.case(0, |b| {
            b.switch(24, 1, |kind| {
                kind.case(0, |b| {
                    b.switch(29, 2, |opc| {
                        let pairs = [
                            (AndReg, BicReg),
                            (OrrReg, OrnReg),
                            (EorReg, EonReg),
                            (AndsReg, BicsReg),
                        ];
                        for (value, (plain, inverted)) in pairs.into_iter().enumerate() {
                            opc.case(value as u64, |b| {
                                select(b, 21, 1, &[(0, plain), (1, inverted)], Dec::LogicalReg)
                            });
                        }
                    });
                });
                kind.case(1, |b| {
                    b.check(21, 1, 0, |b| {
                        let forms = [(0b00, AddReg), (0b01, AddsReg), (0b10, SubReg), (0b11, SubsReg)];
                        select(b, 29, 2, &forms, Dec::AddSubReg);
                    });
                });
            });
        });
        op1.case(1, |b| {
            b.switch(21, 4, |op2| {
                op2.case(0b0100, |b| {
                    b.check(29, 1, 0, |b| {
                        b.check(11, 1, 0, |b| {
                            b.switch(30, 1, |op| {
                                op.case(0, |b| {
                                    select(b, 10, 1, &[(0, Csel), (1, Csinc)], Dec::CondSelect)
                                });
                                op.case(1, |b| {
                                    select(b, 10, 1, &[(0, Csinv), (1, Csneg)], Dec::CondSelect)
                                });
                            });
                        });
                    });
                });
                op2.case(0b0110, |b| {
                    b.check(29, 2, 0, |b| {
                        let forms = [
                            (0b000010, Udiv),
                            (0b000011, Sdiv),
                            (0b001000, Lslv),
                            (0b001001, Lsrv),
                            (0b001010, Asrv),
                            (0b001011, Rorv),
                        ];
                        select(b, 10, 6, &forms, Dec::DataProc2);
                    });
                });
                op2.case(0b1000, |b| {
                    b.check(29, 2, 0, |b| {
                        select(b, 15, 1, &[(0, Madd), (1, Msub)], Dec::DataProc3)
                    });
                });
            });
        });
    });
}

fn floating_point(b: &mut TableBuilder) {
    b.check(24, 8, 0b0001_1110, |b| {
        b.check(21, 1, 1, |b| {
            b.switch(22, 2, |ftype| {
                ftype.case_any(&[0b00, 0b01], fp_scalar);
                ftype.case(0b11, |b| {
                    b.predicate(Pred::Fp16, fp_scalar);
                });
            });
        });
    });
}

fn fp_scalar(b: &mut TableBuilder) {
    b.switch(10, 2, |form| {
        form.case(0b00, |b| {
            b.check(12, 1, 1, |b| {
                b.check(5, 5, 0, |b| {
                    b.decode(FmovImm, Dec::FpImm);
                });
            });
        });
        form.case(0b10, |b| {
            let forms = [(0, Fmul), (1, Fdiv), (2, Fadd), (3, Fsub)];
            select(b, 12, 4, &forms, Dec::FpArith);
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builds() {
        let table = build().unwrap();
        assert_eq!(table.width(), 32);
        assert!(table.len() > 100);
        assert!(table.validate(Dec::COUNT, Pred::COUNT).is_ok());
    }
}
