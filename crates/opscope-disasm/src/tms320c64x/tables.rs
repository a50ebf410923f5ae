//! TMS320C64x decode table, keyed on the format bits in 6..2.

use std::sync::OnceLock;

use super::decoders::Dec;
use super::opcodes::Opcode::{self, *};
use crate::engine::{DecodeTable, TableBuilder};
use crate::error::TableError;

/// The decode table, built on first use.
///
/// # Panics
///
/// Panics if the table fails validation, which only a bug in this module
/// can cause.
pub(crate) fn decode_table() -> &'static DecodeTable {
    static TABLE: OnceLock<DecodeTable> = OnceLock::new();
    TABLE.get_or_init(|| build().unwrap_or_else(|e| panic!("tms320c64x decode table: {e}")))
}

fn select(b: &mut TableBuilder, start: u8, len: u8, entries: &[(u64, Opcode, Dec)]) {
    b.switch(start, len, |cases| {
        for &(value, opcode, decoder) in entries {
            cases.case(value, |b| {
                b.decode(opcode, decoder);
            });
        }
    });
}

pub(crate) fn build() -> Result<DecodeTable, TableError> {
    let mut b = TableBuilder::new("tms320c64x", 32);
    b.check(17, 15, 0, |b| {
        b.check(1, 12, 0, |b| {
            b.check(13, 4, 0b1111, |b| {
                b.decode(Idle, Dec::Idle);
            });
            b.decode(Nop, Dec::Nop);
        });
    });
    b.switch(2, 2, |format| {
        format.case(0b00, |b| {
            b.switch(4, 2, |group| {
                group.case(0b00, |b| {
                    b.check(6, 1, 0, |b| {
                        m_unit(b);
                        b.fail();
                    });
                    d_unit(b);
                });
                group.case(0b01, |b| {
                    b.check(6, 1, 0, |b| {
                        b.decode(B, Dec::BranchDisp);
                    });
                    b.decode(Addk, Dec::Addk);
                });
                group.case(0b10, s_unit);
            });
        });
        format.case(0b01, load_store);
        format.case(0b10, |b| {
            b.check(4, 1, 1, |b| {
                l_unit(b);
                b.fail();
            });
            b.check(5, 1, 1, |b| {
                b.check(6, 1, 0, |b| {
                    b.decode(Mvk, Dec::Mvk);
                });
                b.decode(Mvkh, Dec::Mvkh);
            });
        });
        format.case(0b11, |b| {
            let forms = [
                (0b000, Ldhu, Dec::LongLoad2),
                (0b001, Ldbu, Dec::LongLoad1),
                (0b010, Ldb, Dec::LongLoad1),
                (0b011, Stb, Dec::LongStore1),
                (0b100, Ldh, Dec::LongLoad2),
                (0b101, Sth, Dec::LongStore2),
                (0b110, Ldw, Dec::LongLoad4),
                (0b111, Stw, Dec::LongStore4),
            ];
            select(b, 4, 3, &forms);
        });
    });
    b.finish(Dec::COUNT, 0)
}

fn l_unit(b: &mut TableBuilder) {
    b.switch(5, 7, |op| {
        let forms = [
            (0b0000011, Add, Dec::LRegs),
            (0b0000010, Add, Dec::LConst),
            (0b0100011, Add, Dec::LLongDst),
            (0b0100001, Add, Dec::LLongSrc),
            (0b0000111, Sub, Dec::LRegs),
            (0b0000110, Sub, Dec::LConst),
            (0b1111011, And, Dec::LRegs),
            (0b1111010, And, Dec::LConst),
            (0b1111111, Or, Dec::LRegs),
            (0b1111110, Or, Dec::LConst),
            (0b1101111, Xor, Dec::LRegs),
            (0b1101110, Xor, Dec::LConst),
            (0b1010011, Cmpeq, Dec::LRegs),
            (0b1010010, Cmpeq, Dec::LConst),
            (0b1000111, Cmpgt, Dec::LRegs),
            (0b1000110, Cmpgt, Dec::LConst),
            (0b1010111, Cmplt, Dec::LRegs),
            (0b1010110, Cmplt, Dec::LConst),
        ];
        for (value, opcode, decoder) in forms {
            op.case(value, |b| {
                b.decode(opcode, decoder);
            });
        }
        // src1 is unused
        op.case(0b0011010, |b| {
            b.decode_checked(Abs, Dec::LUnary, 0x1f << 13, 0);
        });
    });
}

fn s_unit(b: &mut TableBuilder) {
    b.switch(6, 6, |op| {
        let forms = [
            (0b000111, Add, Dec::SRegs),
            (0b000110, Add, Dec::SConst),
            (0b010111, Sub, Dec::SRegs),
            (0b010110, Sub, Dec::SConst),
            (0b011111, And, Dec::SRegs),
            (0b011110, And, Dec::SConst),
            (0b011011, Or, Dec::SRegs),
            (0b011010, Or, Dec::SConst),
            (0b001011, Xor, Dec::SRegs),
            (0b001010, Xor, Dec::SConst),
            (0b110011, Shl, Dec::SShift),
            (0b110010, Shl, Dec::SShiftConst),
            (0b110111, Shr, Dec::SShift),
            (0b110110, Shr, Dec::SShiftConst),
            (0b100111, Shru, Dec::SShift),
            (0b100110, Shru, Dec::SShiftConst),
        ];
        for (value, opcode, decoder) in forms {
            op.case(value, |b| {
                b.decode(opcode, decoder);
            });
        }

        // the remaining forms exist on .S2 only
        op.case(0b001110, |b| {
            b.check(1, 1, 1, |b| {
                b.decode(Mvc, Dec::MvcTo);
            });
        });
        op.case(0b001111, |b| {
            b.check(1, 1, 1, |b| {
                b.decode_checked(Mvc, Dec::MvcFrom, 1 << 12, 0);
            });
        });
        op.case(0b001101, |b| {
            b.check(1, 1, 1, |b| {
                b.decode_checked(BReg, Dec::BranchReg, (0x1f << 23) | (0x1f << 13), 0);
            });
        });
        op.case(0b000011, |b| {
            b.check(1, 1, 1, |b| {
                // IRP and NRP
                b.switch(18, 5, |pointer| {
                    pointer.case_any(&[6, 7], |b| {
                        b.decode_checked(
                            BReturn,
                            Dec::BranchReturn,
                            (0x1f << 23) | (0x3f << 12),
                            0,
                        );
                    });
                });
            });
        });
    });
}

fn m_unit(b: &mut TableBuilder) {
    let forms = [
        (0b11001, Mpy, Dec::MRegs),
        (0b11000, Mpy, Dec::MConst),
        (0b00001, Mpyh, Dec::MRegs),
        (0b01001, Mpyhl, Dec::MRegs),
        (0b10001, Mpylh, Dec::MRegs),
        (0b11111, Mpyu, Dec::MRegs),
        (0b11010, Smpy, Dec::MRegs),
    ];
    select(b, 7, 5, &forms);
}

fn d_unit(b: &mut TableBuilder) {
    let forms = [
        (0b010000, Add, Dec::DRegs),
        (0b010010, Add, Dec::DConst),
        (0b010001, Sub, Dec::DRegs),
        (0b010011, Sub, Dec::DConst),
        (0b110000, Addab, Dec::DRegs),
        (0b110010, Addab, Dec::DConst),
        (0b110100, Addah, Dec::DRegs),
        (0b110110, Addah, Dec::DConst),
        (0b111000, Addaw, Dec::DRegs),
        (0b111010, Addaw, Dec::DConst),
        (0b110001, Subab, Dec::DRegs),
        (0b110011, Subab, Dec::DConst),
        (0b110101, Subah, Dec::DRegs),
        (0b110111, Subah, Dec::DConst),
        (0b111001, Subaw, Dec::DRegs),
        (0b111011, Subaw, Dec::DConst),
    ];
    select(b, 7, 6, &forms);
}

fn load_store(b: &mut TableBuilder) {
    b.switch(8, 1, |r| {
        r.case(0, |b| {
            let forms = [
                (0b000, Ldhu, Dec::Load2),
                (0b001, Ldbu, Dec::Load1),
                (0b010, Ldb, Dec::Load1),
                (0b011, Stb, Dec::Store1),
                (0b100, Ldh, Dec::Load2),
                (0b101, Sth, Dec::Store2),
                (0b110, Ldw, Dec::Load4),
                (0b111, Stw, Dec::Store4),
            ];
            select(b, 4, 3, &forms);
        });
        r.case(1, |b| {
            let forms = [
                (0b010, Ldndw, Dec::LoadWide),
                (0b011, Ldnw, Dec::Load4),
                (0b100, Stdw, Dec::Store8),
                (0b101, Stnw, Dec::Store4),
                (0b110, Lddw, Dec::Load8),
                (0b111, Stndw, Dec::StoreWide),
            ];
            select(b, 4, 3, &forms);
        });
    });
}
