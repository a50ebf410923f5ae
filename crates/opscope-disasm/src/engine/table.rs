//! Decode table representation and validation.

use crate::error::TableError;

/// One step of a decode table.
///
/// Skips are relative to the following entry: a mismatch at index `i`
/// continues at `i + 1 + skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderOp {
    /// Load `len` bits at `start` into the field register.
    ExtractField { start: u8, len: u8 },
    /// Compare the field register with `value`; skip on mismatch.
    FilterValue { value: u64, skip: u16 },
    /// Compare `len` bits at `start` with `value`; skip on mismatch. The
    /// field register is left alone.
    CheckField {
        start: u8,
        len: u8,
        value: u64,
        skip: u16,
    },
    /// Evaluate a backend predicate; skip if false.
    CheckPredicate { index: u16, skip: u16 },
    /// Bits that should be zero/one for the following `Decode`; a mismatch
    /// downgrades the result to soft-fail.
    SoftFail { should_be_zero: u64, should_be_one: u64 },
    /// Run operand decoder `decoder` and produce `opcode`.
    Decode { opcode: u16, decoder: u16 },
    /// No instruction matches.
    Fail,
}

impl DecoderOp {
    /// Returns true for entries that end a trace.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Fail)
    }

    fn skip(&self) -> Option<u16> {
        match self {
            Self::FilterValue { skip, .. }
            | Self::CheckField { skip, .. }
            | Self::CheckPredicate { skip, .. } => Some(*skip),
            _ => None,
        }
    }
}

fn fits(value: u64, len: u8) -> bool {
    len >= 64 || value >> len == 0
}

/// An immutable decode table for one instruction width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    name: &'static str,
    width: u8,
    ops: Box<[DecoderOp]>,
}

impl DecodeTable {
    /// Wraps `ops` without validating them. See [`DecodeTable::validate`].
    pub fn new(name: &'static str, width: u8, ops: Vec<DecoderOp>) -> Self {
        Self {
            name,
            width,
            ops: ops.into_boxed_slice(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Width in bits of the words this table decodes.
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn ops(&self) -> &[DecoderOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DecoderOp> {
        self.ops.get(index)
    }

    /// Checks the structural invariants the interpreter relies on.
    ///
    /// `decoders` and `predicates` are the number of operand decoders and
    /// predicates the backend provides.
    pub fn validate(&self, decoders: usize, predicates: usize) -> Result<(), TableError> {
        let table = self.name;
        let len = self.ops.len();
        match self.ops.last() {
            None => return Err(TableError::Empty { table }),
            Some(last) if !last.is_terminal() => return Err(TableError::Unterminated { table }),
            Some(_) => {}
        }

        // Possible field-register widths at each entry: bit 0 means nothing
        // has been extracted yet, bit n means an n-bit field is loaded.
        let mut reach = vec![0u128; len];
        reach[0] = 1;

        for (index, op) in self.ops.iter().enumerate() {
            let state = reach[index];

            if let Some(skip) = op.skip() {
                let target = index + 1 + usize::from(skip);
                if target >= len {
                    return Err(TableError::SkipOutOfBounds { table, index });
                }
                reach[target] |= state;
            }

            match *op {
                DecoderOp::ExtractField { start, len: field } => {
                    self.check_field(index, start, field)?;
                    reach[index + 1] |= 1u128 << field;
                }
                DecoderOp::FilterValue { value, .. } => {
                    if state & 1 != 0 {
                        return Err(TableError::DanglingFilter { table, index });
                    }
                    if state != 0 && !fits(value, state.trailing_zeros() as u8) {
                        return Err(TableError::ValueTooWide { table, index });
                    }
                    reach[index + 1] |= state;
                }
                DecoderOp::CheckField {
                    start,
                    len: field,
                    value,
                    ..
                } => {
                    self.check_field(index, start, field)?;
                    if !fits(value, field) {
                        return Err(TableError::ValueTooWide { table, index });
                    }
                    reach[index + 1] |= state;
                }
                DecoderOp::CheckPredicate { index: predicate, .. } => {
                    if usize::from(predicate) >= predicates {
                        return Err(TableError::UnknownPredicate {
                            table,
                            index,
                            predicate,
                        });
                    }
                    reach[index + 1] |= state;
                }
                DecoderOp::SoftFail {
                    should_be_zero,
                    should_be_one,
                } => {
                    if !matches!(self.ops.get(index + 1), Some(DecoderOp::Decode { .. })) {
                        return Err(TableError::SoftFailWithoutDecode { table, index });
                    }
                    if !fits(should_be_zero | should_be_one, self.width) {
                        return Err(TableError::ValueTooWide { table, index });
                    }
                    reach[index + 1] |= state;
                }
                DecoderOp::Decode { decoder, .. } => {
                    if usize::from(decoder) >= decoders {
                        return Err(TableError::UnknownDecoder {
                            table,
                            index,
                            decoder,
                        });
                    }
                }
                DecoderOp::Fail => {}
            }
        }

        Ok(())
    }

    fn check_field(&self, index: usize, start: u8, len: u8) -> Result<(), TableError> {
        if len == 0 || len > 64 || u32::from(start) + u32::from(len) > u32::from(self.width) {
            return Err(TableError::FieldOutOfRange {
                table: self.name,
                index,
                width: self.width,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DecoderOp::*;

    fn table(ops: Vec<DecoderOp>) -> DecodeTable {
        DecodeTable::new("test", 32, ops)
    }

    #[test]
    fn test_valid_table() {
        let t = table(vec![
            ExtractField { start: 27, len: 5 },
            FilterValue { value: 1, skip: 1 },
            Decode { opcode: 0, decoder: 0 },
            FilterValue { value: 2, skip: 2 },
            SoftFail {
                should_be_zero: 0x1f,
                should_be_one: 0,
            },
            Decode { opcode: 1, decoder: 0 },
            Fail,
        ]);
        assert_eq!(t.validate(1, 0), Ok(()));
        assert_eq!(t.len(), 7);
        assert_eq!(t.width(), 32);
    }

    #[test]
    fn test_empty_and_unterminated() {
        assert_eq!(
            table(vec![]).validate(0, 0),
            Err(TableError::Empty { table: "test" })
        );
        assert_eq!(
            table(vec![ExtractField { start: 0, len: 4 }]).validate(0, 0),
            Err(TableError::Unterminated { table: "test" })
        );
    }

    #[test]
    fn test_skip_out_of_bounds() {
        let t = table(vec![
            CheckField {
                start: 0,
                len: 4,
                value: 3,
                skip: 5,
            },
            Fail,
        ]);
        assert_eq!(
            t.validate(0, 0),
            Err(TableError::SkipOutOfBounds {
                table: "test",
                index: 0
            })
        );
    }

    #[test]
    fn test_field_out_of_range() {
        let t = table(vec![ExtractField { start: 30, len: 4 }, Fail]);
        assert!(matches!(
            t.validate(0, 0),
            Err(TableError::FieldOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_value_too_wide() {
        let t = table(vec![
            ExtractField { start: 0, len: 2 },
            FilterValue { value: 4, skip: 0 },
            Fail,
        ]);
        assert!(matches!(
            t.validate(0, 0),
            Err(TableError::ValueTooWide { index: 1, .. })
        ));
    }

    #[test]
    fn test_dangling_filter() {
        let t = table(vec![FilterValue { value: 0, skip: 0 }, Fail]);
        assert!(matches!(
            t.validate(0, 0),
            Err(TableError::DanglingFilter { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_indices() {
        let t = table(vec![Decode { opcode: 0, decoder: 3 }]);
        assert!(matches!(
            t.validate(3, 0),
            Err(TableError::UnknownDecoder { decoder: 3, .. })
        ));
        let t = table(vec![CheckPredicate { index: 1, skip: 0 }, Fail]);
        assert!(matches!(
            t.validate(0, 1),
            Err(TableError::UnknownPredicate { predicate: 1, .. })
        ));
    }

    #[test]
    fn test_soft_fail_needs_decode() {
        let t = table(vec![
            SoftFail {
                should_be_zero: 1,
                should_be_one: 0,
            },
            Fail,
        ]);
        assert!(matches!(
            t.validate(0, 0),
            Err(TableError::SoftFailWithoutDecode { index: 0, .. })
        ));
    }
}
