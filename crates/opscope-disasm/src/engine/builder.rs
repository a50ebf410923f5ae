//! Structured construction of decode tables.
//!
//! Backends describe their decision tree with nested closures; the builder
//! flattens it into forward skips.
//!
//! ```ignore
//! let mut b = TableBuilder::new("demo", 32);
//! b.switch(27, 5, |cases| {
//!     cases.case(0b00001, |b| b.decode(ADD, DEC_RRI));
//!     cases.case(0b00010, |b| b.decode(SUB, DEC_RRI));
//! });
//! let table = b.finish(DECODERS, PREDICATES)?;
//! ```

use tracing::debug;

use super::table::{DecodeTable, DecoderOp};
use crate::error::TableError;

/// Incrementally builds a [`DecodeTable`].
#[derive(Debug)]
pub struct TableBuilder {
    name: &'static str,
    width: u8,
    ops: Vec<DecoderOp>,
    overflow: Option<usize>,
}

impl TableBuilder {
    pub fn new(name: &'static str, width: u8) -> Self {
        Self {
            name,
            width,
            ops: Vec::new(),
            overflow: None,
        }
    }

    /// If bits `start..start+len` equal `value`, continue into `body`;
    /// otherwise skip it. A body that does not terminate falls through to
    /// whatever follows.
    pub fn check(
        &mut self,
        start: u8,
        len: u8,
        value: u64,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        let at = self.push(DecoderOp::CheckField {
            start,
            len,
            value,
            skip: 0,
        });
        body(self);
        self.patch(at);
        self
    }

    /// Enter `body` only if predicate `index` holds.
    pub fn predicate(&mut self, index: impl Into<u16>, body: impl FnOnce(&mut Self)) -> &mut Self {
        let at = self.push(DecoderOp::CheckPredicate {
            index: index.into(),
            skip: 0,
        });
        body(self);
        self.patch(at);
        self
    }

    /// Multi-way branch on bits `start..start+len`. Each case ends in
    /// `Fail`; a value with no case falls through.
    pub fn switch(&mut self, start: u8, len: u8, cases: impl FnOnce(&mut Cases<'_>)) -> &mut Self {
        self.push(DecoderOp::ExtractField { start, len });
        cases(&mut Cases { builder: self });
        self
    }

    /// Terminal: decode `opcode` with operand decoder `decoder`.
    pub fn decode(&mut self, opcode: impl Into<u16>, decoder: impl Into<u16>) -> &mut Self {
        self.push(DecoderOp::Decode {
            opcode: opcode.into(),
            decoder: decoder.into(),
        });
        self
    }

    /// Terminal: decode, reporting soft-fail unless the masked bits hold.
    pub fn decode_checked(
        &mut self,
        opcode: impl Into<u16>,
        decoder: impl Into<u16>,
        should_be_zero: u64,
        should_be_one: u64,
    ) -> &mut Self {
        self.push(DecoderOp::SoftFail {
            should_be_zero,
            should_be_one,
        });
        self.decode(opcode, decoder)
    }

    /// Terminal: no match.
    pub fn fail(&mut self) -> &mut Self {
        self.push(DecoderOp::Fail);
        self
    }

    /// Appends the trailing `Fail`, validates and returns the table.
    pub fn finish(mut self, decoders: usize, predicates: usize) -> Result<DecodeTable, TableError> {
        if let Some(index) = self.overflow {
            return Err(TableError::SkipOverflow {
                table: self.name,
                index,
            });
        }
        self.ops.push(DecoderOp::Fail);
        let table = DecodeTable::new(self.name, self.width, self.ops);
        table.validate(decoders, predicates)?;
        debug!(
            table = table.name(),
            width = table.width(),
            entries = table.len(),
            "built decode table"
        );
        Ok(table)
    }

    fn push(&mut self, op: DecoderOp) -> usize {
        self.ops.push(op);
        self.ops.len() - 1
    }

    /// Points the skip of entry `at` at the next entry to be pushed.
    fn patch(&mut self, at: usize) {
        let distance = self.ops.len() - at - 1;
        let Ok(distance) = u16::try_from(distance) else {
            self.overflow.get_or_insert(at);
            return;
        };
        match &mut self.ops[at] {
            DecoderOp::FilterValue { skip, .. }
            | DecoderOp::CheckField { skip, .. }
            | DecoderOp::CheckPredicate { skip, .. } => *skip = distance,
            _ => {}
        }
    }
}

/// Case list of a [`TableBuilder::switch`].
pub struct Cases<'a> {
    builder: &'a mut TableBuilder,
}

impl Cases<'_> {
    /// Adds a case for `value`.
    pub fn case(&mut self, value: u64, body: impl FnOnce(&mut TableBuilder)) -> &mut Self {
        let at = self.builder.push(DecoderOp::FilterValue { value, skip: 0 });
        body(self.builder);
        self.builder.push(DecoderOp::Fail);
        self.builder.patch(at);
        self
    }

    /// Adds the same body for several values.
    pub fn case_any(&mut self, values: &[u64], body: impl Fn(&mut TableBuilder)) -> &mut Self {
        for &value in values {
            self.case(value, &body);
        }
        self
    }
}
