//! Disassembly error types.

use thiserror::Error;

/// Error type for instruction decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not enough bytes for the instruction (or for its length prefix).
    #[error("truncated instruction at {address:#x}: need {needed} bytes, have {available}")]
    InsufficientInput {
        address: u64,
        needed: usize,
        available: usize,
    },

    /// No decode table entry matched.
    #[error("unknown opcode at {address:#x}: {bytes:02x?}")]
    UnknownOpcode { address: u64, bytes: Vec<u8> },

    /// An operand decoder rejected the encoding.
    #[error("invalid operand at {address:#x}")]
    InvalidOperand {
        address: u64,
        #[source]
        source: OperandError,
    },

    /// Invalid instruction encoding (reserved length, missing table).
    #[error("invalid encoding at {address:#x}: {reason}")]
    InvalidEncoding { address: u64, reason: String },

    /// A decode table tried to step outside itself or the word.
    #[error("malformed decode table {table} at entry {index}")]
    MalformedTable { table: &'static str, index: usize },
}

impl DecodeError {
    /// Creates a new InsufficientInput error.
    pub fn insufficient_input(address: u64, needed: usize, available: usize) -> Self {
        Self::InsufficientInput {
            address,
            needed,
            available,
        }
    }

    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(address: u64, bytes: &[u8]) -> Self {
        Self::UnknownOpcode {
            address,
            bytes: bytes.to_vec(),
        }
    }

    /// Creates a new InvalidEncoding error.
    pub fn invalid_encoding(address: u64, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            address,
            reason: reason.into(),
        }
    }

    /// Returns true for the "no valid instruction here" kinds, as opposed
    /// to running out of input.
    pub fn is_fail(&self) -> bool {
        !matches!(self, Self::InsufficientInput { .. })
    }

    /// Address of the instruction that failed to decode, if known.
    pub fn address(&self) -> Option<u64> {
        match self {
            Self::InsufficientInput { address, .. }
            | Self::UnknownOpcode { address, .. }
            | Self::InvalidOperand { address, .. }
            | Self::InvalidEncoding { address, .. } => Some(*address),
            Self::MalformedTable { .. } => None,
        }
    }
}

/// Failure inside an operand decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    #[error("field {start}+{len} outside the instruction word")]
    FieldOutOfRange { start: u8, len: u8 },

    #[error("no {class} register with encoding {raw}")]
    InvalidRegister { class: &'static str, raw: u64 },

    #[error("register pair must start at an even register, got {raw}")]
    OddRegisterPair { raw: u64 },

    #[error("reserved {field} value {value:#x}")]
    Reserved { field: &'static str, value: u64 },

    #[error("unsupported encoding: {0}")]
    Unsupported(&'static str),

    #[error("unknown operand decoder {0}")]
    UnknownDecoder(u16),
}

/// A decode table that fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table {table} is empty")]
    Empty { table: &'static str },

    #[error("table {table}: skip distance at entry {index} does not fit in 16 bits")]
    SkipOverflow { table: &'static str, index: usize },

    #[error("table {table}: entry {index} skips past the end")]
    SkipOutOfBounds { table: &'static str, index: usize },

    #[error("table {table}: field at entry {index} lies outside a {width}-bit word")]
    FieldOutOfRange {
        table: &'static str,
        index: usize,
        width: u8,
    },

    #[error("table {table}: value at entry {index} does not fit its field")]
    ValueTooWide { table: &'static str, index: usize },

    #[error("table {table}: entry {index} names unknown decoder {decoder}")]
    UnknownDecoder {
        table: &'static str,
        index: usize,
        decoder: u16,
    },

    #[error("table {table}: entry {index} names unknown predicate {predicate}")]
    UnknownPredicate {
        table: &'static str,
        index: usize,
        predicate: u16,
    },

    #[error("table {table}: filter at entry {index} has no preceding field extraction")]
    DanglingFilter { table: &'static str, index: usize },

    #[error("table {table}: soft-fail mask at entry {index} is not followed by a decode")]
    SoftFailWithoutDecode { table: &'static str, index: usize },

    #[error("table {table} does not end in a terminal entry")]
    Unterminated { table: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_kinds() {
        let short = DecodeError::insufficient_input(0x1000, 4, 2);
        assert!(!short.is_fail());
        assert_eq!(short.address(), Some(0x1000));

        let unknown = DecodeError::unknown_opcode(0x2000, &[0xff, 0xff, 0xff, 0xff]);
        assert!(unknown.is_fail());
        assert!(unknown.to_string().contains("0x2000"));
    }

    #[test]
    fn test_operand_error_source() {
        let err = DecodeError::InvalidOperand {
            address: 4,
            source: OperandError::OddRegisterPair { raw: 5 },
        };
        assert!(err.is_fail());
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("register pair must start at an even register, got 5")
        );
    }
}
