//! Instruction word assembly from a byte buffer.

use opscope_core::Endianness;

use crate::DecodeError;

/// Longest instruction any backend reads.
pub const MAX_WORD_BYTES: usize = 8;

/// One instruction word, read-only once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionWord {
    value: u64,
    address: u64,
    bytes: [u8; MAX_WORD_BYTES],
    size: usize,
}

impl InstructionWord {
    /// Assembles a word from the first `size` bytes of `raw`.
    ///
    /// Returns `None` if `raw` is shorter than `size` or `size` is not
    /// between 1 and 8.
    pub fn from_bytes(
        raw: &[u8],
        size: usize,
        address: u64,
        endianness: Endianness,
    ) -> Option<Self> {
        if size == 0 || size > MAX_WORD_BYTES {
            return None;
        }
        let src = raw.get(..size)?;
        let mut bytes = [0u8; MAX_WORD_BYTES];
        bytes[..size].copy_from_slice(src);

        let value = match endianness {
            Endianness::Little => src
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
            Endianness::Big => src.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
        };

        Some(Self {
            value,
            address,
            bytes,
            size,
        })
    }

    /// Raw value of the whole word.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Width in bits.
    pub fn width(&self) -> u8 {
        (self.size * 8) as u8
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Address of the first byte.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// The bytes the word was read from.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.size]
    }

    /// Extracts `len` bits starting at bit `start` (bit 0 is the LSB).
    ///
    /// Returns `None` if the field is empty or extends past the word.
    pub fn field(&self, start: u8, len: u8) -> Option<u64> {
        if len == 0 || u32::from(start) + u32::from(len) > u32::from(self.width()) {
            return None;
        }
        let mask = if len >= 64 {
            u64::MAX
        } else {
            (1u64 << len) - 1
        };
        Some((self.value >> start) & mask)
    }

    /// Single bit at `pos`.
    pub fn bit(&self, pos: u8) -> Option<bool> {
        self.field(pos, 1).map(|b| b == 1)
    }
}

/// How many bytes an instruction occupies.
#[derive(Debug, Clone, Copy)]
pub enum WidthRule {
    /// Every instruction has the same size.
    Fixed(usize),
    /// The size is chosen from the first `min` bytes; `select` returns
    /// `None` for a reserved length.
    Prefix {
        min: usize,
        max: usize,
        select: fn(&[u8]) -> Option<usize>,
    },
}

impl WidthRule {
    pub fn min_size(&self) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::Prefix { min, .. } => *min,
        }
    }

    pub fn max_size(&self) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::Prefix { max, .. } => *max,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// Reads one instruction word from `bytes`.
pub fn read_word(
    bytes: &[u8],
    address: u64,
    endianness: Endianness,
    rule: WidthRule,
) -> Result<InstructionWord, DecodeError> {
    let min = rule.min_size();
    if bytes.len() < min {
        return Err(DecodeError::insufficient_input(address, min, bytes.len()));
    }

    let size = match rule {
        WidthRule::Fixed(n) => n,
        WidthRule::Prefix { select, .. } => select(&bytes[..min]).ok_or_else(|| {
            DecodeError::invalid_encoding(address, "reserved instruction length")
        })?,
    };

    if bytes.len() < size {
        return Err(DecodeError::insufficient_input(address, size, bytes.len()));
    }

    InstructionWord::from_bytes(bytes, size, address, endianness)
        .ok_or_else(|| DecodeError::invalid_encoding(address, "unsupported instruction length"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_or_four(prefix: &[u8]) -> Option<usize> {
        match prefix[0] & 3 {
            3 => Some(4),
            0 => None,
            _ => Some(2),
        }
    }

    const PREFIX: WidthRule = WidthRule::Prefix {
        min: 2,
        max: 4,
        select: two_or_four,
    };

    #[test]
    fn test_fixed_little_endian() {
        // add x0, x1, #1
        let bytes = [0x20, 0x04, 0x00, 0x91, 0xff];
        let word = read_word(&bytes, 0x1000, Endianness::Little, WidthRule::Fixed(4)).unwrap();
        assert_eq!(word.value(), 0x9100_0420);
        assert_eq!(word.size(), 4);
        assert_eq!(word.width(), 32);
        assert_eq!(word.bytes(), &bytes[..4]);
        assert_eq!(word.address(), 0x1000);
    }

    #[test]
    fn test_fixed_big_endian() {
        let bytes = [0x01, 0x88, 0x20, 0x78];
        let word = read_word(&bytes, 0, Endianness::Big, WidthRule::Fixed(4)).unwrap();
        assert_eq!(word.value(), 0x0188_2078);
    }

    #[test]
    fn test_field_bounds() {
        let word = InstructionWord::from_bytes(&[0xff, 0xff], 2, 0, Endianness::Little).unwrap();
        assert_eq!(word.field(0, 16), Some(0xffff));
        assert_eq!(word.field(12, 4), Some(0xf));
        assert_eq!(word.field(12, 5), None);
        assert_eq!(word.field(0, 0), None);
        assert_eq!(word.bit(15), Some(true));
        assert_eq!(word.bit(16), None);
    }

    #[test]
    fn test_truncated_input() {
        let err = read_word(&[0x13, 0x05, 0x00], 0x40, Endianness::Little, WidthRule::Fixed(4))
            .unwrap_err();
        assert_eq!(err, DecodeError::insufficient_input(0x40, 4, 3));

        let err = read_word(&[0x13], 0, Endianness::Little, PREFIX).unwrap_err();
        assert_eq!(err, DecodeError::insufficient_input(0, 2, 1));

        // prefix selects 4 bytes, only 2 present
        let err = read_word(&[0x13, 0x05], 0, Endianness::Little, PREFIX).unwrap_err();
        assert_eq!(err, DecodeError::insufficient_input(0, 4, 2));
    }

    #[test]
    fn test_prefix_selection() {
        let word = read_word(&[0x05, 0x05, 0xaa, 0xbb], 0, Endianness::Little, PREFIX).unwrap();
        assert_eq!(word.size(), 2);
        assert_eq!(word.value(), 0x0505);

        let err = read_word(&[0x00, 0x00], 0, Endianness::Little, PREFIX).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEncoding { .. }));
    }
}
