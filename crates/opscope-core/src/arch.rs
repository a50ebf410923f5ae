//! Architecture identification and properties.

use std::str::FromStr;

use crate::Error;

/// Supported CPU architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Architecture {
    /// ARM 64-bit (AArch64)
    Arm64,
    /// RISC-V 64-bit
    RiscV64,
    /// RISC-V 32-bit
    RiscV32,
    /// TI TMS320C64x fixed-point DSP
    Tms320C64x,
    /// Unknown architecture
    Unknown(u16),
}

impl Architecture {
    /// Returns the pointer size in bytes for this architecture.
    pub fn pointer_size(&self) -> usize {
        match self {
            Self::Arm64 | Self::RiscV64 => 8,
            Self::RiscV32 | Self::Tms320C64x => 4,
            Self::Unknown(_) => 8, // Default assumption
        }
    }

    /// Returns whether this is a 64-bit architecture.
    pub fn is_64bit(&self) -> bool {
        matches!(self, Self::Arm64 | Self::RiscV64)
    }

    /// Returns the byte order instructions are encoded in.
    pub fn endianness(&self) -> Endianness {
        match self {
            Self::Tms320C64x => Endianness::Big,
            _ => Endianness::Little,
        }
    }

    /// Returns the name of this architecture.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::RiscV64 => "riscv64",
            Self::RiscV32 => "riscv32",
            Self::Tms320C64x => "tms320c64x",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "riscv64" | "rv64" => Ok(Self::RiscV64),
            "riscv32" | "rv32" => Ok(Self::RiscV32),
            "tms320c64x" | "c64x" => Ok(Self::Tms320C64x),
            _ => Err(Error::UnknownArchitecture(s.to_string())),
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary bitness (32-bit or 64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bitness {
    Bits32,
    Bits64,
}

/// Byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endianness {
    Little,
    Big,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_architecture() {
        assert_eq!("aarch64".parse::<Architecture>().unwrap(), Architecture::Arm64);
        assert_eq!("RV32".parse::<Architecture>().unwrap(), Architecture::RiscV32);
        assert_eq!("c64x".parse::<Architecture>().unwrap(), Architecture::Tms320C64x);
        assert!("vax".parse::<Architecture>().is_err());
    }

    #[test]
    fn test_endianness() {
        assert_eq!(Architecture::Tms320C64x.endianness(), Endianness::Big);
        assert_eq!(Architecture::RiscV64.endianness(), Endianness::Little);
    }
}
