//! Runtime disassembler configuration.

use bitflags::bitflags;

bitflags! {
    /// Optional instruction-set extensions recognized by the decoders.
    ///
    /// Flags parse from text, e.g. `"ARM64_FP | ARM64_NEON"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct Features: u32 {
        const ARM64_FP = 1 << 0;
        const ARM64_FP16 = 1 << 1;
        const ARM64_NEON = 1 << 2;
        const RISCV_M = 1 << 8;
        const RISCV_F = 1 << 9;
        const RISCV_D = 1 << 10;
        const RISCV_C = 1 << 11;
        const RISCV_ZICSR = 1 << 12;
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::all()
    }
}

impl Features {
    /// Parses a `|`-separated list of flag names.
    pub fn parse(text: &str) -> Result<Self, bitflags::parser::ParseError> {
        bitflags::parser::from_str(text)
    }
}

/// Options controlling decoding and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisassemblerOptions {
    /// Produce a detail record for every instruction.
    pub detail: bool,
    /// Emit data pseudo-instructions over undecodable bytes during block
    /// disassembly instead of errors.
    pub skip_data: bool,
    /// Mnemonic used for skipped data.
    pub skip_data_mnemonic: String,
    /// Print immediates as unsigned values.
    pub unsigned_immediates: bool,
    /// Enabled instruction-set extensions.
    pub features: Features,
}

impl Default for DisassemblerOptions {
    fn default() -> Self {
        Self {
            detail: false,
            skip_data: false,
            skip_data_mnemonic: ".byte".to_string(),
            unsigned_immediates: false,
            features: Features::default(),
        }
    }
}

impl DisassemblerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(mut self, detail: bool) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_skip_data(mut self, skip_data: bool) -> Self {
        self.skip_data = skip_data;
        self
    }

    pub fn with_skip_data_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.skip_data_mnemonic = mnemonic.into();
        self
    }

    pub fn with_unsigned_immediates(mut self, unsigned: bool) -> Self {
        self.unsigned_immediates = unsigned;
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }
}
