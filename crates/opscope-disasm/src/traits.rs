//! Disassembler traits.

use crate::{DecodeError, DisassemblerOptions};
use opscope_core::{Architecture, Instruction};

/// Whether the decoded word satisfied every fixed bit of its encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeStatus {
    Success,
    /// Decoded, but bits the encoding requires to be fixed were not.
    SoftFail,
}

/// Result of decoding an instruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedInstruction {
    /// The decoded instruction.
    pub instruction: Instruction,
    /// Number of bytes consumed.
    pub size: usize,
    /// Decode status.
    pub status: DecodeStatus,
}

impl DecodedInstruction {
    pub fn is_soft_fail(&self) -> bool {
        self.status == DecodeStatus::SoftFail
    }
}

/// Trait for architecture-specific instruction decoders.
pub trait Disassembler: Send + Sync {
    /// Decode a single instruction starting at the given address.
    ///
    /// # Arguments
    /// * `bytes` - The raw bytes to decode
    /// * `address` - The virtual address of the first byte
    /// * `want_detail` - Attach a detail record to the instruction
    fn decode(
        &self,
        bytes: &[u8],
        address: u64,
        want_detail: bool,
    ) -> Result<DecodedInstruction, DecodeError>;

    /// Options this disassembler was created with.
    fn options(&self) -> &DisassemblerOptions;

    /// Returns the minimum instruction size for this architecture.
    fn min_instruction_size(&self) -> usize;

    /// Returns the maximum instruction size for this architecture.
    fn max_instruction_size(&self) -> usize;

    /// Returns whether instructions are fixed-width.
    fn is_fixed_width(&self) -> bool;

    /// Returns the target architecture.
    fn architecture(&self) -> Architecture;

    /// Number of bytes skipped over an undecodable location.
    fn skip_data_size(&self) -> usize;

    /// Mnemonic of a backend opcode id.
    fn instruction_name(&self, opcode: u16) -> Option<&'static str>;

    /// Decode a single instruction, attaching detail if the options ask for it.
    fn decode_instruction(
        &self,
        bytes: &[u8],
        address: u64,
    ) -> Result<DecodedInstruction, DecodeError> {
        self.decode(bytes, address, self.options().detail)
    }

    /// Decode one step of a linear sweep, returning the bytes consumed.
    ///
    /// Failures consume the skip size; in skip-data mode they become data
    /// pseudo-instructions.
    fn step(&self, bytes: &[u8], address: u64) -> (usize, Result<Instruction, DecodeError>) {
        match self.decode_instruction(bytes, address) {
            Ok(decoded) => (decoded.size, Ok(decoded.instruction)),
            Err(e) => {
                let skip = self.skip_data_size().min(bytes.len()).max(1);
                let options = self.options();
                if options.skip_data && !bytes.is_empty() {
                    let data =
                        Instruction::data(address, &bytes[..skip], &options.skip_data_mnemonic);
                    (skip, Ok(data))
                } else {
                    (skip, Err(e))
                }
            }
        }
    }

    /// Iterate over the instructions in `bytes`.
    fn iter<'a>(&'a self, bytes: &'a [u8], address: u64) -> Instructions<'a, Self>
    where
        Self: Sized,
    {
        Instructions {
            disasm: self,
            bytes,
            address,
            offset: 0,
        }
    }

    /// Disassemble a block of code into instructions.
    fn disassemble_block(
        &self,
        bytes: &[u8],
        start_address: u64,
    ) -> Vec<Result<Instruction, DecodeError>> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let address = start_address.wrapping_add(offset as u64);
            let (consumed, result) = self.step(&bytes[offset..], address);
            offset += consumed;
            instructions.push(result);
        }

        instructions
    }

    /// Disassemble at most `count` instructions.
    fn disassemble_count(
        &self,
        bytes: &[u8],
        start_address: u64,
        count: usize,
    ) -> Vec<Result<Instruction, DecodeError>> {
        let mut instructions = Vec::with_capacity(count.min(bytes.len()));
        let mut offset = 0;

        while offset < bytes.len() && instructions.len() < count {
            let address = start_address.wrapping_add(offset as u64);
            let (consumed, result) = self.step(&bytes[offset..], address);
            offset += consumed;
            instructions.push(result);
        }

        instructions
    }
}

/// Iterator over a byte buffer, created by [`Disassembler::iter`].
pub struct Instructions<'a, D: ?Sized> {
    disasm: &'a D,
    bytes: &'a [u8],
    address: u64,
    offset: usize,
}

impl<'a, D: Disassembler + ?Sized> Iterator for Instructions<'a, D> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.bytes.get(self.offset..).filter(|r| !r.is_empty())?;
        let address = self.address.wrapping_add(self.offset as u64);
        let (consumed, result) = self.disasm.step(remaining, address);
        self.offset += consumed;
        Some(result)
    }
}
