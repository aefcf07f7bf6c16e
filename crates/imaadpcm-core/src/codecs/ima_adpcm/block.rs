//! IMA ADPCM block headers
//!
//! Every block starts with one 4-byte header per channel: the first sample
//! as a little-endian `i16`, the step index and a zero pad byte.

use super::adpcm::is_valid_step_index;
use crate::error::{CodecError, Result};

/// Bytes in one channel header
pub const BLOCK_HEADER_SIZE: usize = 4;

/// Header of one channel within a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// First sample of the block, stored uncompressed
    pub predicted: i16,
    /// Step index in effect for the first encoded nibble
    pub step_index: u8,
}

impl BlockHeader {
    /// Create a header
    pub fn new(predicted: i16, step_index: u8) -> Self {
        Self {
            predicted,
            step_index,
        }
    }

    /// Parse a header from the first four bytes of `data`
    ///
    /// The step index is returned as stored; use [`BlockHeader::is_valid`]
    /// before decoding with it.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let bytes = data.get(..BLOCK_HEADER_SIZE)?;
        Some(Self {
            predicted: i16::from_le_bytes([bytes[0], bytes[1]]),
            step_index: bytes[2],
        })
    }

    /// Serialize the header
    pub fn to_bytes(self) -> [u8; BLOCK_HEADER_SIZE] {
        let [lo, hi] = self.predicted.to_le_bytes();
        [lo, hi, self.step_index, 0]
    }

    /// Check whether the step index is inside the step table
    pub fn is_valid(&self) -> bool {
        is_valid_step_index(self.step_index)
    }
}

/// Check every channel header of every whole block in `data`
///
/// Returns the first corrupt header found. Trailing bytes that do not form
/// a whole block are not examined.
pub fn check_block_headers(data: &[u8], block_align: usize, channels: usize) -> Result<()> {
    if block_align == 0 {
        return Ok(());
    }

    for (block, chunk) in data.chunks_exact(block_align).enumerate() {
        for channel in 0..channels {
            let offset = channel * BLOCK_HEADER_SIZE;
            let header = BlockHeader::parse(&chunk[offset..]).ok_or_else(|| {
                CodecError::format_invalid(format!(
                    "Block of {} bytes too small for {} channel header(s)",
                    block_align, channels
                ))
            })?;

            if !header.is_valid() {
                return Err(CodecError::StreamCorrupt {
                    block,
                    channel,
                    step_index: header.step_index,
                });
            }
        }
    }

    Ok(())
}
