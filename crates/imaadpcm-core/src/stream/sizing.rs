//! Buffer size arithmetic for open streams
//!
//! Sizes are 32-bit byte counts. Any product that does not fit fails with
//! `ConversionNotPossible` instead of wrapping.

use crate::error::{CodecError, Result};
use crate::types::{Direction, FormatDescriptor};
use tracing::debug;

/// Block geometry of an open stream, seen from both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamGeometry {
    direction: Direction,
    adpcm_block_align: u32,
    pcm_bytes_per_block: u32,
}

impl StreamGeometry {
    /// Build the geometry for a validated PCM/ADPCM pair
    pub fn new(direction: Direction, pcm: &FormatDescriptor, adpcm: &FormatDescriptor) -> Result<Self> {
        let samples_per_block = adpcm
            .samples_per_block
            .ok_or_else(|| CodecError::format_invalid("IMA ADPCM format has no samples per block"))?;

        let adpcm_block_align = u32::from(adpcm.block_align);
        let pcm_bytes_per_block = u32::from(samples_per_block) * u32::from(pcm.block_align);
        if adpcm_block_align == 0 || pcm_bytes_per_block == 0 {
            return Err(CodecError::format_invalid("Stream block geometry is empty"));
        }

        Ok(Self {
            direction,
            adpcm_block_align,
            pcm_bytes_per_block,
        })
    }

    /// Direction of the stream
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Bytes per encoded block
    pub fn adpcm_block_align(&self) -> u32 {
        self.adpcm_block_align
    }

    /// PCM bytes per encoded block
    pub fn pcm_bytes_per_block(&self) -> u32 {
        self.pcm_bytes_per_block
    }

    fn source_block_size(&self) -> u32 {
        match self.direction {
            Direction::Encode => self.pcm_bytes_per_block,
            Direction::Decode => self.adpcm_block_align,
        }
    }

    fn destination_block_size(&self) -> u32 {
        match self.direction {
            Direction::Encode => self.adpcm_block_align,
            Direction::Decode => self.pcm_bytes_per_block,
        }
    }

    /// Destination bytes needed for `src_len` source bytes
    ///
    /// A trailing partial source block counts as a whole block. Decoding
    /// needs at least one whole source block.
    pub fn max_output_size(&self, src_len: u32) -> Result<u32> {
        let src_block = self.source_block_size();
        let full_blocks = src_len / src_block;

        if self.direction == Direction::Decode && full_blocks == 0 {
            return Err(CodecError::not_possible(format!(
                "Source of {} bytes holds no whole {}-byte block",
                src_len, src_block
            )));
        }

        let blocks = if src_len % src_block == 0 {
            full_blocks
        } else {
            full_blocks + 1
        };

        let size = blocks
            .checked_mul(self.destination_block_size())
            .ok_or_else(|| overflow(blocks, self.destination_block_size()))?;

        if size == 0 {
            return Err(CodecError::not_possible("Empty source buffer"));
        }

        debug!(
            "Size query ({:?}): {} source bytes -> {} destination bytes",
            self.direction, src_len, size
        );
        Ok(size)
    }

    /// Largest source byte count whose output fits in `dst_len` bytes
    ///
    /// Rounds down to whole blocks; a destination smaller than one block
    /// cannot hold any output.
    pub fn max_input_size(&self, dst_len: u32) -> Result<u32> {
        let dst_block = self.destination_block_size();
        let blocks = dst_len / dst_block;
        if blocks == 0 {
            return Err(CodecError::not_possible(format!(
                "Destination of {} bytes holds no whole {}-byte block",
                dst_len, dst_block
            )));
        }

        let size = blocks
            .checked_mul(self.source_block_size())
            .ok_or_else(|| overflow(blocks, self.source_block_size()))?;

        debug!(
            "Size query ({:?}): {} destination bytes <- {} source bytes",
            self.direction, dst_len, size
        );
        Ok(size)
    }
}

fn overflow(blocks: u32, bytes_per_block: u32) -> CodecError {
    CodecError::not_possible(format!(
        "{} blocks of {} bytes overflow a 32-bit size",
        blocks, bytes_per_block
    ))
}
