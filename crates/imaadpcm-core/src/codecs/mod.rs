//! Codec implementations and factory

use crate::error::{CodecError, Result};
use crate::types::{CodecVariant, FormatDescriptor};

pub mod ima_adpcm;

pub use ima_adpcm::BlockCodec;

/// Codec factory for building block codecs from negotiated formats
pub struct CodecFactory;

impl CodecFactory {
    /// Create a block codec for a PCM and an IMA ADPCM descriptor
    ///
    /// Both descriptors must already be validated. The PCM side selects the
    /// variant, the ADPCM side provides the block geometry.
    pub fn create(pcm: &FormatDescriptor, adpcm: &FormatDescriptor) -> Result<BlockCodec> {
        let variant = CodecVariant::select(pcm.channels, pcm.bits_per_sample).ok_or_else(|| {
            CodecError::not_possible(format!(
                "No codec variant for {} channel(s) at {} bits",
                pcm.channels, pcm.bits_per_sample
            ))
        })?;

        let samples_per_block = adpcm
            .samples_per_block
            .ok_or_else(|| CodecError::format_invalid("IMA ADPCM format has no samples per block"))?;

        BlockCodec::new(variant, adpcm.block_align, samples_per_block)
    }

    /// Names of the supported conversions
    pub fn supported_conversions() -> Vec<&'static str> {
        vec![
            "PCM 8-bit mono <-> IMA ADPCM",
            "PCM 16-bit mono <-> IMA ADPCM",
            "PCM 8-bit stereo <-> IMA ADPCM",
            "PCM 16-bit stereo <-> IMA ADPCM",
        ]
    }
}
