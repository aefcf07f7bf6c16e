//! Format descriptor validation
//!
//! Validation is purely structural: a descriptor either describes a stream
//! this codec can carry or it is rejected with the first failing field.

use crate::error::{CodecError, Result};
use crate::types::{FormatDescriptor, FormatTag};
use crate::utils::geometry;

/// Validate a linear PCM descriptor
pub fn validate_pcm_format(format: &FormatDescriptor) -> Result<()> {
    if format.tag != FormatTag::Pcm {
        return Err(CodecError::format_invalid(format!(
            "Expected PCM format, got {}",
            format.tag
        )));
    }

    if !(1..=2).contains(&format.channels) {
        return Err(CodecError::format_invalid(format!(
            "PCM channel count must be 1 or 2, got {}",
            format.channels
        )));
    }

    if format.bits_per_sample != 8 && format.bits_per_sample != 16 {
        return Err(CodecError::format_invalid(format!(
            "PCM bits per sample must be 8 or 16, got {}",
            format.bits_per_sample
        )));
    }

    let expected_align = geometry::pcm_block_align(format.channels, format.bits_per_sample);
    if format.block_align != expected_align {
        return Err(CodecError::format_invalid(format!(
            "PCM block alignment {} does not match {} channel(s) at {} bits",
            format.block_align, format.channels, format.bits_per_sample
        )));
    }

    let expected_avg = u64::from(format.sample_rate) * u64::from(format.block_align);
    if u64::from(format.avg_bytes_per_sec) != expected_avg {
        return Err(CodecError::format_invalid(format!(
            "PCM average bytes per second {} should be {}",
            format.avg_bytes_per_sec, expected_avg
        )));
    }

    Ok(())
}

/// Validate an IMA ADPCM descriptor
///
/// Besides the fixed fields, the samples-per-block value must be the one
/// derived from the block alignment, so headers that are only locally
/// plausible are rejected too.
pub fn validate_ima_adpcm_format(format: &FormatDescriptor) -> Result<()> {
    if format.tag != FormatTag::ImaAdpcm {
        return Err(CodecError::format_invalid(format!(
            "Expected IMA ADPCM format, got {}",
            format.tag
        )));
    }

    if format.bits_per_sample != geometry::IMA_ADPCM_BITS_PER_SAMPLE {
        return Err(CodecError::format_invalid(format!(
            "IMA ADPCM bits per sample must be 4, got {}",
            format.bits_per_sample
        )));
    }

    if !(1..=2).contains(&format.channels) {
        return Err(CodecError::format_invalid(format!(
            "IMA ADPCM channel count must be 1 or 2, got {}",
            format.channels
        )));
    }

    let header = geometry::HEADER_BYTES_PER_CHANNEL * format.channels;
    if format.block_align == 0 || format.block_align % header != 0 {
        return Err(CodecError::format_invalid(format!(
            "IMA ADPCM block alignment {} is not a multiple of {}",
            format.block_align, header
        )));
    }

    if format.extra_size != geometry::IMA_ADPCM_EXTRA_SIZE {
        return Err(CodecError::format_invalid(format!(
            "IMA ADPCM extra size must be 2, got {}",
            format.extra_size
        )));
    }

    let samples_per_block = format
        .samples_per_block
        .ok_or_else(|| CodecError::format_invalid("IMA ADPCM format has no samples per block"))?;

    if samples_per_block < 5 || samples_per_block % 4 != 1 {
        return Err(CodecError::format_invalid(format!(
            "IMA ADPCM samples per block must be 4n+1 with n >= 1, got {}",
            samples_per_block
        )));
    }

    let expected = geometry::samples_per_block(format.block_align, format.channels)?;
    if samples_per_block != expected {
        return Err(CodecError::format_invalid(format!(
            "IMA ADPCM samples per block {} inconsistent with block alignment {} (expected {})",
            samples_per_block, format.block_align, expected
        )));
    }

    Ok(())
}

/// Validate a descriptor of either supported tag
pub fn validate_format(format: &FormatDescriptor) -> Result<()> {
    match format.tag {
        FormatTag::Pcm => validate_pcm_format(format),
        FormatTag::ImaAdpcm => validate_ima_adpcm_format(format),
    }
}
