//! Block geometry for IMA ADPCM streams
//!
//! All functions here are pure. Inputs are expected to describe one or two
//! channels; anything else is reported as an invalid format rather than
//! producing a nonsensical geometry.

use crate::error::{CodecError, Result};

/// Bits per sample of an IMA ADPCM stream
pub const IMA_ADPCM_BITS_PER_SAMPLE: u16 = 4;

/// Size of the IMA ADPCM format extension (the samples-per-block field)
pub const IMA_ADPCM_EXTRA_SIZE: u16 = 2;

/// Bytes of block header per channel
pub const HEADER_BYTES_PER_CHANNEL: u16 = 4;

/// Block size of a mono stream at rates up to 11025 Hz
pub const BASE_BLOCK_ALIGN: u32 = 256;

/// Rates above this scale the block size up
const BLOCK_SCALE_THRESHOLD: u32 = 11025;

/// Divisor applied to the rate when scaling the block size
const BLOCK_SCALE_DIVISOR: u32 = 11000;

fn check_channels(channels: u16) -> Result<()> {
    if !(1..=2).contains(&channels) {
        return Err(CodecError::format_invalid(format!(
            "Unsupported channel count: {}",
            channels
        )));
    }
    Ok(())
}

/// Compute the ADPCM block alignment for a channel count and sample rate
///
/// Mono starts at 256 bytes and stereo at 512. Above 11025 Hz the block is
/// scaled by `rate / 11000` so a block covers roughly the same duration at
/// every rate.
pub fn block_alignment(channels: u16, sample_rate: u32) -> Result<u16> {
    check_channels(channels)?;

    let base = BASE_BLOCK_ALIGN << (channels >> 1);
    let scale = if sample_rate > BLOCK_SCALE_THRESHOLD {
        sample_rate / BLOCK_SCALE_DIVISOR
    } else {
        1
    };

    base.checked_mul(scale)
        .and_then(|align| u16::try_from(align).ok())
        .ok_or_else(|| {
            CodecError::format_invalid(format!(
                "Block alignment for {}Hz x {} channel(s) does not fit in 16 bits",
                sample_rate, channels
            ))
        })
}

/// Compute the number of samples per channel held by one block
///
/// The header's first sample is counted, so the result is always `4n + 1`
/// for a block alignment that is a multiple of `4 * channels`.
pub fn samples_per_block(block_align: u16, channels: u16) -> Result<u16> {
    check_channels(channels)?;

    let header = u32::from(HEADER_BYTES_PER_CHANNEL) * u32::from(channels);
    let align = u32::from(block_align);
    if align < header {
        return Err(CodecError::format_invalid(format!(
            "Block alignment {} smaller than the {}-byte header",
            block_align, header
        )));
    }

    // Two nibbles per data byte, split across the channels
    let samples = (align - header) * 8 / (u32::from(IMA_ADPCM_BITS_PER_SAMPLE) * u32::from(channels)) + 1;
    u16::try_from(samples).map_err(|_| {
        CodecError::format_invalid(format!("Samples per block {} out of range", samples))
    })
}

/// Average encoded bytes per second
///
/// Returns 0 for a zero `samples_per_block`, which validation rejects anyway.
pub fn avg_bytes_per_sec(sample_rate: u32, block_align: u16, samples_per_block: u16) -> u32 {
    if samples_per_block == 0 {
        return 0;
    }
    let bytes = u64::from(sample_rate) * u64::from(block_align) / u64::from(samples_per_block);
    u32::try_from(bytes).unwrap_or(u32::MAX)
}

/// Bytes per PCM sample frame
pub fn pcm_block_align(channels: u16, bits_per_sample: u16) -> u16 {
    let align = u32::from(channels) * u32::from(bits_per_sample) / 8;
    u16::try_from(align).unwrap_or(u16::MAX)
}

/// Average PCM bytes per second
pub fn pcm_avg_bytes_per_sec(sample_rate: u32, block_align: u16) -> u32 {
    sample_rate.saturating_mul(u32::from(block_align))
}

/// Number of PCM bytes holding `samples` samples per channel
pub fn pcm_bytes_for_samples(samples: usize, pcm_block_align: u16) -> usize {
    samples.saturating_mul(usize::from(pcm_block_align))
}

/// Number of whole samples per channel in `bytes` PCM bytes
pub fn pcm_samples_in_bytes(bytes: usize, pcm_block_align: u16) -> usize {
    if pcm_block_align == 0 {
        return 0;
    }
    bytes / usize::from(pcm_block_align)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_alignment_low_rates() {
        assert_eq!(block_alignment(1, 8000).unwrap(), 256);
        assert_eq!(block_alignment(2, 8000).unwrap(), 512);
        assert_eq!(block_alignment(1, 11025).unwrap(), 256);
        assert_eq!(block_alignment(2, 11025).unwrap(), 512);
    }

    #[test]
    fn test_block_alignment_scales_with_rate() {
        assert_eq!(block_alignment(1, 22050).unwrap(), 512);
        assert_eq!(block_alignment(2, 22050).unwrap(), 1024);
        assert_eq!(block_alignment(1, 44100).unwrap(), 1024);
        assert_eq!(block_alignment(2, 44100).unwrap(), 2048);
    }

    #[test]
    fn test_block_alignment_rejects_bad_input() {
        assert!(block_alignment(0, 8000).is_err());
        assert!(block_alignment(3, 8000).is_err());
        assert!(block_alignment(2, u32::MAX).is_err());
    }

    #[test]
    fn test_samples_per_block() {
        assert_eq!(samples_per_block(256, 1).unwrap(), 505);
        assert_eq!(samples_per_block(512, 2).unwrap(), 505);
        assert_eq!(samples_per_block(1024, 1).unwrap(), 2041);
        assert_eq!(samples_per_block(2048, 2).unwrap(), 2041);
        assert_eq!(samples_per_block(4, 1).unwrap(), 1);
        assert!(samples_per_block(4, 2).is_err());
    }

    #[test]
    fn test_samples_per_block_shape() {
        for channels in 1..=2u16 {
            for rate in [8000u32, 11025, 22050, 44100] {
                let align = block_alignment(channels, rate).unwrap();
                assert_eq!(align % (4 * channels), 0);
                let spb = samples_per_block(align, channels).unwrap();
                assert_eq!(spb % 4, 1);
                assert!(spb >= 5);
            }
        }
    }

    #[test]
    fn test_avg_bytes_per_sec() {
        assert_eq!(avg_bytes_per_sec(8000, 256, 505), 4055);
        assert_eq!(avg_bytes_per_sec(44100, 2048, 2041), 44251);
        assert_eq!(avg_bytes_per_sec(8000, 256, 0), 0);
    }

    #[test]
    fn test_pcm_helpers() {
        assert_eq!(pcm_block_align(1, 8), 1);
        assert_eq!(pcm_block_align(2, 16), 4);
        assert_eq!(pcm_avg_bytes_per_sec(44100, 4), 176400);
        assert_eq!(pcm_bytes_for_samples(505, 4), 2020);
        assert_eq!(pcm_samples_in_bytes(2021, 4), 505);
        assert_eq!(pcm_samples_in_bytes(100, 0), 0);
    }
}
