//! Core types for the codec library
//!
//! This module defines the format descriptors exchanged with the host, the
//! codec variant chosen at session open and the per-call conversion flags.

use crate::error::Result;
use crate::utils::geometry;
use std::fmt;

/// Wave format tag carried in the descriptor record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// Linear PCM
    Pcm,
    /// IMA/DVI ADPCM, 4 bits per sample
    ImaAdpcm,
}

impl FormatTag {
    /// Registered wave format tag value
    pub fn wire_value(self) -> u16 {
        match self {
            Self::Pcm => 0x0001,
            Self::ImaAdpcm => 0x0011,
        }
    }

    /// Look up a tag from its registered value
    pub fn from_wire_value(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(Self::Pcm),
            0x0011 => Some(Self::ImaAdpcm),
            _ => None,
        }
    }

    /// Get the tag name
    pub fn name(self) -> &'static str {
        match self {
            Self::Pcm => "PCM",
            Self::ImaAdpcm => "IMA ADPCM",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Description of one side of a conversion
///
/// `samples_per_block` is only present for IMA ADPCM descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    /// Format tag
    pub tag: FormatTag,
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample frames per second
    pub sample_rate: u32,
    /// Average data rate in bytes per second
    pub avg_bytes_per_sec: u32,
    /// Size of one self-contained unit in bytes
    pub block_align: u16,
    /// Bits per sample of one channel
    pub bits_per_sample: u16,
    /// Size of the format-specific extension in bytes
    pub extra_size: u16,
    /// Samples per channel in one ADPCM block, header sample included
    pub samples_per_block: Option<u16>,
}

impl FormatDescriptor {
    /// Build a consistent PCM descriptor
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = geometry::pcm_block_align(channels, bits_per_sample);
        Self {
            tag: FormatTag::Pcm,
            channels,
            sample_rate,
            avg_bytes_per_sec: geometry::pcm_avg_bytes_per_sec(sample_rate, block_align),
            block_align,
            bits_per_sample,
            extra_size: 0,
            samples_per_block: None,
        }
    }

    /// Build an IMA ADPCM descriptor with the standard block geometry
    pub fn ima_adpcm(channels: u16, sample_rate: u32) -> Result<Self> {
        let block_align = geometry::block_alignment(channels, sample_rate)?;
        let samples_per_block = geometry::samples_per_block(block_align, channels)?;
        Ok(Self {
            tag: FormatTag::ImaAdpcm,
            channels,
            sample_rate,
            avg_bytes_per_sec: geometry::avg_bytes_per_sec(
                sample_rate,
                block_align,
                samples_per_block,
            ),
            block_align,
            bits_per_sample: geometry::IMA_ADPCM_BITS_PER_SAMPLE,
            extra_size: geometry::IMA_ADPCM_EXTRA_SIZE,
            samples_per_block: Some(samples_per_block),
        })
    }

    /// Check if this descriptor is PCM
    pub fn is_pcm(&self) -> bool {
        self.tag == FormatTag::Pcm
    }

    /// Check if this descriptor is IMA ADPCM
    pub fn is_ima_adpcm(&self) -> bool {
        self.tag == FormatTag::ImaAdpcm
    }

    /// Get a short human readable description
    pub fn description(&self) -> String {
        format!(
            "{} {}Hz {}-bit {}ch",
            self.tag, self.sample_rate, self.bits_per_sample, self.channels
        )
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Restrictions a caller places on a suggested destination format
///
/// Each `Some` field must be honoured by the suggestion, otherwise the
/// suggestion fails. Fields are checked independently of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestRestrictions {
    /// Required destination tag
    pub tag: Option<FormatTag>,
    /// Required destination channel count
    pub channels: Option<u16>,
    /// Required destination sample rate
    pub sample_rate: Option<u32>,
    /// Required destination bits per sample
    pub bits_per_sample: Option<u16>,
}

impl SuggestRestrictions {
    /// No restrictions at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Restrict the destination tag
    pub fn with_tag(mut self, tag: FormatTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Restrict the destination channel count
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Restrict the destination sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Restrict the destination bits per sample
    pub fn with_bits_per_sample(mut self, bits_per_sample: u16) -> Self {
        self.bits_per_sample = Some(bits_per_sample);
        self
    }
}

/// Direction of a conversion session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// PCM to IMA ADPCM
    Encode,
    /// IMA ADPCM to PCM
    Decode,
}

/// PCM layout handled by a session, chosen once at open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecVariant {
    /// One channel, unsigned 8-bit samples
    Mono8,
    /// One channel, signed 16-bit samples
    Mono16,
    /// Two channels, unsigned 8-bit samples
    Stereo8,
    /// Two channels, signed 16-bit samples
    Stereo16,
}

impl CodecVariant {
    /// Select the variant for a PCM channel count and sample width
    pub fn select(channels: u16, bits_per_sample: u16) -> Option<Self> {
        match (channels, bits_per_sample) {
            (1, 8) => Some(Self::Mono8),
            (1, 16) => Some(Self::Mono16),
            (2, 8) => Some(Self::Stereo8),
            (2, 16) => Some(Self::Stereo16),
            _ => None,
        }
    }

    /// Number of channels
    pub fn channels(self) -> usize {
        match self {
            Self::Mono8 | Self::Mono16 => 1,
            Self::Stereo8 | Self::Stereo16 => 2,
        }
    }

    /// Bytes per PCM sample of one channel
    pub fn pcm_sample_bytes(self) -> usize {
        match self {
            Self::Mono8 | Self::Stereo8 => 1,
            Self::Mono16 | Self::Stereo16 => 2,
        }
    }

    /// Bytes per PCM sample frame (all channels)
    pub fn pcm_frame_bytes(self) -> usize {
        self.channels() * self.pcm_sample_bytes()
    }
}

impl fmt::Display for CodecVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mono8 => "mono 8-bit",
            Self::Mono16 => "mono 16-bit",
            Self::Stereo8 => "stereo 8-bit",
            Self::Stereo16 => "stereo 16-bit",
        };
        write!(f, "{}", name)
    }
}

/// Flags fixed when a session is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    /// The caller needs conversion at least as fast as playback
    pub realtime: bool,
}

impl OpenFlags {
    /// Open for real-time use, subject to calibration
    pub fn realtime() -> Self {
        Self { realtime: true }
    }

    /// Open without a throughput requirement
    pub fn non_realtime() -> Self {
        Self { realtime: false }
    }
}

/// Per-call conversion flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertFlags {
    /// Report only the converted (block aligned) bytes as used
    pub block_align: bool,
    /// Reset adaptation state before converting
    pub start: bool,
}

impl ConvertFlags {
    /// Flags for the first buffer of a stream
    pub fn start() -> Self {
        Self {
            block_align: true,
            start: true,
        }
    }

    /// Flags for a continuation buffer
    pub fn continuation() -> Self {
        Self {
            block_align: true,
            start: false,
        }
    }
}

/// Outcome of one convert call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertResult {
    /// Source bytes reported as consumed
    pub src_used: usize,
    /// Destination bytes written
    pub dst_used: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag_wire_values() {
        assert_eq!(FormatTag::Pcm.wire_value(), 1);
        assert_eq!(FormatTag::ImaAdpcm.wire_value(), 0x11);
        assert_eq!(FormatTag::from_wire_value(0x11), Some(FormatTag::ImaAdpcm));
        assert_eq!(FormatTag::from_wire_value(0x02), None);
    }

    #[test]
    fn test_pcm_descriptor() {
        let pcm = FormatDescriptor::pcm(2, 22050, 16);
        assert_eq!(pcm.block_align, 4);
        assert_eq!(pcm.avg_bytes_per_sec, 88200);
        assert_eq!(pcm.samples_per_block, None);
        assert!(pcm.is_pcm());
    }

    #[test]
    fn test_adpcm_descriptor() {
        let adpcm = FormatDescriptor::ima_adpcm(1, 8000).unwrap();
        assert_eq!(adpcm.block_align, 256);
        assert_eq!(adpcm.samples_per_block, Some(505));
        assert_eq!(adpcm.bits_per_sample, 4);
        assert_eq!(adpcm.extra_size, 2);
        assert_eq!(adpcm.avg_bytes_per_sec, 8000 * 256 / 505);
    }

    #[test]
    fn test_codec_variant_selection() {
        assert_eq!(CodecVariant::select(1, 8), Some(CodecVariant::Mono8));
        assert_eq!(CodecVariant::select(2, 16), Some(CodecVariant::Stereo16));
        assert_eq!(CodecVariant::select(3, 16), None);
        assert_eq!(CodecVariant::select(1, 4), None);
        assert_eq!(CodecVariant::Stereo16.pcm_frame_bytes(), 4);
    }

    #[test]
    fn test_restrictions_builder() {
        let r = SuggestRestrictions::none()
            .with_tag(FormatTag::ImaAdpcm)
            .with_bits_per_sample(8);
        assert_eq!(r.tag, Some(FormatTag::ImaAdpcm));
        assert_eq!(r.bits_per_sample, Some(8));
        assert_eq!(r.channels, None);
    }
}
