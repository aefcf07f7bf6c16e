//! IMA ADPCM block codec
//!
//! One generic encoder and decoder per channel layout, instantiated for
//! 8-bit and 16-bit PCM. The variant is resolved once when the codec is
//! built, so the per-sample loops carry no layout branches.
//!
//! # Layout
//!
//! Mono blocks pack two nibbles per byte, low nibble first. Stereo blocks
//! alternate one 32-bit word of eight left nibbles with one word of eight
//! right nibbles; nibble `i` of a group sits at bit `4 * i` of its word.

use super::adpcm::{decode_sample, fast_encode, next_step_index, saturate, step_size};
use super::block::{check_block_headers, BlockHeader, BLOCK_HEADER_SIZE};
use super::state::AdaptationState;
use crate::error::{CodecError, Result};
use crate::types::CodecVariant;
use crate::utils::geometry;
use tracing::trace;

/// Frames per interleave group of a stereo block
const STEREO_GROUP_FRAMES: usize = 8;

/// Byte-level access to one PCM sample width
pub trait PcmSample {
    /// Bytes per sample
    const BYTES: usize;

    /// Read a sample as a signed 16-bit range value
    fn read(bytes: &[u8]) -> i32;

    /// Write a signed 16-bit range value
    fn write(value: i32, out: &mut [u8]);
}

/// Unsigned 8-bit PCM, biased by 128
#[derive(Debug, Clone, Copy)]
pub struct Pcm8;

/// Signed 16-bit little-endian PCM
#[derive(Debug, Clone, Copy)]
pub struct Pcm16;

impl PcmSample for Pcm8 {
    const BYTES: usize = 1;

    #[inline]
    fn read(bytes: &[u8]) -> i32 {
        (i32::from(bytes[0]) - 128) << 8
    }

    #[inline]
    fn write(value: i32, out: &mut [u8]) {
        out[0] = ((value >> 8) + 128) as u8;
    }
}

impl PcmSample for Pcm16 {
    const BYTES: usize = 2;

    #[inline]
    fn read(bytes: &[u8]) -> i32 {
        i32::from(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn write(value: i32, out: &mut [u8]) {
        let [lo, hi] = (value as i16).to_le_bytes();
        out[0] = lo;
        out[1] = hi;
    }
}

/// Running predictor of one channel while encoding
struct ChannelEncoder {
    predicted: i32,
    index: u8,
}

impl ChannelEncoder {
    fn start(first_sample: i32, index: u8) -> Self {
        Self {
            predicted: first_sample,
            index,
        }
    }

    fn header(&self) -> [u8; BLOCK_HEADER_SIZE] {
        BlockHeader::new(saturate(self.predicted) as i16, self.index).to_bytes()
    }

    #[inline]
    fn encode(&mut self, input: i32) -> u8 {
        let (code, predicted) = fast_encode(input, self.predicted, step_size(self.index));
        self.predicted = predicted;
        self.index = next_step_index(self.index, code);
        code
    }
}

/// Running predictor of one channel while decoding
struct ChannelDecoder {
    predicted: i32,
    index: u8,
}

impl ChannelDecoder {
    fn from_header(header: BlockHeader) -> Self {
        Self {
            predicted: i32::from(header.predicted),
            index: header.step_index,
        }
    }

    #[inline]
    fn decode(&mut self, code: u8) -> i32 {
        self.predicted = decode_sample(code, self.predicted, step_size(self.index));
        self.index = next_step_index(self.index, code);
        self.predicted
    }
}

fn encode_mono<S: PcmSample>(
    pcm: &[u8],
    adpcm: &mut [u8],
    samples_per_block: usize,
    block_align: usize,
    state: &mut AdaptationState,
) -> usize {
    let pcm_block = samples_per_block * S::BYTES;
    let mut index = state.left;
    let mut written = 0;

    for (src, dst) in pcm
        .chunks_exact(pcm_block)
        .zip(adpcm.chunks_exact_mut(block_align))
    {
        let mut channel = ChannelEncoder::start(S::read(src), index);
        dst[..BLOCK_HEADER_SIZE].copy_from_slice(&channel.header());

        let body = dst[BLOCK_HEADER_SIZE..].iter_mut();
        for (byte, pair) in body.zip(src[S::BYTES..].chunks(2 * S::BYTES)) {
            let mut packed = 0u8;
            for (i, sample) in pair.chunks_exact(S::BYTES).enumerate() {
                packed |= channel.encode(S::read(sample)) << (4 * i);
            }
            *byte = packed;
        }

        index = channel.index;
        written += block_align;
    }

    state.left = index;
    written
}

fn encode_stereo<S: PcmSample>(
    pcm: &[u8],
    adpcm: &mut [u8],
    samples_per_block: usize,
    block_align: usize,
    state: &mut AdaptationState,
) -> usize {
    let frame = 2 * S::BYTES;
    let pcm_block = samples_per_block * frame;
    let (mut left_index, mut right_index) = (state.left, state.right);
    let mut written = 0;

    for (src, dst) in pcm
        .chunks_exact(pcm_block)
        .zip(adpcm.chunks_exact_mut(block_align))
    {
        let mut left = ChannelEncoder::start(S::read(src), left_index);
        let mut right = ChannelEncoder::start(S::read(&src[S::BYTES..]), right_index);
        dst[..BLOCK_HEADER_SIZE].copy_from_slice(&left.header());
        dst[BLOCK_HEADER_SIZE..2 * BLOCK_HEADER_SIZE].copy_from_slice(&right.header());

        let groups = src[frame..].chunks_exact(STEREO_GROUP_FRAMES * frame);
        let words = dst[2 * BLOCK_HEADER_SIZE..].chunks_exact_mut(8);
        for (group, out) in groups.zip(words) {
            let mut left_word = 0u32;
            let mut right_word = 0u32;
            for (i, samples) in group.chunks_exact(frame).enumerate() {
                left_word |= u32::from(left.encode(S::read(samples))) << (4 * i);
                right_word |= u32::from(right.encode(S::read(&samples[S::BYTES..]))) << (4 * i);
            }
            out[..4].copy_from_slice(&left_word.to_le_bytes());
            out[4..].copy_from_slice(&right_word.to_le_bytes());
        }

        left_index = left.index;
        right_index = right.index;
        written += block_align;
    }

    state.left = left_index;
    state.right = right_index;
    written
}

fn decode_mono<S: PcmSample>(
    adpcm: &[u8],
    pcm: &mut [u8],
    samples_per_block: usize,
    block_align: usize,
) -> usize {
    let pcm_block = samples_per_block * S::BYTES;
    let mut written = 0;

    for (src, dst) in adpcm
        .chunks_exact(block_align)
        .zip(pcm.chunks_exact_mut(pcm_block))
    {
        let Some(header) = BlockHeader::parse(src) else {
            break;
        };
        let mut channel = ChannelDecoder::from_header(header);
        let mut out = dst.chunks_exact_mut(S::BYTES);

        if let Some(slot) = out.next() {
            S::write(channel.predicted, slot);
        }
        for &byte in &src[BLOCK_HEADER_SIZE..] {
            for shift in [0, 4] {
                let sample = channel.decode((byte >> shift) & 0x0f);
                if let Some(slot) = out.next() {
                    S::write(sample, slot);
                }
            }
        }

        written += pcm_block;
    }

    written
}

fn decode_stereo<S: PcmSample>(
    adpcm: &[u8],
    pcm: &mut [u8],
    samples_per_block: usize,
    block_align: usize,
) -> usize {
    let frame = 2 * S::BYTES;
    let pcm_block = samples_per_block * frame;
    let mut written = 0;

    for (src, dst) in adpcm
        .chunks_exact(block_align)
        .zip(pcm.chunks_exact_mut(pcm_block))
    {
        let (Some(left_header), Some(right_header)) = (
            BlockHeader::parse(src),
            BlockHeader::parse(&src[BLOCK_HEADER_SIZE..]),
        ) else {
            break;
        };
        let mut left = ChannelDecoder::from_header(left_header);
        let mut right = ChannelDecoder::from_header(right_header);
        let mut frames = dst.chunks_exact_mut(frame);

        if let Some(slot) = frames.next() {
            S::write(left.predicted, slot);
            S::write(right.predicted, &mut slot[S::BYTES..]);
        }

        for words in src[2 * BLOCK_HEADER_SIZE..].chunks_exact(8) {
            let left_word = u32::from_le_bytes([words[0], words[1], words[2], words[3]]);
            let right_word = u32::from_le_bytes([words[4], words[5], words[6], words[7]]);
            for i in 0..STEREO_GROUP_FRAMES {
                let shift = 4 * i;
                let l = left.decode(((left_word >> shift) & 0x0f) as u8);
                let r = right.decode(((right_word >> shift) & 0x0f) as u8);
                if let Some(slot) = frames.next() {
                    S::write(l, slot);
                    S::write(r, &mut slot[S::BYTES..]);
                }
            }
        }

        written += pcm_block;
    }

    written
}

/// Block codec for one PCM layout and block geometry
///
/// The codec itself is immutable. Encoder step indices live in the
/// [`AdaptationState`] passed to [`BlockCodec::encode`], so one codec can
/// serve a stream across any number of calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCodec {
    variant: CodecVariant,
    block_align: usize,
    samples_per_block: usize,
}

impl BlockCodec {
    /// Create a codec for a block geometry
    ///
    /// The block must hold at least one header per channel, be a whole
    /// number of headers long, and `samples_per_block` must be the count
    /// that block alignment implies.
    pub fn new(variant: CodecVariant, block_align: u16, samples_per_block: u16) -> Result<Self> {
        let channels = variant.channels() as u16;
        let header = geometry::HEADER_BYTES_PER_CHANNEL * channels;
        if block_align < header || block_align % header != 0 {
            return Err(CodecError::format_invalid(format!(
                "Block alignment {} is not a non-zero multiple of {} for {}",
                block_align, header, variant
            )));
        }

        let expected = geometry::samples_per_block(block_align, channels)?;
        if samples_per_block != expected {
            return Err(CodecError::format_invalid(format!(
                "Samples per block {} inconsistent with block alignment {} (expected {})",
                samples_per_block, block_align, expected
            )));
        }

        Ok(Self {
            variant,
            block_align: usize::from(block_align),
            samples_per_block: usize::from(samples_per_block),
        })
    }

    /// PCM layout handled by this codec
    pub fn variant(&self) -> CodecVariant {
        self.variant
    }

    /// Bytes per encoded block
    pub fn block_align(&self) -> usize {
        self.block_align
    }

    /// Samples per channel in one block
    pub fn samples_per_block(&self) -> usize {
        self.samples_per_block
    }

    /// PCM bytes represented by one encoded block
    pub fn pcm_block_size(&self) -> usize {
        self.samples_per_block * self.variant.pcm_frame_bytes()
    }

    /// Encode every whole block of PCM in `pcm`
    ///
    /// Trailing PCM that does not fill a block is ignored. Each block header
    /// records the running step index from `state`, which is updated to the
    /// index after the last encoded sample. Returns the bytes written.
    pub fn encode(&self, pcm: &[u8], adpcm: &mut [u8], state: &mut AdaptationState) -> Result<usize> {
        let pcm_block = self.pcm_block_size();
        let blocks = pcm.len() / pcm_block;
        let needed = blocks * self.block_align;
        if adpcm.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                actual: adpcm.len(),
            });
        }

        let pcm = &pcm[..blocks * pcm_block];
        let adpcm = &mut adpcm[..needed];
        let spb = self.samples_per_block;
        let align = self.block_align;

        let written = match self.variant {
            CodecVariant::Mono8 => encode_mono::<Pcm8>(pcm, adpcm, spb, align, state),
            CodecVariant::Mono16 => encode_mono::<Pcm16>(pcm, adpcm, spb, align, state),
            CodecVariant::Stereo8 => encode_stereo::<Pcm8>(pcm, adpcm, spb, align, state),
            CodecVariant::Stereo16 => encode_stereo::<Pcm16>(pcm, adpcm, spb, align, state),
        };

        trace!(
            "Encoded {} block(s) {}: {} -> {} bytes",
            blocks,
            self.variant,
            pcm.len(),
            written
        );
        Ok(written)
    }

    /// Decode every whole block in `adpcm`
    ///
    /// All headers are checked before any output is produced; a corrupt
    /// header fails the whole call and leaves `pcm` untouched. Returns the
    /// bytes written.
    pub fn decode(&self, adpcm: &[u8], pcm: &mut [u8]) -> Result<usize> {
        let blocks = adpcm.len() / self.block_align;
        let adpcm = &adpcm[..blocks * self.block_align];
        check_block_headers(adpcm, self.block_align, self.variant.channels())?;

        let needed = blocks * self.pcm_block_size();
        if pcm.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                actual: pcm.len(),
            });
        }

        let pcm = &mut pcm[..needed];
        let spb = self.samples_per_block;
        let align = self.block_align;

        let written = match self.variant {
            CodecVariant::Mono8 => decode_mono::<Pcm8>(adpcm, pcm, spb, align),
            CodecVariant::Mono16 => decode_mono::<Pcm16>(adpcm, pcm, spb, align),
            CodecVariant::Stereo8 => decode_stereo::<Pcm8>(adpcm, pcm, spb, align),
            CodecVariant::Stereo16 => decode_stereo::<Pcm16>(adpcm, pcm, spb, align),
        };

        trace!(
            "Decoded {} block(s) {}: {} -> {} bytes",
            blocks,
            self.variant,
            adpcm.len(),
            written
        );
        Ok(written)
    }
}
