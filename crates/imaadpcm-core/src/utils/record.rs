//! Little-endian format descriptor records
//!
//! Record layout: tag (u16), channels (u16), sample rate (u32), average
//! bytes per second (u32), block alignment (u16), bits per sample (u16),
//! then extra size (u16) and, for IMA ADPCM only, samples per block (u16).
//! PCM records are written in their 16-byte form without the extra size.
//! On read, a PCM record carries the extra size only when the input is
//! exactly 18 bytes long.

use crate::error::{CodecError, Result};
use crate::types::{FormatDescriptor, FormatTag};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Size of a PCM descriptor record
pub const PCM_RECORD_SIZE: usize = 16;

/// Size of a PCM descriptor record that carries the extra size
pub const PCM_EXTENDED_RECORD_SIZE: usize = 18;

/// Size of an IMA ADPCM descriptor record
pub const IMA_ADPCM_RECORD_SIZE: usize = 20;

/// Size of a record for the given tag
pub fn record_size(tag: FormatTag) -> usize {
    match tag {
        FormatTag::Pcm => PCM_RECORD_SIZE,
        FormatTag::ImaAdpcm => IMA_ADPCM_RECORD_SIZE,
    }
}

/// Append the record for `format` to `buf`
pub fn write_format_record<B: BufMut>(format: &FormatDescriptor, buf: &mut B) {
    buf.put_u16_le(format.tag.wire_value());
    buf.put_u16_le(format.channels);
    buf.put_u32_le(format.sample_rate);
    buf.put_u32_le(format.avg_bytes_per_sec);
    buf.put_u16_le(format.block_align);
    buf.put_u16_le(format.bits_per_sample);

    if format.tag == FormatTag::ImaAdpcm {
        buf.put_u16_le(format.extra_size);
        buf.put_u16_le(format.samples_per_block.unwrap_or(0));
    }
}

/// Parse a record from the start of `data`
///
/// Trailing bytes beyond the record are ignored, except that a PCM record
/// of exactly [`PCM_EXTENDED_RECORD_SIZE`] bytes is read with its extra
/// size. The result is not validated; pass it through `validate_format`
/// before use.
pub fn read_format_record(data: &[u8]) -> Result<FormatDescriptor> {
    if data.len() < PCM_RECORD_SIZE {
        return Err(CodecError::format_invalid(format!(
            "Format record too short: {} bytes",
            data.len()
        )));
    }

    let mut buf = data;
    let raw_tag = buf.get_u16_le();
    let tag = FormatTag::from_wire_value(raw_tag).ok_or_else(|| {
        CodecError::format_invalid(format!("Unknown format tag 0x{:04x}", raw_tag))
    })?;

    let channels = buf.get_u16_le();
    let sample_rate = buf.get_u32_le();
    let avg_bytes_per_sec = buf.get_u32_le();
    let block_align = buf.get_u16_le();
    let bits_per_sample = buf.get_u16_le();

    let (extra_size, samples_per_block) = match tag {
        FormatTag::Pcm => {
            let extra_size = if data.len() == PCM_EXTENDED_RECORD_SIZE {
                buf.get_u16_le()
            } else {
                0
            };
            (extra_size, None)
        }
        FormatTag::ImaAdpcm => {
            if data.len() < IMA_ADPCM_RECORD_SIZE {
                return Err(CodecError::format_invalid(format!(
                    "IMA ADPCM format record too short: {} bytes",
                    data.len()
                )));
            }
            (buf.get_u16_le(), Some(buf.get_u16_le()))
        }
    };

    Ok(FormatDescriptor {
        tag,
        channels,
        sample_rate,
        avg_bytes_per_sec,
        block_align,
        bits_per_sample,
        extra_size,
        samples_per_block,
    })
}

impl FormatDescriptor {
    /// Encode this descriptor as a little-endian record
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(record_size(self.tag));
        write_format_record(self, &mut buf);
        buf.freeze()
    }

    /// Decode a descriptor from a little-endian record
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        read_format_record(data)
    }
}
