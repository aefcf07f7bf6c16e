//! IMA ADPCM Block Layout Tests
//!
//! Nibble ordering and stereo word interleave of the interchange format.

use crate::codecs::ima_adpcm::{AdaptationState, BlockCodec};
use crate::types::CodecVariant;

fn put_i16(buf: &mut [u8], frame_offset: usize, value: i16) {
    buf[frame_offset..frame_offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Mono bytes carry the earlier sample in the low nibble
#[test]
fn test_mono_low_nibble_first() {
    let codec = BlockCodec::new(CodecVariant::Mono16, 256, 505).unwrap();
    let mut pcm = vec![0u8; codec.pcm_block_size()];
    // Header sample 0, then a jump that codes as 0x7
    put_i16(&mut pcm, 2, 10000);
    // Reconstruction after 0x7 at step 7 is 11; repeating it codes as 0x0
    put_i16(&mut pcm, 4, 11);
    for n in 3..505 {
        put_i16(&mut pcm, n * 2, 11);
    }

    let mut adpcm = vec![0u8; 256];
    let mut state = AdaptationState::new();
    codec.encode(&pcm, &mut adpcm, &mut state).unwrap();
    assert_eq!(adpcm[4], 0x07);
}

/// Stereo blocks alternate a word of left nibbles with a word of right ones
#[test]
fn test_stereo_word_interleave() {
    let codec = BlockCodec::new(CodecVariant::Stereo16, 512, 505).unwrap();
    let mut pcm = vec![0u8; codec.pcm_block_size()];
    for frame in 1..505 {
        put_i16(&mut pcm, frame * 4, 10000);
        put_i16(&mut pcm, frame * 4 + 2, -10000);
    }

    let mut adpcm = vec![0u8; 512];
    let mut state = AdaptationState::new();
    codec.encode(&pcm, &mut adpcm, &mut state).unwrap();

    // First left nibble is a positive full step, first right one negative
    assert_eq!(adpcm[8] & 0x0f, 0x07);
    assert_eq!(adpcm[12] & 0x0f, 0x0f);
}

/// Each nibble of a stereo word lands on its own frame after decode
#[test]
fn test_stereo_decode_word_order() {
    let codec = BlockCodec::new(CodecVariant::Stereo16, 512, 505).unwrap();
    let mut adpcm = vec![0u8; 512];
    // Left word: only the first nibble set; right word: only the last
    adpcm[8] = 0x07;
    adpcm[15] = 0x70;

    let mut pcm = vec![0u8; codec.pcm_block_size()];
    codec.decode(&adpcm, &mut pcm).unwrap();

    let frame = |n: usize| {
        let at = n * 4;
        (
            i16::from_le_bytes([pcm[at], pcm[at + 1]]),
            i16::from_le_bytes([pcm[at + 2], pcm[at + 3]]),
        )
    };

    assert_eq!(frame(0), (0, 0));
    assert_eq!(frame(1), (11, 0));
    // Zero codes still add step >> 3 while the left step decays
    assert_eq!(frame(7), (18, 0));
    assert_eq!(frame(8), (19, 11));
}

/// Encoded blocks fill exactly the block alignment for every variant
#[test]
fn test_block_size_per_variant() {
    let cases = [
        (CodecVariant::Mono8, 256u16),
        (CodecVariant::Mono16, 512),
        (CodecVariant::Stereo8, 512),
        (CodecVariant::Stereo16, 2048),
    ];

    for (variant, block_align) in cases {
        let channels = variant.channels() as u16;
        let spb = crate::utils::geometry::samples_per_block(block_align, channels).unwrap();
        let codec = BlockCodec::new(variant, block_align, spb).unwrap();
        let pcm = vec![0x40u8; codec.pcm_block_size() * 2];
        let mut adpcm = vec![0u8; usize::from(block_align) * 2];
        let mut state = AdaptationState::new();

        let written = codec.encode(&pcm, &mut adpcm, &mut state).unwrap();
        assert_eq!(written, usize::from(block_align) * 2, "{}", variant);
    }
}
