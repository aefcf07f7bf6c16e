//! IMA ADPCM sample quantizer
//!
//! Single-sample encode and decode steps plus the step index adaptation.
//! Predicted samples are carried as `i32` so intermediate sums never
//! overflow; every returned prediction is clamped to the 16-bit range.

use super::tables::{INDEX_TABLE, MAX_STEP_INDEX, SIGN_BIT, STEP_TABLE};

/// Clamp a reconstructed value to the 16-bit sample range
#[inline]
pub fn saturate(value: i32) -> i32 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX))
}

/// Check whether a step index read from a block header is usable
#[inline]
pub fn is_valid_step_index(index: u8) -> bool {
    index <= MAX_STEP_INDEX
}

/// Quantizer step size for a step index
///
/// The index must already be valid; headers are checked before decoding.
#[inline]
pub fn step_size(index: u8) -> i32 {
    STEP_TABLE[usize::from(index.min(MAX_STEP_INDEX))]
}

/// Adapt the step index after emitting or consuming `code`
#[inline]
pub fn next_step_index(index: u8, code: u8) -> u8 {
    let next = i32::from(index) + INDEX_TABLE[usize::from(code & 0x0f)];
    // Clamped to [0, 88], so the narrowing cannot truncate
    next.clamp(0, i32::from(MAX_STEP_INDEX)) as u8
}

/// Decode one 4-bit code against the current prediction
///
/// Returns the new predicted sample.
#[inline]
pub fn decode_sample(code: u8, predicted: i32, step: i32) -> i32 {
    let mut difference = step >> 3;
    if code & 0x04 != 0 {
        difference += step;
    }
    if code & 0x02 != 0 {
        difference += step >> 1;
    }
    if code & 0x01 != 0 {
        difference += step >> 2;
    }

    if code & SIGN_BIT != 0 {
        saturate(predicted - difference)
    } else {
        saturate(predicted + difference)
    }
}

/// Encode one input sample against the current prediction
///
/// Returns the 4-bit code. The caller reconstructs the new prediction with
/// [`decode_sample`], exactly as a decoder would.
#[inline]
pub fn encode_sample(input: i32, predicted: i32, step: i32) -> u8 {
    let mut difference = input - predicted;
    let mut code = 0u8;
    if difference < 0 {
        code = SIGN_BIT;
        difference = -difference;
    }

    let mut step = step;
    if difference >= step {
        code |= 0x04;
        difference -= step;
    }

    step >>= 1;
    if difference >= step {
        code |= 0x02;
        difference -= step;
    }

    step >>= 1;
    if difference >= step {
        code |= 0x01;
    }

    code
}

/// Encode one sample and derive the new prediction in the same pass
///
/// The quantization residual left after the magnitude bits are taken out
/// gives the decoder's reconstruction directly, so no second decode is
/// needed. The result is identical to `encode_sample` followed by
/// `decode_sample`.
#[inline]
pub fn fast_encode(input: i32, predicted: i32, step: i32) -> (u8, i32) {
    let mut difference = input - predicted;
    let mut code = 0u8;
    if difference < 0 {
        code = SIGN_BIT;
        difference = -difference;
    }

    let mut step = step;
    if difference >= step {
        code |= 0x04;
        difference -= step;
    }

    step >>= 1;
    if difference >= step {
        code |= 0x02;
        difference -= step;
    }

    step >>= 1;
    if difference >= step {
        code |= 0x01;
        difference -= step;
    }

    // `step` is now the incoming step >> 2
    let reconstructed = if code & SIGN_BIT != 0 {
        input + difference - (step >> 1)
    } else {
        input - difference + (step >> 1)
    };

    (code, saturate(reconstructed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_step_index_bounds() {
        assert_eq!(next_step_index(0, 0), 0);
        assert_eq!(next_step_index(0, 0x0b), 0);
        assert_eq!(next_step_index(88, 0x07), 88);
        assert_eq!(next_step_index(88, 0x0f), 88);
        assert_eq!(next_step_index(10, 0x04), 12);
        assert_eq!(next_step_index(10, 0x0f), 18);
        assert_eq!(next_step_index(10, 0x03), 9);
    }

    #[test]
    fn test_decode_sample_values() {
        // step 7: base difference is 7 >> 3 = 0
        assert_eq!(decode_sample(0x00, 0, 7), 0);
        assert_eq!(decode_sample(0x07, 0, 7), 7 + 3 + 1);
        assert_eq!(decode_sample(0x0f, 0, 7), -(7 + 3 + 1));
        assert_eq!(decode_sample(0x04, 100, 16), 100 + 2 + 16);
    }

    #[test]
    fn test_decode_sample_saturates() {
        assert_eq!(decode_sample(0x07, 32000, 32767), 32767);
        assert_eq!(decode_sample(0x0f, -32000, 32767), -32768);
    }

    #[test]
    fn test_encode_sample_sign_and_magnitude() {
        assert_eq!(encode_sample(0, 0, 7), 0x00);
        assert_eq!(encode_sample(100, 0, 7), 0x07);
        assert_eq!(encode_sample(-100, 0, 7), 0x0f);
        assert_eq!(encode_sample(8, 0, 8), 0x04);
        assert_eq!(encode_sample(-4, 0, 8), 0x0a);
    }

    #[test]
    fn test_fast_encode_matches_reference_path() {
        for &step in &[7, 16, 157, 1060, 9493, 32767] {
            for &predicted in &[-32768, -1000, 0, 1234, 32767] {
                for input in (-32768..=32767).step_by(97) {
                    let code = encode_sample(input, predicted, step);
                    let reference = decode_sample(code, predicted, step);
                    assert_eq!(fast_encode(input, predicted, step), (code, reference));
                }
            }
        }
    }

    #[test]
    fn test_valid_step_index() {
        assert!(is_valid_step_index(0));
        assert!(is_valid_step_index(88));
        assert!(!is_valid_step_index(89));
        assert!(!is_valid_step_index(255));
        assert_eq!(step_size(88), 32767);
    }
}
