//! IMA ADPCM Test Utilities
//!
//! Signal generators producing raw PCM byte buffers in the layouts the
//! block codec consumes.

/// Test signal generators
pub mod test_signals {
    use std::f64::consts::PI;

    /// Interleaved 16-bit little-endian sine wave, same on every channel
    pub fn sine_pcm16(frames: usize, channels: usize, freq: f64, rate: f64, amplitude: f64) -> Vec<u8> {
        let mut out = Vec::with_capacity(frames * channels * 2);
        for n in 0..frames {
            let value = (amplitude * (2.0 * PI * freq * n as f64 / rate).sin()) as i16;
            for _ in 0..channels {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        out
    }

    /// Interleaved unsigned 8-bit sine wave, same on every channel
    pub fn sine_pcm8(frames: usize, channels: usize, freq: f64, rate: f64) -> Vec<u8> {
        let mut out = Vec::with_capacity(frames * channels);
        for n in 0..frames {
            let value = 128.0 + 100.0 * (2.0 * PI * freq * n as f64 / rate).sin();
            for _ in 0..channels {
                out.push(value as u8);
            }
        }
        out
    }

    /// Full-scale 16-bit square wave toggling every `period / 2` frames
    pub fn square_pcm16(frames: usize, channels: usize, period: usize) -> Vec<u8> {
        let half = (period / 2).max(1);
        let mut out = Vec::with_capacity(frames * channels * 2);
        for n in 0..frames {
            let value = if (n / half) % 2 == 0 { i16::MAX } else { i16::MIN };
            for _ in 0..channels {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        out
    }

    /// Read back 16-bit little-endian samples
    pub fn pcm16_samples(bytes: &[u8]) -> Vec<i16> {
        bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }
}
