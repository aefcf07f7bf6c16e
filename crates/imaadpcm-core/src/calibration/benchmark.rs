//! Real-time throughput benchmark
//!
//! Times one encode and one decode pass over a synthetic mono 16-bit
//! buffer, converts the timings into achievable mono sample rates and maps
//! them onto the rate tiers.

use super::settings::{CalibrationSettings, DEFAULT_PERCENT_CPU, RATE_TIERS};
use crate::error::{CodecError, Result};
use crate::stream::Negotiator;
use crate::types::{ConvertFlags, FormatDescriptor, OpenFlags, SuggestRestrictions};
use crate::utils::geometry::pcm_samples_in_bytes;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sample rate of the benchmark buffer
pub const BENCHMARK_SAMPLE_RATE: u32 = 44100;

/// Default amount of audio converted per pass
pub const DEFAULT_DURATION_MS: u32 = 1000;

/// Mono sample rate implied by converting `duration_ms` of audio at
/// `sample_rate` in `elapsed_us` microseconds
///
/// A zero elapsed time reports the largest representable rate.
pub fn implied_rate(sample_rate: u32, duration_ms: u32, elapsed_us: u64) -> u32 {
    if elapsed_us == 0 {
        return u32::MAX;
    }
    let rate = u128::from(sample_rate) * u128::from(duration_ms) * 1000 / u128::from(elapsed_us);
    u32::try_from(rate).unwrap_or(u32::MAX)
}

/// Keep `percent_cpu` percent of a measured rate
pub fn apply_margin(rate: u32, percent_cpu: u32) -> u32 {
    let kept = u64::from(rate) * u64::from(percent_cpu.min(100)) / 100;
    u32::try_from(kept).unwrap_or(u32::MAX)
}

/// Highest tier whose rate does not exceed `rate`
pub fn quantize_to_tier(rate: u32) -> usize {
    RATE_TIERS.iter().rposition(|&tier| tier <= rate).unwrap_or(0)
}

/// Derive settings from measured pass durations
pub fn settings_from_timings(
    sample_rate: u32,
    duration_ms: u32,
    encode_elapsed_us: u64,
    decode_elapsed_us: u64,
    percent_cpu: u32,
) -> CalibrationSettings {
    let encode = apply_margin(implied_rate(sample_rate, duration_ms, encode_elapsed_us), percent_cpu);
    let decode = apply_margin(implied_rate(sample_rate, duration_ms, decode_elapsed_us), percent_cpu);
    CalibrationSettings::new(quantize_to_tier(encode), quantize_to_tier(decode), percent_cpu)
}

/// Outcome of one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkReport {
    /// Time spent encoding
    pub encode_elapsed: Duration,
    /// Time spent decoding
    pub decode_elapsed: Duration,
    /// Mono samples per second achievable when encoding, before margin
    pub encode_rate: u32,
    /// Mono samples per second achievable when decoding, before margin
    pub decode_rate: u32,
    /// Settings derived from the measurement
    pub settings: CalibrationSettings,
}

/// Benchmark configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationBenchmark {
    duration_ms: u32,
    percent_cpu: u32,
}

impl Default for CalibrationBenchmark {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            percent_cpu: DEFAULT_PERCENT_CPU,
        }
    }
}

impl CalibrationBenchmark {
    /// Create a benchmark with default duration and margin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount of audio converted per pass
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms.max(1);
        self
    }

    /// Set the CPU margin applied to measured rates
    pub fn with_percent_cpu(mut self, percent_cpu: u32) -> Self {
        self.percent_cpu = percent_cpu.clamp(1, 100);
        self
    }

    /// Audio converted per pass in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// CPU margin in percent
    pub fn percent_cpu(&self) -> u32 {
        self.percent_cpu
    }

    /// Run both passes and derive settings
    pub fn run(&self) -> Result<BenchmarkReport> {
        let negotiator = Negotiator::default();
        let pcm_format = FormatDescriptor::pcm(1, BENCHMARK_SAMPLE_RATE, 16);
        let adpcm_format = negotiator.suggest_format(&pcm_format, &SuggestRestrictions::none())?;

        let mut encoder = negotiator.open_session(&pcm_format, &adpcm_format, OpenFlags::non_realtime())?;
        let mut decoder = negotiator.open_session(&adpcm_format, &pcm_format, OpenFlags::non_realtime())?;

        // Whole blocks covering at least the requested duration
        let samples = (u64::from(BENCHMARK_SAMPLE_RATE) * u64::from(self.duration_ms)).div_ceil(1000);
        let pcm_block = encoder.geometry().pcm_bytes_per_block() as usize;
        let spb = usize::from(adpcm_format.samples_per_block.unwrap_or(1).max(1));
        let blocks = usize::try_from(samples)
            .map_err(|_| CodecError::out_of_memory(usize::MAX, "benchmark buffer"))?
            .div_ceil(spb);
        let pcm_len = blocks
            .checked_mul(pcm_block)
            .ok_or_else(|| CodecError::out_of_memory(usize::MAX, "benchmark PCM buffer"))?;

        let adpcm_len = encoder.max_output_size(pcm_len)?;
        let mut pcm = allocate(pcm_len, "benchmark PCM buffer")?;
        fill_synthetic(&mut pcm);
        let mut adpcm = allocate(adpcm_len, "benchmark ADPCM buffer")?;
        let mut restored = allocate(pcm_len, "benchmark decode buffer")?;

        debug!(
            "Benchmarking {} blocks ({} samples, {} PCM bytes, {} ADPCM bytes)",
            blocks,
            pcm_samples_in_bytes(pcm_len, pcm_format.block_align),
            pcm_len,
            adpcm_len
        );

        let started = Instant::now();
        let encoded = encoder.convert(&pcm, &mut adpcm, ConvertFlags::start())?;
        let encode_elapsed = started.elapsed();

        let started = Instant::now();
        decoder.convert(&adpcm[..encoded.dst_used], &mut restored, ConvertFlags::start())?;
        let decode_elapsed = started.elapsed();

        encoder.close();
        decoder.close();

        let encode_us = micros(encode_elapsed);
        let decode_us = micros(decode_elapsed);
        let settings = settings_from_timings(
            BENCHMARK_SAMPLE_RATE,
            self.duration_ms,
            encode_us,
            decode_us,
            self.percent_cpu,
        );

        let report = BenchmarkReport {
            encode_elapsed,
            decode_elapsed,
            encode_rate: implied_rate(BENCHMARK_SAMPLE_RATE, self.duration_ms, encode_us),
            decode_rate: implied_rate(BENCHMARK_SAMPLE_RATE, self.duration_ms, decode_us),
            settings,
        };

        info!(
            "Calibration: encode {}us ({} samples/s, tier {}), decode {}us ({} samples/s, tier {})",
            encode_us,
            report.encode_rate,
            settings.max_rt_encode_setting,
            decode_us,
            report.decode_rate,
            settings.max_rt_decode_setting
        );

        Ok(report)
    }
}

fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

fn allocate(len: usize, purpose: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| CodecError::out_of_memory(len, purpose))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

// Content does not matter for timing; a ramp keeps the quantizer busy
fn fill_synthetic(pcm: &mut [u8]) {
    for (n, sample) in pcm.chunks_exact_mut(2).enumerate() {
        sample.copy_from_slice(&synthetic_sample(n).to_le_bytes());
    }
}

/// Sample `n` of a full-scale sawtooth, periodic in 65536 samples
fn synthetic_sample(n: usize) -> i16 {
    // Wrapping keeps the residue exact since 65536 divides the word size
    ((n.wrapping_mul(397) % 65536) as i32 - 32768) as i16
}
