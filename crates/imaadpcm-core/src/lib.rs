//! # IMAADPCM-Core: IMA ADPCM Codec Library
//!
//! This library implements the IMA/DVI ADPCM block format together with the
//! format negotiation and stream sizing logic needed to plug it into an
//! audio conversion pipeline.
//!
//! ## Features
//!
//! - **Codec**: 4-bit IMA ADPCM for mono and stereo, 8-bit and 16-bit PCM
//! - **Negotiation**: Format validation, suggestion and session admission
//! - **Sizing**: Overflow-checked buffer size queries in both directions
//! - **Calibration**: Self-benchmark deciding which rates convert in real time
//!
//! ## Usage
//!
//! ```rust
//! use imaadpcm_core::{ConvertFlags, FormatDescriptor, Negotiator, OpenFlags, SuggestRestrictions};
//!
//! let negotiator = Negotiator::default();
//! let pcm = FormatDescriptor::pcm(1, 8000, 16);
//! let adpcm = negotiator.suggest_format(&pcm, &SuggestRestrictions::none())?;
//!
//! let mut encoder = negotiator.open_session(&pcm, &adpcm, OpenFlags::non_realtime())?;
//! let input = vec![0u8; 505 * 2]; // one block of 16-bit mono samples
//! let mut output = vec![0u8; encoder.max_output_size(input.len())?];
//! let result = encoder.convert(&input, &mut output, ConvertFlags::start())?;
//! assert_eq!(result.dst_used, 256);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `config-file`: TOML file settings store and the `imaadpcm_calibrate`
//!   tool (enabled by default)

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod calibration;
pub mod codecs;
pub mod error;
pub mod stream;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use calibration::{ensure_calibrated, CalibrationBenchmark, CalibrationSettings, SettingsStore};
pub use codecs::{BlockCodec, CodecFactory};
pub use error::{CodecError, Result};
pub use stream::{ConversionSession, Negotiator};
pub use types::{
    CodecVariant, ConvertFlags, ConvertResult, Direction, FormatDescriptor, FormatTag, OpenFlags,
    SuggestRestrictions,
};

/// Version information for the codec library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported format tags
pub const SUPPORTED_FORMATS: &[&str] = &["PCM", "IMA ADPCM"];

/// Initialize the codec library
///
/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default `info`)
/// unless one is already set, and forces the standard format tables. Safe
/// to call more than once.
pub fn init() -> Result<()> {
    // Initialize logging if not already done
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let standard = stream::standard_format_count(FormatTag::Pcm)
        + stream::standard_format_count(FormatTag::ImaAdpcm);

    tracing::info!("IMAADPCM-Core v{} initialized", VERSION);
    tracing::info!("Supported formats: {:?} ({} standard)", SUPPORTED_FORMATS, standard);

    Ok(())
}

/// Get library information
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        supported_formats: SUPPORTED_FORMATS.to_vec(),
        standard_pcm_formats: stream::standard_format_count(FormatTag::Pcm),
        standard_adpcm_formats: stream::standard_format_count(FormatTag::ImaAdpcm),
    }
}

/// Library information structure
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Library version
    pub version: &'static str,
    /// List of supported format names
    pub supported_formats: Vec<&'static str>,
    /// Number of standard PCM formats
    pub standard_pcm_formats: usize,
    /// Number of standard IMA ADPCM formats
    pub standard_adpcm_formats: usize,
}
