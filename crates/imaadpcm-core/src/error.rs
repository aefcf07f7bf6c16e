//! Error handling for the IMA ADPCM codec library
//!
//! Every failure is reported synchronously with a specific reason. None of
//! these errors are retried internally; `is_recoverable` only tells the
//! caller whether trying again with different inputs (or a different
//! provider) can succeed.

#![allow(missing_docs)]

use std::fmt;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Error type for format validation, negotiation and conversion
#[derive(Error, Debug)]
pub enum CodecError {
    /// A format descriptor failed structural validation
    #[error("Invalid format: {details}")]
    FormatInvalid { details: String },

    /// The requested conversion cannot be performed by this codec
    #[error("Conversion not possible: {reason}")]
    ConversionNotPossible { reason: String },

    /// Calibration says the stream rate exceeds the real-time budget
    #[error("Real-time conversion not supported: {sample_rate}Hz x {channels} channel(s) exceeds calibrated limit of {max_mono_rate} mono samples/s")]
    RealtimeNotSupported {
        sample_rate: u32,
        channels: u16,
        max_mono_rate: u32,
    },

    /// An allocation failed while preparing a session or benchmark
    #[error("Out of memory: could not allocate {requested} bytes for {purpose}")]
    OutOfMemory { requested: usize, purpose: String },

    /// A block header carried a step index outside [0, 88]
    #[error("Stream corrupt: block {block} channel {channel} has step index {step_index}")]
    StreamCorrupt {
        block: usize,
        channel: usize,
        step_index: u8,
    },

    /// Destination buffer too small for the converted data
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Persisted settings could not be read or written
    #[error("Settings error: {reason}")]
    SettingsError { reason: String },

    /// I/O operation failed
    #[error("I/O operation failed: {reason}")]
    IoError { reason: String },
}

impl CodecError {
    /// Create a new invalid format error
    pub fn format_invalid(details: impl Into<String>) -> Self {
        Self::FormatInvalid {
            details: details.into(),
        }
    }

    /// Create a new conversion not possible error
    pub fn not_possible(reason: impl Into<String>) -> Self {
        Self::ConversionNotPossible {
            reason: reason.into(),
        }
    }

    /// Create a new out of memory error
    pub fn out_of_memory(requested: usize, purpose: impl Into<String>) -> Self {
        Self::OutOfMemory {
            requested,
            purpose: purpose.into(),
        }
    }

    /// Create a new settings error
    pub fn settings(reason: impl Into<String>) -> Self {
        Self::SettingsError {
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// A recoverable error can succeed on a later call with different
    /// inputs (a larger buffer, another provider, freed memory).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FormatInvalid { .. }
            | Self::ConversionNotPossible { .. }
            | Self::StreamCorrupt { .. }
            | Self::SettingsError { .. } => false,

            Self::RealtimeNotSupported { .. }
            | Self::OutOfMemory { .. }
            | Self::BufferTooSmall { .. }
            | Self::IoError { .. } => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FormatInvalid { .. } => ErrorCategory::Format,
            Self::ConversionNotPossible { .. } => ErrorCategory::Negotiation,
            Self::RealtimeNotSupported { .. } => ErrorCategory::Policy,
            Self::OutOfMemory { .. } | Self::BufferTooSmall { .. } => ErrorCategory::Memory,
            Self::StreamCorrupt { .. } => ErrorCategory::Stream,
            Self::SettingsError { .. } => ErrorCategory::Configuration,
            Self::IoError { .. } => ErrorCategory::Io,
        }
    }
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Structural format descriptor errors
    Format,
    /// Format negotiation and session admission errors
    Negotiation,
    /// Real-time admission policy
    Policy,
    /// Allocation and buffer sizing errors
    Memory,
    /// Encoded stream errors
    Stream,
    /// Persisted configuration errors
    Configuration,
    /// I/O related errors
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "Format"),
            Self::Negotiation => write!(f, "Negotiation"),
            Self::Policy => write!(f, "Policy"),
            Self::Memory => write!(f, "Memory"),
            Self::Stream => write!(f, "Stream"),
            Self::Configuration => write!(f, "Configuration"),
            Self::Io => write!(f, "I/O"),
        }
    }
}

/// Convert from I/O errors
impl From<std::io::Error> for CodecError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError {
            reason: error.to_string(),
        }
    }
}

/// Convert from settings parse errors
#[cfg(feature = "config-file")]
impl From<toml::de::Error> for CodecError {
    fn from(error: toml::de::Error) -> Self {
        Self::settings(error.to_string())
    }
}

/// Convert from settings serialization errors
#[cfg(feature = "config-file")]
impl From<toml::ser::Error> for CodecError {
    fn from(error: toml::ser::Error) -> Self {
        Self::settings(error.to_string())
    }
}
