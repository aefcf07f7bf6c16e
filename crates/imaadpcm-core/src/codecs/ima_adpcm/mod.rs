//! IMA ADPCM Audio Codec Implementation
//!
//! This module implements the IMA/DVI ADPCM block format: 4 bits per sample,
//! an 89-entry step table and a per-channel adaptive step index.
//!
//! # Architecture
//!
//! - `codec`: Block encoder and decoder for the four PCM layouts
//! - `adpcm`: Single-sample quantizer and step adaptation
//! - `block`: Block header layout and corruption checks
//! - `tables`: Step size and index adjustment tables
//! - `state`: Adaptation state carried between convert calls

pub mod adpcm;
pub mod block;
pub mod codec;
pub mod state;
pub mod tables;

#[cfg(test)]
mod tests;

pub use block::{BlockHeader, BLOCK_HEADER_SIZE};
pub use codec::{BlockCodec, Pcm16, Pcm8, PcmSample};
pub use state::AdaptationState;
