//! IMA ADPCM State Management
//!
//! The only state carried between convert calls is the encoder's step index
//! per channel. Decoding takes its step index from each block header.

use super::tables::MAX_STEP_INDEX;

/// Per-channel adaptation state of one conversion session
///
/// The right index is unused for mono sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptationState {
    /// Step index of the left (or only) channel
    pub left: u8,
    /// Step index of the right channel
    pub right: u8,
}

impl AdaptationState {
    /// Create a state with both indices at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset both channels to the initial step index
    pub fn reset(&mut self) {
        self.left = 0;
        self.right = 0;
    }

    /// Step index for a channel (0 = left, anything else = right)
    pub fn index(&self, channel: usize) -> u8 {
        if channel == 0 {
            self.left
        } else {
            self.right
        }
    }

    /// Store the step index for a channel
    pub fn set_index(&mut self, channel: usize, index: u8) {
        let index = index.min(MAX_STEP_INDEX);
        if channel == 0 {
            self.left = index;
        } else {
            self.right = index;
        }
    }
}
