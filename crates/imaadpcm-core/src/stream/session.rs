//! Conversion sessions
//!
//! A session owns the encoder adaptation state of one stream. It is not
//! shared: `convert` takes `&mut self`, so one call at a time is enforced
//! by the borrow checker. Independent sessions share nothing mutable.

use super::sizing::StreamGeometry;
use crate::codecs::BlockCodec;
use crate::codecs::ima_adpcm::AdaptationState;
use crate::error::{CodecError, Result};
use crate::types::{CodecVariant, ConvertFlags, ConvertResult, Direction, FormatDescriptor, OpenFlags};
use tracing::{debug, trace, warn};

/// An open PCM <-> IMA ADPCM stream
#[derive(Debug, Clone)]
pub struct ConversionSession {
    source: FormatDescriptor,
    destination: FormatDescriptor,
    direction: Direction,
    open_flags: OpenFlags,
    codec: BlockCodec,
    geometry: StreamGeometry,
    state: AdaptationState,
}

impl ConversionSession {
    pub(crate) fn new(
        source: FormatDescriptor,
        destination: FormatDescriptor,
        direction: Direction,
        open_flags: OpenFlags,
        codec: BlockCodec,
        geometry: StreamGeometry,
    ) -> Self {
        Self {
            source,
            destination,
            direction,
            open_flags,
            codec,
            geometry,
            state: AdaptationState::new(),
        }
    }

    /// Source format
    pub fn source_format(&self) -> &FormatDescriptor {
        &self.source
    }

    /// Destination format
    pub fn destination_format(&self) -> &FormatDescriptor {
        &self.destination
    }

    /// Conversion direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// PCM layout selected at open
    pub fn variant(&self) -> CodecVariant {
        self.codec.variant()
    }

    /// Flags the session was opened with
    pub fn open_flags(&self) -> OpenFlags {
        self.open_flags
    }

    /// Current encoder adaptation state
    pub fn state(&self) -> AdaptationState {
        self.state
    }

    /// Reset the encoder adaptation state
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Block geometry of this stream
    pub fn geometry(&self) -> &StreamGeometry {
        &self.geometry
    }

    /// Destination bytes needed to convert `src_len` source bytes
    pub fn max_output_size(&self, src_len: usize) -> Result<usize> {
        let size = self.geometry.max_output_size(to_u32(src_len)?)?;
        Ok(size as usize)
    }

    /// Source bytes that fit into a destination of `dst_len` bytes
    pub fn max_input_size(&self, dst_len: usize) -> Result<usize> {
        let size = self.geometry.max_input_size(to_u32(dst_len)?)?;
        Ok(size as usize)
    }

    /// Source bytes that will actually be converted from `src_len`
    fn convertible_len(&self, src_len: usize) -> usize {
        let unit = match self.direction {
            Direction::Encode => self.codec.pcm_block_size(),
            Direction::Decode => self.codec.block_align(),
        };
        if unit == 0 {
            return 0;
        }
        src_len / unit * unit
    }

    /// Convert one buffer
    ///
    /// Only whole blocks are converted. With `flags.block_align` set the
    /// unconverted tail is reported as unused so the caller can resubmit
    /// it; otherwise the whole source is reported as used and the tail is
    /// dropped. `flags.start` resets the encoder state first.
    ///
    /// On error nothing is written to `dst` and the session is unchanged.
    pub fn convert(&mut self, src: &[u8], dst: &mut [u8], flags: ConvertFlags) -> Result<ConvertResult> {
        let convertible = self.convertible_len(src.len());
        let src_used = if flags.block_align {
            convertible
        } else {
            if convertible < src.len() {
                warn!(
                    "Discarding {} trailing source bytes that do not fill a block",
                    src.len() - convertible
                );
            }
            src.len()
        };

        let dst_used = match self.direction {
            Direction::Encode => {
                let mut state = if flags.start {
                    AdaptationState::new()
                } else {
                    self.state
                };
                let written = self.codec.encode(&src[..convertible], dst, &mut state)?;
                self.state = state;
                written
            }
            Direction::Decode => match self.codec.decode(&src[..convertible], dst) {
                Ok(written) => written,
                Err(e) => {
                    if let CodecError::StreamCorrupt { .. } = e {
                        warn!("Aborting decode: {}", e);
                    }
                    return Err(e);
                }
            },
        };

        trace!(
            "Converted {:?}: src {} used {} -> dst {}",
            self.direction,
            src.len(),
            src_used,
            dst_used
        );

        Ok(ConvertResult { src_used, dst_used })
    }

    /// Close the session
    pub fn close(self) {
        debug!(
            "Closed {:?} session {} -> {}",
            self.direction, self.source, self.destination
        );
    }
}

fn to_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        CodecError::not_possible(format!("Buffer of {} bytes exceeds a 32-bit size", len))
    })
}
