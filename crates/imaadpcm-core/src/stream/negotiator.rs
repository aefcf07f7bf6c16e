//! Format negotiation and session admission

use super::session::ConversionSession;
use super::sizing::StreamGeometry;
use crate::calibration::settings::{CalibrationSettings, SettingsStore};
use crate::codecs::CodecFactory;
use crate::error::{CodecError, Result};
use crate::types::{Direction, FormatDescriptor, FormatTag, OpenFlags, SuggestRestrictions};
use crate::utils::validation::{validate_ima_adpcm_format, validate_pcm_format};
use tracing::{debug, warn};

/// Suggests formats and opens sessions under the current calibration
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    settings: CalibrationSettings,
}

impl Negotiator {
    /// Create a negotiator using explicit settings
    pub fn new(settings: CalibrationSettings) -> Self {
        Self {
            settings: settings.clamped(),
        }
    }

    /// Create a negotiator from persisted settings
    ///
    /// Missing or unreadable settings fall back to the defaults.
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let settings = match store.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!("No persisted calibration, using defaults");
                CalibrationSettings::default()
            }
            Err(e) => {
                warn!("Failed to load calibration settings, using defaults: {}", e);
                CalibrationSettings::default()
            }
        };
        Self::new(settings)
    }

    /// Settings consulted for real-time admission
    pub fn settings(&self) -> &CalibrationSettings {
        &self.settings
    }

    /// Replace the calibration settings
    pub fn update_settings(&mut self, settings: CalibrationSettings) {
        self.settings = settings.clamped();
    }

    /// Suggest a destination format for `source`
    ///
    /// PCM sources get an IMA ADPCM suggestion and IMA ADPCM sources a
    /// 16-bit PCM one, both at the source's channel count and rate. Each
    /// restriction is checked on its own; any one the codec cannot honour
    /// fails the suggestion.
    pub fn suggest_format(
        &self,
        source: &FormatDescriptor,
        restrictions: &SuggestRestrictions,
    ) -> Result<FormatDescriptor> {
        let target_tag = match source.tag {
            FormatTag::Pcm => {
                validate_pcm_format(source)?;
                FormatTag::ImaAdpcm
            }
            FormatTag::ImaAdpcm => {
                validate_ima_adpcm_format(source)?;
                FormatTag::Pcm
            }
        };

        if let Some(tag) = restrictions.tag {
            if tag != target_tag {
                return Err(CodecError::not_possible(format!(
                    "Cannot convert {} to {}",
                    source.tag, tag
                )));
            }
        }

        if let Some(channels) = restrictions.channels {
            if channels != source.channels {
                return Err(CodecError::not_possible(format!(
                    "Cannot change channel count from {} to {}",
                    source.channels, channels
                )));
            }
        }

        if let Some(sample_rate) = restrictions.sample_rate {
            if sample_rate != source.sample_rate {
                return Err(CodecError::not_possible(format!(
                    "Cannot change sample rate from {} to {}",
                    source.sample_rate, sample_rate
                )));
            }
        }

        let suggestion = match target_tag {
            FormatTag::ImaAdpcm => {
                if let Some(bits) = restrictions.bits_per_sample {
                    if bits != 4 {
                        return Err(CodecError::not_possible(format!(
                            "IMA ADPCM is 4 bits per sample, {} requested",
                            bits
                        )));
                    }
                }
                FormatDescriptor::ima_adpcm(source.channels, source.sample_rate)?
            }
            FormatTag::Pcm => {
                let bits = match restrictions.bits_per_sample {
                    None => 16,
                    Some(bits @ (8 | 16)) => bits,
                    Some(bits) => {
                        return Err(CodecError::not_possible(format!(
                            "Cannot decode to {}-bit PCM",
                            bits
                        )));
                    }
                };
                FormatDescriptor::pcm(source.channels, source.sample_rate, bits)
            }
        };

        debug!("Suggested {} for {}", suggestion, source);
        Ok(suggestion)
    }

    /// Run every admission check for a conversion without opening it
    pub fn query_session(
        &self,
        source: &FormatDescriptor,
        destination: &FormatDescriptor,
        flags: OpenFlags,
    ) -> Result<()> {
        self.admit(source, destination, flags).map(|_| ())
    }

    /// Open a conversion session
    pub fn open_session(
        &self,
        source: &FormatDescriptor,
        destination: &FormatDescriptor,
        flags: OpenFlags,
    ) -> Result<ConversionSession> {
        let session = self.admit(source, destination, flags)?;
        debug!(
            "Opened {:?} session {} -> {} ({}, realtime: {})",
            session.direction(),
            source,
            destination,
            session.variant(),
            flags.realtime
        );
        Ok(session)
    }

    fn admit(
        &self,
        source: &FormatDescriptor,
        destination: &FormatDescriptor,
        flags: OpenFlags,
    ) -> Result<ConversionSession> {
        let (direction, pcm, adpcm) = match (source.tag, destination.tag) {
            (FormatTag::Pcm, FormatTag::ImaAdpcm) => (Direction::Encode, source, destination),
            (FormatTag::ImaAdpcm, FormatTag::Pcm) => (Direction::Decode, destination, source),
            (from, to) => {
                return Err(CodecError::not_possible(format!(
                    "Cannot convert {} to {}",
                    from, to
                )));
            }
        };

        validate_pcm_format(pcm)?;
        validate_ima_adpcm_format(adpcm)?;

        if source.channels != destination.channels {
            return Err(CodecError::not_possible(format!(
                "Channel count mismatch: {} vs {}",
                source.channels, destination.channels
            )));
        }

        if source.sample_rate != destination.sample_rate {
            return Err(CodecError::not_possible(format!(
                "Sample rate mismatch: {} vs {}",
                source.sample_rate, destination.sample_rate
            )));
        }

        let codec = CodecFactory::create(pcm, adpcm)?;

        if flags.realtime && !self.settings.admits(direction, source.channels, source.sample_rate) {
            let max_mono_rate = self.settings.max_mono_rate(direction);
            debug!(
                "Rejecting real-time {:?} at {}Hz x {}: limit {} mono samples/s",
                direction, source.sample_rate, source.channels, max_mono_rate
            );
            return Err(CodecError::RealtimeNotSupported {
                sample_rate: source.sample_rate,
                channels: source.channels,
                max_mono_rate,
            });
        }

        let geometry = StreamGeometry::new(direction, pcm, adpcm)?;

        Ok(ConversionSession::new(
            *source,
            *destination,
            direction,
            flags,
            codec,
            geometry,
        ))
    }
}
