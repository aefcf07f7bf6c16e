//! Persisted calibration settings
//!
//! Settings are indices into [`RATE_TIERS`] plus a CPU margin. They are
//! read when a real-time session is opened and replaced wholesale after a
//! benchmark run.

use crate::error::Result;
use crate::types::Direction;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Mono sample rates a setting can admit, in ascending order
///
/// A stream of `c` channels at `r` Hz is real-time capable under tier `t`
/// when `RATE_TIERS[t] / c >= r`.
pub const RATE_TIERS: [u32; 7] = [0, 8000, 11025, 16000, 22050, 44100, 88200];

/// Default encode tier (16000 mono samples/s)
pub const DEFAULT_MAX_RT_ENCODE_SETTING: usize = 3;

/// Default decode tier (22050 mono samples/s)
pub const DEFAULT_MAX_RT_DECODE_SETTING: usize = 4;

/// Default share of the CPU the codec may use in real time
pub const DEFAULT_PERCENT_CPU: u32 = 50;

/// Highest valid tier index
pub const MAX_SETTING: usize = RATE_TIERS.len() - 1;

/// Mono rate admitted by a tier index, clamped to the table
pub fn tier_rate(setting: usize) -> u32 {
    RATE_TIERS[setting.min(MAX_SETTING)]
}

/// Real-time tuning values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Tier index for real-time encoding
    pub max_rt_encode_setting: usize,
    /// Tier index for real-time decoding
    pub max_rt_decode_setting: usize,
    /// Percentage of measured throughput treated as usable
    pub percent_cpu: u32,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            max_rt_encode_setting: DEFAULT_MAX_RT_ENCODE_SETTING,
            max_rt_decode_setting: DEFAULT_MAX_RT_DECODE_SETTING,
            percent_cpu: DEFAULT_PERCENT_CPU,
        }
    }
}

impl CalibrationSettings {
    /// Create settings from explicit tier indices
    pub fn new(max_rt_encode_setting: usize, max_rt_decode_setting: usize, percent_cpu: u32) -> Self {
        Self {
            max_rt_encode_setting,
            max_rt_decode_setting,
            percent_cpu,
        }
        .clamped()
    }

    /// Force every field into its valid range
    ///
    /// Tier indices are capped at the top tier and the CPU margin at
    /// 1..=100 percent.
    pub fn clamped(self) -> Self {
        Self {
            max_rt_encode_setting: self.max_rt_encode_setting.min(MAX_SETTING),
            max_rt_decode_setting: self.max_rt_decode_setting.min(MAX_SETTING),
            percent_cpu: self.percent_cpu.clamp(1, 100),
        }
    }

    /// Tier index for a direction
    pub fn setting(&self, direction: Direction) -> usize {
        match direction {
            Direction::Encode => self.max_rt_encode_setting,
            Direction::Decode => self.max_rt_decode_setting,
        }
    }

    /// Maximum real-time mono rate for a direction
    pub fn max_mono_rate(&self, direction: Direction) -> u32 {
        tier_rate(self.setting(direction))
    }

    /// Check whether a stream can be converted in real time
    pub fn admits(&self, direction: Direction, channels: u16, sample_rate: u32) -> bool {
        let channels = u32::from(channels.max(1));
        self.max_mono_rate(direction) / channels >= sample_rate
    }
}

/// Storage boundary for calibration settings
pub trait SettingsStore: Send + Sync {
    /// Load persisted settings, `None` when nothing has been stored yet
    fn load(&self) -> Result<Option<CalibrationSettings>>;

    /// Replace the persisted settings
    fn save(&self, settings: &CalibrationSettings) -> Result<()>;
}

/// Process-local settings store
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Option<CalibrationSettings>>,
}

impl MemorySettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `settings`
    pub fn with_settings(settings: CalibrationSettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }

    /// Forget the stored settings
    pub fn clear(&self) {
        *self.settings.lock() = None;
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<CalibrationSettings>> {
        let stored = *self.settings.lock();
        Ok(stored.map(CalibrationSettings::clamped))
    }

    fn save(&self, settings: &CalibrationSettings) -> Result<()> {
        *self.settings.lock() = Some(*settings);
        Ok(())
    }
}

#[cfg(feature = "config-file")]
pub use file::TomlSettingsStore;

#[cfg(feature = "config-file")]
mod file {
    use super::{CalibrationSettings, SettingsStore};
    use crate::error::Result;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use tracing::debug;

    /// Settings stored as a TOML document on disk
    #[derive(Debug, Clone)]
    pub struct TomlSettingsStore {
        path: PathBuf,
    }

    impl TomlSettingsStore {
        /// Create a store backed by `path`; the file need not exist yet
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Location of the settings file
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SettingsStore for TomlSettingsStore {
        fn load(&self) -> Result<Option<CalibrationSettings>> {
            let text = match fs::read_to_string(&self.path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("No calibration settings at {}", self.path.display());
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            let settings: CalibrationSettings = toml::from_str(&text)?;
            Ok(Some(settings.clamped()))
        }

        fn save(&self, settings: &CalibrationSettings) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let text = toml::to_string_pretty(settings)?;
            fs::write(&self.path, text)?;
            debug!("Saved calibration settings to {}", self.path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CalibrationSettings::default();
        assert_eq!(settings.max_mono_rate(Direction::Encode), 16000);
        assert_eq!(settings.max_mono_rate(Direction::Decode), 22050);
        assert_eq!(settings.percent_cpu, 50);
    }

    #[test]
    fn test_admission() {
        let settings = CalibrationSettings::default();
        assert!(settings.admits(Direction::Encode, 1, 16000));
        assert!(settings.admits(Direction::Encode, 2, 8000));
        assert!(!settings.admits(Direction::Encode, 2, 11025));
        assert!(settings.admits(Direction::Decode, 1, 22050));
        assert!(!settings.admits(Direction::Decode, 1, 44100));

        let none = CalibrationSettings::new(0, 0, 50);
        assert!(!none.admits(Direction::Encode, 1, 8000));
    }

    #[test]
    fn test_clamping() {
        let settings = CalibrationSettings::new(99, 7, 0);
        assert_eq!(settings.max_rt_encode_setting, MAX_SETTING);
        assert_eq!(settings.max_rt_decode_setting, MAX_SETTING);
        assert_eq!(settings.percent_cpu, 1);
        assert_eq!(tier_rate(1000), 88200);
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.load().unwrap(), None);

        let settings = CalibrationSettings::new(5, 6, 75);
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), Some(settings));

        store.clear();
        assert_eq!(store.load().unwrap(), None);
    }
}
