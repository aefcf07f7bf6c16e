//! Real-time calibration
//!
//! The benchmark measures how fast this machine converts and stores the
//! result as rate tiers; the negotiator reads those tiers when a caller
//! asks for real-time conversion.

pub mod benchmark;
pub mod settings;

pub use benchmark::{BenchmarkReport, CalibrationBenchmark};
#[cfg(feature = "config-file")]
pub use settings::TomlSettingsStore;
pub use settings::{CalibrationSettings, MemorySettingsStore, SettingsStore, RATE_TIERS};

use tracing::{info, warn};

/// Return persisted settings, running the benchmark once if there are none
///
/// A benchmark failure falls back to the default settings without
/// persisting them, so a later call can try again. A failure to save is
/// logged and otherwise ignored.
pub fn ensure_calibrated(store: &dyn SettingsStore, benchmark: &CalibrationBenchmark) -> CalibrationSettings {
    match store.load() {
        Ok(Some(settings)) => return settings,
        Ok(None) => info!("No calibration settings stored, running benchmark"),
        Err(e) => warn!("Failed to load calibration settings, recalibrating: {}", e),
    }

    let settings = match benchmark.run() {
        Ok(report) => report.settings,
        Err(e) => {
            warn!("Calibration benchmark failed, using default settings: {}", e);
            return CalibrationSettings::default();
        }
    };

    if let Err(e) = store.save(&settings) {
        warn!("Failed to save calibration settings: {}", e);
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_calibrated_uses_stored_settings() {
        let stored = CalibrationSettings::new(1, 2, 80);
        let store = MemorySettingsStore::with_settings(stored);
        let settings = ensure_calibrated(&store, &CalibrationBenchmark::new());
        assert_eq!(settings, stored);
    }

    #[test]
    fn test_ensure_calibrated_runs_and_persists() {
        let store = MemorySettingsStore::new();
        let benchmark = CalibrationBenchmark::new().with_duration_ms(50);
        let settings = ensure_calibrated(&store, &benchmark);
        assert_eq!(store.load().unwrap(), Some(settings));
        assert_eq!(settings.percent_cpu, 50);
    }
}
