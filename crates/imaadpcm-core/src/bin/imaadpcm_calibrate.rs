//! Real-time calibration tool
//!
//! Runs the throughput benchmark and writes the resulting rate tiers to a
//! TOML settings file that `TomlSettingsStore` can load.

use imaadpcm_core::calibration::settings::{tier_rate, RATE_TIERS};
use imaadpcm_core::calibration::{CalibrationBenchmark, SettingsStore, TomlSettingsStore};

fn main() {
    imaadpcm_core::init().expect("Failed to initialize library");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <settings.toml> [duration_ms] [percent_cpu]", args[0]);
        eprintln!("Example: {} ~/.config/imaadpcm/calibration.toml 1000 50", args[0]);
        std::process::exit(1);
    }

    let mut benchmark = CalibrationBenchmark::new();
    if let Some(duration) = args.get(2) {
        let duration: u32 = duration.parse().unwrap_or_else(|_| {
            eprintln!("Error: invalid duration '{}'", duration);
            std::process::exit(1);
        });
        benchmark = benchmark.with_duration_ms(duration);
    }
    if let Some(percent) = args.get(3) {
        let percent: u32 = percent.parse().unwrap_or_else(|_| {
            eprintln!("Error: invalid CPU percentage '{}'", percent);
            std::process::exit(1);
        });
        benchmark = benchmark.with_percent_cpu(percent);
    }

    println!("IMA ADPCM Real-Time Calibration");
    println!("===============================");
    println!("Duration: {} ms, CPU margin: {}%", benchmark.duration_ms(), benchmark.percent_cpu());
    println!("Rate tiers: {:?}", RATE_TIERS);
    println!();

    let report = match benchmark.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: benchmark failed: {}", e);
            std::process::exit(1);
        }
    };

    let settings = report.settings;
    println!(
        "Encode: {:?} -> {} mono samples/s -> tier {} ({} Hz)",
        report.encode_elapsed,
        report.encode_rate,
        settings.max_rt_encode_setting,
        tier_rate(settings.max_rt_encode_setting)
    );
    println!(
        "Decode: {:?} -> {} mono samples/s -> tier {} ({} Hz)",
        report.decode_elapsed,
        report.decode_rate,
        settings.max_rt_decode_setting,
        tier_rate(settings.max_rt_decode_setting)
    );

    let store = TomlSettingsStore::new(&args[1]);
    if let Err(e) = store.save(&settings) {
        eprintln!("Error: could not write {}: {}", store.path().display(), e);
        std::process::exit(1);
    }
    println!();
    println!("Saved settings to {}", store.path().display());
}
