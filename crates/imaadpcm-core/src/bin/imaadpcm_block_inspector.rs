//! IMA ADPCM block stream inspector
//!
//! Dumps the per-channel block headers of a raw IMA ADPCM stream and flags
//! headers whose step index is outside the step table.

use imaadpcm_core::codecs::ima_adpcm::{BlockHeader, BLOCK_HEADER_SIZE};
use imaadpcm_core::utils::geometry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <adpcm_file> <channels> <sample_rate>", args[0]);
        eprintln!("Example: {} speech.ima 1 8000", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let channels: u16 = args[2].parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid channel count '{}'", args[2]);
        std::process::exit(1);
    });
    let sample_rate: u32 = args[3].parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid sample rate '{}'", args[3]);
        std::process::exit(1);
    });

    let block_align = match geometry::block_alignment(channels, sample_rate) {
        Ok(align) => align,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let samples_per_block = geometry::samples_per_block(block_align, channels)
        .expect("block alignment derived from a valid channel count");

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    let mut file = File::open(path).expect("Failed to open file");
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).expect("Failed to read file");

    let block_align = usize::from(block_align);
    let blocks = buffer.len() / block_align;

    println!("IMA ADPCM Block Inspector");
    println!("=========================");
    println!("File: {}", path.display());
    println!("Size: {} bytes", buffer.len());
    println!("Format: {}Hz, {} channel(s)", sample_rate, channels);
    println!("Block alignment: {} bytes, {} samples per block", block_align, samples_per_block);
    println!("Whole blocks: {}", blocks);
    let samples = blocks * usize::from(samples_per_block);
    println!(
        "Decodes to: {} samples per channel ({} bytes of 16-bit PCM)",
        samples,
        geometry::pcm_bytes_for_samples(samples, geometry::pcm_block_align(channels, 16))
    );
    if buffer.len() % block_align != 0 {
        println!("Trailing bytes: {}", buffer.len() % block_align);
    }
    println!();

    let mut corrupt = 0usize;
    for (index, block) in buffer.chunks_exact(block_align).enumerate() {
        print!("Block {:5}:", index);
        for channel in 0..usize::from(channels) {
            let offset = channel * BLOCK_HEADER_SIZE;
            let Some(header) = BlockHeader::parse(&block[offset..]) else {
                continue;
            };
            let marker = if header.is_valid() { "" } else { " CORRUPT" };
            if !header.is_valid() {
                corrupt += 1;
            }
            print!(
                "  ch{}: sample {:6} step {:3}{}",
                channel, header.predicted, header.step_index, marker
            );
        }
        println!();
    }

    println!();
    if corrupt == 0 {
        println!("All block headers valid");
    } else {
        println!("{} corrupt header(s) found", corrupt);
        std::process::exit(2);
    }
}
