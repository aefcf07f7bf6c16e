//! Utility functions for format handling
//!
//! Block geometry arithmetic, descriptor validation and the little-endian
//! descriptor record used to exchange formats with a host.

pub mod geometry;
pub mod record;
pub mod validation;

pub use geometry::{
    avg_bytes_per_sec, block_alignment, pcm_block_align, samples_per_block,
};
pub use record::{read_format_record, write_format_record};
pub use validation::{validate_format, validate_ima_adpcm_format, validate_pcm_format};
