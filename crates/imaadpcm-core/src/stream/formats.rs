//! Standard format enumeration
//!
//! The codec advertises a fixed set of canonical formats per tag: every
//! combination of the standard rates, one or two channels and (for PCM)
//! 8 or 16 bits.

use crate::error::{CodecError, Result};
use crate::types::{FormatDescriptor, FormatTag};
use crate::utils::record::record_size;
use crate::utils::validation::validate_format;
use once_cell::sync::Lazy;
use tracing::debug;

/// Sample rates of the standard formats
pub const STANDARD_SAMPLE_RATES: [u32; 4] = [8000, 11025, 22050, 44100];

/// PCM sample widths of the standard formats
pub const STANDARD_PCM_BITS: [u16; 2] = [8, 16];

/// Tags in enumeration order
pub const FORMAT_TAGS: [FormatTag; 2] = [FormatTag::Pcm, FormatTag::ImaAdpcm];

static STANDARD_PCM_FORMATS: Lazy<Vec<FormatDescriptor>> = Lazy::new(|| {
    (0..STANDARD_SAMPLE_RATES.len() * 4)
        .map(|index| {
            let rate = STANDARD_SAMPLE_RATES[index / 4];
            let channels = (index % 2 + 1) as u16;
            let bits = STANDARD_PCM_BITS[(index / 2) % 2];
            FormatDescriptor::pcm(channels, rate, bits)
        })
        .collect()
});

static STANDARD_ADPCM_FORMATS: Lazy<Vec<FormatDescriptor>> = Lazy::new(|| {
    (0..STANDARD_SAMPLE_RATES.len() * 2)
        .filter_map(|index| {
            let rate = STANDARD_SAMPLE_RATES[index / 2];
            let channels = (index % 2 + 1) as u16;
            FormatDescriptor::ima_adpcm(channels, rate).ok()
        })
        .collect()
});

fn standard_formats(tag: FormatTag) -> &'static [FormatDescriptor] {
    match tag {
        FormatTag::Pcm => &STANDARD_PCM_FORMATS,
        FormatTag::ImaAdpcm => &STANDARD_ADPCM_FORMATS,
    }
}

/// Number of standard formats for a tag
pub fn standard_format_count(tag: FormatTag) -> usize {
    standard_formats(tag).len()
}

/// Standard format `index` of a tag
///
/// PCM index `i` is rate `i / 4`, channels `i % 2 + 1` and bits
/// `[8, 16][(i / 2) % 2]`; IMA ADPCM index `i` is rate `i / 2` and channels
/// `i % 2 + 1`.
pub fn standard_format(tag: FormatTag, index: usize) -> Result<FormatDescriptor> {
    standard_formats(tag).get(index).copied().ok_or_else(|| {
        CodecError::not_possible(format!(
            "No standard {} format at index {} ({} available)",
            tag,
            index,
            standard_format_count(tag)
        ))
    })
}

/// Iterate over the standard formats of a tag
pub fn standard_formats_iter(tag: FormatTag) -> impl Iterator<Item = &'static FormatDescriptor> {
    standard_formats(tag).iter()
}

/// Summary of one supported format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTagDetails {
    /// Position of the tag in enumeration order
    pub index: usize,
    /// The tag itself
    pub tag: FormatTag,
    /// Size of a descriptor record for this tag
    pub record_size: usize,
    /// Number of standard formats under this tag
    pub standard_formats: usize,
}

impl FormatTagDetails {
    fn for_tag(tag: FormatTag) -> Self {
        let index = FORMAT_TAGS.iter().position(|&t| t == tag).unwrap_or(0);
        Self {
            index,
            tag,
            record_size: record_size(tag),
            standard_formats: standard_format_count(tag),
        }
    }
}

/// How a format tag is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTagQuery {
    /// By enumeration index
    Index(usize),
    /// By tag
    Tag(FormatTag),
    /// The tag with the largest record, optionally limited to one tag
    Largest(Option<FormatTag>),
}

/// Look up details of a supported format tag
pub fn format_tag_details(query: FormatTagQuery) -> Result<FormatTagDetails> {
    let details = match query {
        FormatTagQuery::Index(index) => {
            let tag = FORMAT_TAGS.get(index).copied().ok_or_else(|| {
                CodecError::not_possible(format!("No format tag at index {}", index))
            })?;
            FormatTagDetails::for_tag(tag)
        }
        FormatTagQuery::Tag(tag) => FormatTagDetails::for_tag(tag),
        // IMA ADPCM carries the larger record
        FormatTagQuery::Largest(tag) => FormatTagDetails::for_tag(tag.unwrap_or(FormatTag::ImaAdpcm)),
    };

    debug!("Format tag details for {:?}: {:?}", query, details);
    Ok(details)
}

/// Report whether an arbitrary descriptor is supported
///
/// Returns the descriptor unchanged when it passes validation for its tag.
pub fn format_details(format: &FormatDescriptor) -> Result<FormatDescriptor> {
    validate_format(format).map_err(|e| {
        CodecError::not_possible(format!("Unsupported format {}: {}", format, e))
    })?;
    Ok(*format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_counts() {
        assert_eq!(standard_format_count(FormatTag::Pcm), 16);
        assert_eq!(standard_format_count(FormatTag::ImaAdpcm), 8);
    }

    #[test]
    fn test_pcm_index_decoding() {
        let f = standard_format(FormatTag::Pcm, 0).unwrap();
        assert_eq!((f.sample_rate, f.channels, f.bits_per_sample), (8000, 1, 8));

        let f = standard_format(FormatTag::Pcm, 3).unwrap();
        assert_eq!((f.sample_rate, f.channels, f.bits_per_sample), (8000, 2, 16));

        let f = standard_format(FormatTag::Pcm, 13).unwrap();
        assert_eq!((f.sample_rate, f.channels, f.bits_per_sample), (44100, 2, 8));

        assert!(standard_format(FormatTag::Pcm, 16).is_err());
    }

    #[test]
    fn test_adpcm_index_decoding() {
        let f = standard_format(FormatTag::ImaAdpcm, 5).unwrap();
        assert_eq!((f.sample_rate, f.channels), (22050, 2));
        assert_eq!(f.block_align, 1024);
        assert!(standard_format(FormatTag::ImaAdpcm, 8).is_err());
    }

    #[test]
    fn test_standard_formats_validate() {
        for tag in FORMAT_TAGS {
            for format in standard_formats_iter(tag) {
                assert!(validate_format(format).is_ok(), "{}", format);
            }
        }
    }

    #[test]
    fn test_format_tag_details() {
        let pcm = format_tag_details(FormatTagQuery::Index(0)).unwrap();
        assert_eq!(pcm.tag, FormatTag::Pcm);
        assert_eq!(pcm.record_size, 16);
        assert_eq!(pcm.standard_formats, 16);

        let adpcm = format_tag_details(FormatTagQuery::Largest(None)).unwrap();
        assert_eq!(adpcm.tag, FormatTag::ImaAdpcm);
        assert_eq!(adpcm.index, 1);
        assert_eq!(adpcm.record_size, 20);

        let pcm = format_tag_details(FormatTagQuery::Largest(Some(FormatTag::Pcm))).unwrap();
        assert_eq!(pcm.record_size, 16);

        assert!(format_tag_details(FormatTagQuery::Index(2)).is_err());
    }

    #[test]
    fn test_format_details() {
        let format = FormatDescriptor::ima_adpcm(1, 11025).unwrap();
        assert_eq!(format_details(&format).unwrap(), format);

        let mut bad = format;
        bad.extra_size = 4;
        let err = format_details(&bad).unwrap_err();
        assert!(matches!(err, CodecError::ConversionNotPossible { .. }));
    }
}
