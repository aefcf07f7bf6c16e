//! Stream negotiation, sizing and conversion
//!
//! The [`Negotiator`] turns a pair of format descriptors into a
//! [`ConversionSession`]; the session then converts buffers and answers
//! buffer size queries for its stream.

pub mod formats;
pub mod negotiator;
pub mod session;
pub mod sizing;

pub use formats::{
    format_details, format_tag_details, standard_format, standard_format_count, FormatTagDetails,
    FormatTagQuery, STANDARD_SAMPLE_RATES,
};
pub use negotiator::Negotiator;
pub use session::ConversionSession;
pub use sizing::StreamGeometry;
