// Frame protocol - line-oriented capture framing from the sensor device
//
// The device prints newline-terminated ASCII lines:
//   BASELINE_SAVED
//   BASE_RAW_CSV=b1,b2,b3,b4,b5
//   SAMPLE_RAW_CSV=s1,...,s11
//   END_SAMPLE
// Anything else is chatter and is ignored.
//
// Module organization:
// - decoder: pure state machine turning lines into FrameEvents
// - reader: pulls lines from a blocking byte stream and feeds the decoder

mod decoder;
mod reader;

pub use decoder::{parse_csv_after, FrameDecoder, FrameEvent, ReaderState};
pub use reader::FrameReader;

/// Marker line announcing that the next data line carries the baseline
pub const BASELINE_MARKER: &str = "BASELINE_SAVED";

/// Prefix of the baseline data line
pub const BASELINE_PREFIX: &str = "BASE_RAW_CSV=";

/// Prefix of the sample data line
pub const SAMPLE_PREFIX: &str = "SAMPLE_RAW_CSV=";

/// Marker line closing a sample
pub const SAMPLE_END_MARKER: &str = "END_SAMPLE";
