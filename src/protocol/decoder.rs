// FrameDecoder - capture framing state machine
//
// Two independent cycles share the Idle state:
//   Idle -> AwaitingBaselineData -> Idle   (BASELINE_SAVED, BASE_RAW_CSV=...)
//   Idle -> AwaitingSampleEnd    -> Idle   (SAMPLE_RAW_CSV=..., END_SAMPLE)
// While awaiting, every line that does not complete the cycle is dropped.

use crate::analysis::features::{
    BaselineVector, SampleVector, BASELINE_CHANNELS, SAMPLE_CHANNELS,
};
use crate::protocol::{BASELINE_MARKER, BASELINE_PREFIX, SAMPLE_END_MARKER, SAMPLE_PREFIX};

/// Complete capture recognized on the device stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    BaselineCaptured(BaselineVector),
    SampleCaptured(SampleVector),
}

/// Decoder position within a capture cycle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReaderState {
    #[default]
    Idle,
    AwaitingBaselineData,
    /// Sample data line seen; held until the end marker arrives
    AwaitingSampleEnd(SampleVector),
}

/// Parse `<prefix><f>,<f>,...` into exactly `N` finite numbers
///
/// Total function: any prefix mismatch, wrong field count or unparseable
/// field yields `None`, never a partially-filled array.
pub fn parse_csv_after<const N: usize>(prefix: &str, line: &str) -> Option<[f64; N]> {
    let payload = line.strip_prefix(prefix)?.trim();
    let mut out = [0.0; N];
    let mut count = 0;
    for field in payload.split(',') {
        if count == N {
            return None;
        }
        let value: f64 = field.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        out[count] = value;
        count += 1;
    }
    (count == N).then_some(out)
}

/// Line-at-a-time state machine producing [`FrameEvent`]s
#[derive(Debug, Default)]
pub struct FrameDecoder {
    state: ReaderState,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    /// Feed one trimmed, non-empty line
    ///
    /// # Returns
    /// * `Some(FrameEvent)` - The line completed a capture; decoder is back to Idle
    /// * `None` - The line was consumed as a transition or ignored as chatter
    pub fn feed(&mut self, line: &str) -> Option<FrameEvent> {
        match self.state {
            ReaderState::Idle => {
                if line == BASELINE_MARKER {
                    self.state = ReaderState::AwaitingBaselineData;
                } else if let Some(values) = parse_csv_after::<SAMPLE_CHANNELS>(SAMPLE_PREFIX, line)
                {
                    self.state = ReaderState::AwaitingSampleEnd(SampleVector(values));
                } else if line.starts_with(SAMPLE_PREFIX) {
                    log::warn!("[Protocol] Malformed sample line ignored: {}", line);
                }
                None
            }
            ReaderState::AwaitingBaselineData => {
                let values = parse_csv_after::<BASELINE_CHANNELS>(BASELINE_PREFIX, line);
                match values {
                    Some(values) => {
                        self.state = ReaderState::Idle;
                        Some(FrameEvent::BaselineCaptured(BaselineVector(values)))
                    }
                    None => {
                        if line.starts_with(BASELINE_PREFIX) {
                            log::warn!("[Protocol] Malformed baseline line ignored: {}", line);
                        }
                        None
                    }
                }
            }
            ReaderState::AwaitingSampleEnd(sample) => {
                if line == SAMPLE_END_MARKER {
                    self.state = ReaderState::Idle;
                    Some(FrameEvent::SampleCaptured(sample))
                } else {
                    None
                }
            }
        }
    }
}
