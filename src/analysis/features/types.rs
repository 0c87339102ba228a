// Types module - Data structures for sensor readings and derived features
//
// This module defines the vectors exchanged between the frame protocol,
// the feature extractor and the dataset store.

/// Number of channels in a baseline capture
pub const BASELINE_CHANNELS: usize = 5;

/// Number of channels in a sample capture
pub const SAMPLE_CHANNELS: usize = 11;

/// Number of leading sample channels that feed feature derivation
pub const FEATURE_CHANNELS: usize = 5;

/// Ambient/reference reading captured in the neutral posture
///
/// Replaced wholesale by the next baseline capture, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineVector(pub [f64; BASELINE_CHANNELS]);

impl BaselineVector {
    pub fn values(&self) -> &[f64; BASELINE_CHANNELS] {
        &self.0
    }

    /// Sum of all baseline channels (Bsum)
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// One 11-channel candidate reading awaiting a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleVector(pub [f64; SAMPLE_CHANNELS]);

impl SampleVector {
    pub fn values(&self) -> &[f64; SAMPLE_CHANNELS] {
        &self.0
    }

    /// Channels s1..s5 used for feature derivation
    pub fn primary(&self) -> [f64; FEATURE_CHANNELS] {
        let mut out = [0.0; FEATURE_CHANNELS];
        out.copy_from_slice(&self.0[..FEATURE_CHANNELS]);
        out
    }
}

/// Features derived from one sample and the baseline active at capture time
///
/// A persisted row freezes these values; they are never recomputed later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSet {
    /// Sample distribution: s[i] / (S + eps)
    pub p: [f64; FEATURE_CHANNELS],

    /// Deviation from the baseline distribution: p[i] - pb[i]
    pub dp: [f64; FEATURE_CHANNELS],

    /// Log energy ratio: ln((S + eps) / (Bsum + eps))
    pub r: f64,
}
