// FeatureExtractor - posture feature derivation
//
// Derives classification features from one 11-channel sample and the
// 5-channel baseline active when the sample was captured. Only s1..s5
// participate; the auxiliary channels ride along in the dataset row.
//
// Features:
// 1. p[i]  = s[i] / (S + EPS)            sample distribution
// 2. dp[i] = p[i] - pb[i]                deviation from baseline distribution
//    where pb[i] = b[i] / (Bsum + EPS)
// 3. r     = ln((S + EPS) / (Bsum + EPS)) log energy ratio
//
// EPS keeps every term defined when all readings are zero.

mod types;

pub use types::{
    BaselineVector, FeatureSet, SampleVector, BASELINE_CHANNELS, FEATURE_CHANNELS,
    SAMPLE_CHANNELS,
};

/// Additive guard on both distribution denominators
pub const EPS: f64 = 1.0;

impl FeatureSet {
    /// Derive features from the first five sample channels and a baseline
    ///
    /// # Arguments
    /// * `sample` - Channels s1..s5 of the sample
    /// * `baseline` - Baseline b1..b5 active at capture time
    ///
    /// # Returns
    /// Always-defined `FeatureSet` for finite non-negative inputs
    pub fn compute(sample: &[f64; FEATURE_CHANNELS], baseline: &BaselineVector) -> Self {
        let b_sum = baseline.total();
        let s_sum: f64 = sample.iter().sum();

        let mut p = [0.0; FEATURE_CHANNELS];
        let mut dp = [0.0; FEATURE_CHANNELS];
        for i in 0..FEATURE_CHANNELS {
            let pb = baseline.values()[i] / (b_sum + EPS);
            p[i] = sample[i] / (s_sum + EPS);
            dp[i] = p[i] - pb;
        }

        let r = ((s_sum + EPS) / (b_sum + EPS)).ln();

        Self { p, dp, r }
    }

    /// Derive features for a full sample capture
    pub fn from_sample(sample: &SampleVector, baseline: &BaselineVector) -> Self {
        Self::compute(&sample.primary(), baseline)
    }
}
