// Analysis module - feature derivation for posture samples
//
// Holds the pure math that turns a raw capture plus the active baseline
// into the p/dp/r features persisted with each dataset row.

pub mod features;

pub use features::{BaselineVector, FeatureSet, SampleVector};
