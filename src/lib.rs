// Posture Trainer Core - sensor dataset acquisition and classifier export
// Line protocol capture, feature derivation, CSV dataset store, and
// nearest-neighbor training table generation

// Module declarations
pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod protocol;

// Re-exports for convenience
pub use acquisition::{AcquisitionSession, OperatorConsole, SessionNotice, SessionSummary};
pub use analysis::{BaselineVector, FeatureSet, SampleVector};
pub use config::AppConfig;
pub use dataset::{load_or_create, Dataset, DatasetRow};
pub use error::{AcquisitionError, DatasetError, ErrorCode};
pub use export::{run_export, ExportReport};
pub use protocol::{FrameEvent, FrameReader};
