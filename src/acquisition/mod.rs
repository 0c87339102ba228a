// Acquisition module - labeled capture workflow
//
// This module provides the operator-facing side of data collection:
// 1. AcquisitionSession: owns the active baseline and the dataset for one run
// 2. OperatorConsole: seam for the label prompt and operator notices
// 3. parse_label: label validation
//
// Session workflow:
// 1. Capture a baseline in the neutral posture (BASELINE_SAVED + BASE_RAW_CSV)
// 2. Each sample capture (SAMPLE_RAW_CSV + END_SAMPLE) asks for a label
// 3. A labeled sample becomes one dataset row, saved before the next capture

pub mod console;
pub mod label;
pub mod session;

pub use console::{OperatorConsole, SessionNotice, TerminalConsole};
pub use label::parse_label;
pub use session::{AcquisitionSession, SessionSummary};
