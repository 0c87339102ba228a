// Acquisition error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Acquisition error code constants
///
/// Error code range: 4001-4004
pub struct AcquisitionErrorCodes {}

impl AcquisitionErrorCodes {
    /// Operator label is non-numeric or outside the accepted range
    pub const INVALID_LABEL: i32 = 4001;

    /// Sample completed before any baseline was captured
    pub const MISSING_BASELINE: i32 = 4002;

    /// Device stream could not be read
    pub const STREAM_READ: i32 = 4003;

    /// Operator console could not be read or written
    pub const CONSOLE: i32 = 4004;
}

/// Log an acquisition error with structured context
pub fn log_acquisition_error(err: &AcquisitionError, context: &str) {
    error!(
        "Acquisition error in {}: code={}, component=AcquisitionSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Acquisition-related errors
///
/// `InvalidLabel` and `MissingBaseline` are recovered locally by discarding
/// the sample; the stream and console variants end the session.
///
/// Error code ranges: 4001-4004
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionError {
    /// Label rejected by validation
    InvalidLabel { input: String, min: i32, max: i32 },

    /// No active baseline for the completed sample
    MissingBaseline,

    /// Device stream read failure
    StreamRead { reason: String },

    /// Operator console failure
    Console { reason: String },
}

impl ErrorCode for AcquisitionError {
    fn code(&self) -> i32 {
        match self {
            AcquisitionError::InvalidLabel { .. } => AcquisitionErrorCodes::INVALID_LABEL,
            AcquisitionError::MissingBaseline => AcquisitionErrorCodes::MISSING_BASELINE,
            AcquisitionError::StreamRead { .. } => AcquisitionErrorCodes::STREAM_READ,
            AcquisitionError::Console { .. } => AcquisitionErrorCodes::CONSOLE,
        }
    }

    fn message(&self) -> String {
        match self {
            AcquisitionError::InvalidLabel { input, min, max } => format!(
                "Invalid label '{}': expected an integer in [{}, {}]. Sample skipped.",
                input, min, max
            ),
            AcquisitionError::MissingBaseline => {
                "No baseline yet. Capture a baseline in the neutral posture first.".to_string()
            }
            AcquisitionError::StreamRead { reason } => {
                format!("Failed to read device stream: {}", reason)
            }
            AcquisitionError::Console { reason } => {
                format!("Operator console failure: {}", reason)
            }
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AcquisitionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AcquisitionError {}
