// Error types for the posture trainer
//
// This module defines custom error types for dataset and acquisition operations,
// providing structured error handling with stable numeric codes for CLI reporting.

mod acquisition;
mod dataset;

pub use acquisition::{log_acquisition_error, AcquisitionError, AcquisitionErrorCodes};
pub use dataset::{log_dataset_error, DatasetError, DatasetErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so the CLI and logs report them consistently.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
