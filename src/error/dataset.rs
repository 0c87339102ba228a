// Dataset error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;
use std::io;
use std::path::Path;

/// Dataset error code constants
///
/// Error code range: 3001-3006
pub struct DatasetErrorCodes {}

impl DatasetErrorCodes {
    /// Dataset file exists but is not a readable table, or holds a non-numeric cell
    pub const PARSE: i32 = 3001;

    /// A required column is structurally absent from the table
    pub const SCHEMA: i32 = 3002;

    /// Destination file is locked or held open by another process
    pub const RESOURCE_BUSY: i32 = 3003;

    /// Any other I/O failure while reading or writing the dataset
    pub const IO: i32 = 3004;

    /// No complete training rows survived filtering
    pub const EMPTY_TRAINING_SET: i32 = 3005;

    /// A value destined for the exported table is NaN or infinite
    pub const NON_FINITE_VALUE: i32 = 3006;
}

/// Log a dataset error with structured context
///
/// Emits one line carrying the error code, the component and the message.
pub fn log_dataset_error(err: &DatasetError, context: &str) {
    error!(
        "Dataset error in {}: code={}, component=DatasetStore, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Dataset-related errors
///
/// These errors cover loading, saving and exporting the persisted table.
///
/// Error code ranges: 3001-3006
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// File cannot be read as a table, or a cell is not a number
    Parse { path: String, reason: String },

    /// Required column missing from the table entirely
    Schema { column: String },

    /// Destination locked by another process
    ResourceBusy { path: String },

    /// Other I/O failure
    Io { path: String, reason: String },

    /// Nothing left to export after filtering
    EmptyTrainingSet,

    /// NaN or infinite value in one of the exported arrays
    ///
    /// `row` is set for the sample matrix and `None` for the mean/std vectors.
    NonFiniteValue {
        array: String,
        row: Option<usize>,
        column: String,
    },
}

impl DatasetError {
    /// Classify an I/O failure on `path`.
    ///
    /// Permission denied (and the Windows sharing violation raised while a
    /// spreadsheet editor holds the file open) become [`DatasetError::ResourceBusy`];
    /// everything else is [`DatasetError::Io`].
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.display().to_string();
        if is_lock_violation(err) {
            DatasetError::ResourceBusy { path }
        } else {
            DatasetError::Io {
                path,
                reason: err.to_string(),
            }
        }
    }
}

/// Windows ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
const SHARING_VIOLATION_CODES: [i32; 2] = [32, 33];

fn is_lock_violation(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    cfg!(windows)
        && err
            .raw_os_error()
            .is_some_and(|code| SHARING_VIOLATION_CODES.contains(&code))
}

impl ErrorCode for DatasetError {
    fn code(&self) -> i32 {
        match self {
            DatasetError::Parse { .. } => DatasetErrorCodes::PARSE,
            DatasetError::Schema { .. } => DatasetErrorCodes::SCHEMA,
            DatasetError::ResourceBusy { .. } => DatasetErrorCodes::RESOURCE_BUSY,
            DatasetError::Io { .. } => DatasetErrorCodes::IO,
            DatasetError::EmptyTrainingSet => DatasetErrorCodes::EMPTY_TRAINING_SET,
            DatasetError::NonFiniteValue { .. } => DatasetErrorCodes::NON_FINITE_VALUE,
        }
    }

    fn message(&self) -> String {
        match self {
            DatasetError::Parse { path, reason } => {
                format!("Cannot read '{}' as a dataset table: {}", path, reason)
            }
            DatasetError::Schema { column } => {
                format!("Missing required column: '{}'", column)
            }
            DatasetError::ResourceBusy { path } => format!(
                "Couldn't write '{}' because it is open/locked. \
                 Close the spreadsheet editor (or any program holding the file) and retry.",
                path
            ),
            DatasetError::Io { path, reason } => {
                format!("I/O failure on '{}': {}", path, reason)
            }
            DatasetError::EmptyTrainingSet => {
                "No complete training rows to export".to_string()
            }
            DatasetError::NonFiniteValue { array, row, column } => match row {
                Some(row) => format!(
                    "Non-finite value in {} row {} column '{}'",
                    array, row, column
                ),
                None => format!("Non-finite value in {} column '{}'", array, column),
            },
        }
    }
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DatasetError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for DatasetError {}
