//! Error handling for wavsplice
//!
//! Every editing failure reports which invariant was violated together with
//! the offending values, so callers can render an actionable message.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::buffer::AudioFormat;

/// Result type alias for wavsplice operations
pub type Result<T> = std::result::Result<T, SpliceError>;

/// Main error type for wavsplice operations
#[derive(Error, Debug)]
pub enum SpliceError {
    // Buffer Construction Errors
    #[error("Invalid buffer dimensions: {reason}")]
    InvalidDimensions { reason: String },

    // Editing Errors
    #[error("Invalid range: {start_secs:.3}s..{end_secs:.3}s (audio is {duration_secs:.3}s long)")]
    InvalidRange {
        start_secs: f64,
        end_secs: f64,
        duration_secs: f64,
    },

    #[error("Position out of bounds: {position} (valid range {lower}..{upper})")]
    OutOfBounds {
        position: f64,
        lower: f64,
        upper: f64,
    },

    #[error("Incompatible format at input {index}: expected {expected}, found {found}")]
    IncompatibleFormat {
        index: usize,
        expected: AudioFormat,
        found: AudioFormat,
    },

    #[error("Not enough inputs: got {count}, need at least {required}")]
    InsufficientInput { count: usize, required: usize },

    #[error("No split points given")]
    EmptyBoundarySet,

    // Collaborator Errors
    #[error("Could not decode audio: {reason}")]
    Decode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpliceError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SpliceError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
            SpliceError::InvalidRange { .. } => "INVALID_RANGE",
            SpliceError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            SpliceError::IncompatibleFormat { .. } => "INCOMPATIBLE_FORMAT",
            SpliceError::InsufficientInput { .. } => "INSUFFICIENT_INPUT",
            SpliceError::EmptyBoundarySet => "EMPTY_BOUNDARY_SET",
            SpliceError::Decode { .. } => "DECODE_ERROR",
            SpliceError::FileNotFound { .. } => "FILE_NOT_FOUND",
            SpliceError::Io(_) => "IO_ERROR",
            SpliceError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can fix this error by changing its request
    ///
    /// Nothing here is transient: retrying the same call gives the same error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SpliceError::InvalidRange { .. }
                | SpliceError::OutOfBounds { .. }
                | SpliceError::IncompatibleFormat { .. }
                | SpliceError::InsufficientInput { .. }
                | SpliceError::EmptyBoundarySet
                | SpliceError::FileNotFound { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SpliceError::InvalidRange { .. } => vec![
                "Make sure the start time is before the end time",
                "Keep both times within the length of the audio",
                "Pass --clamp to fit the range to the audio length",
            ],
            SpliceError::OutOfBounds { .. } => vec![
                "Split points must lie strictly inside the audio",
                "Check the audio length with the 'info' command",
            ],
            SpliceError::IncompatibleFormat { .. } => vec![
                "Convert all inputs to the same sample rate first",
                "Convert all inputs to the same channel count first",
            ],
            SpliceError::InsufficientInput { .. } => {
                vec!["Joining needs at least two input files"]
            }
            SpliceError::EmptyBoundarySet => vec![
                "Give at least one split point with --at",
                "To keep the file whole, copy it instead of splitting",
            ],
            SpliceError::Decode { .. } => vec![
                "Only uncompressed WAV input is supported",
                "Check if the file plays in another application",
            ],
            SpliceError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            _ => vec![],
        }
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            SpliceError::InvalidRange {
                start_secs,
                end_secs,
                duration_secs,
            } => format!(
                "Can't cut from {:.2}s to {:.2}s: the audio is only {:.2}s long and the start has to come before the end.",
                start_secs, end_secs, duration_secs
            ),
            SpliceError::IncompatibleFormat {
                index, expected, found,
            } => format!(
                "File #{} is {}, but the first file is {}. All files must share one format to be joined.",
                index + 1,
                found,
                expected
            ),
            SpliceError::EmptyBoundarySet => {
                "Pick at least one point to split the audio at.".to_string()
            }
            SpliceError::FileNotFound { path } => {
                format!("I couldn't find the file at '{}'.", path.display())
            }
            _ => self.to_string(),
        }
    }
}
