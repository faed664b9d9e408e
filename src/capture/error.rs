use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Failed to open capture source {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("Failed to read from capture source: {reason}")]
    Read { reason: String },

    #[error("Discarded a {length}-byte payload that is not valid UTF-8")]
    Undecodable { length: usize },
}

impl CaptureError {
    /// Whether the source can keep producing lines after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CaptureError::Undecodable { .. })
    }
}
