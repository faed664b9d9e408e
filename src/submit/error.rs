use thiserror::Error;

/// Failures that stop a submission from producing a reply.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Failed to build HTTP client: {reason}")]
    ClientSetup { reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {reason}")]
    Transport { reason: String },

    #[error("Failed to read response body: {reason}")]
    Body { reason: String },
}

impl SubmitError {
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SubmitError::Timeout
        } else {
            SubmitError::Transport {
                reason: error.to_string(),
            }
        }
    }
}
