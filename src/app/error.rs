use crate::app::cli::config::ConfigError;
use crate::capture::CaptureError;
use crate::core::error_handling::ContextualError;
use crate::submit::SubmitError;
use thiserror::Error;

/// Fatal application errors. Submission rejections and network failures are
/// not here: they are shown to the operator and the scanner carries on.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Failed to draw the scanner frame: {reason}")]
    Display { reason: String },

    #[error("Failed to initialise logging: {reason}")]
    Logging { reason: String },
}

impl AppError {
    pub fn display(error: std::io::Error) -> Self {
        AppError::Display {
            reason: error.to_string(),
        }
    }
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Capture(CaptureError::Open { .. }) | AppError::Logging { .. }
        )
    }

    fn user_message(&self) -> Option<String> {
        self.is_user_actionable().then(|| self.to_string())
    }
}
