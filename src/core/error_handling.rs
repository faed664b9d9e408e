//! Fatal error reporting
//!
//! Start-up failures either carry a message the operator can act on (a bad
//! endpoint, a missing config file) or are system failures where only the
//! operation context is useful at the default level.

/// Errors that know whether their own message is fit for the operator.
///
/// When `is_user_actionable()` is true, `user_message()` must return
/// `Some`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<String>;
}

/// Log a fatal error, preferring the operator-facing message when there is one.
///
/// Full detail is always available at debug level.
pub fn log_error_with_context<E: ContextualError>(error: &E, operation_context: &str) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Text printed to stderr when logging itself may be unavailable.
pub fn fatal_line<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => format!("Error: {}", user_msg),
        None => format!("Error: {}: {}", operation_context, error),
    }
}
