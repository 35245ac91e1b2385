//! Error types module
//!
//! All library errors are unified under the `AppError` enum. Simulated
//! verification outcomes (warning, rejected) are *not* errors; this type only
//! covers guarded conditions such as unsupported media or an action invoked in
//! the wrong verification state.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to a user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UNSUPPORTED_MEDIA_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (the action can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("Cannot {action} while verification is {state}")]
    InvalidState { action: &'static str, state: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Verification policy not found: {0}")]
    PolicyNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            Some("Check the arguments and try again"),
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType { .. } => (
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Select a photo or a video"),
            LogLevel::Debug,
        ),
        AppError::InvalidState { .. } => (
            "INVALID_STATE",
            true,
            Some("Wait for verification to finish or start a new upload"),
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            "NOT_FOUND",
            false,
            Some("Verify the identifier exists"),
            LogLevel::Debug,
        ),
        AppError::PolicyNotFound(_) => (
            "POLICY_NOT_FOUND",
            false,
            Some("Use one of the registered verification policies"),
            LogLevel::Warn,
        ),
        AppError::Configuration(_) => (
            "CONFIGURATION_ERROR",
            false,
            Some("Check TRUEFRAME_* environment variables"),
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error output
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            AppError::InvalidState { .. } => "InvalidState",
            AppError::NotFound(_) => "NotFound",
            AppError::PolicyNotFound(_) => "PolicyNotFound",
            AppError::Configuration(_) => "Configuration",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType { content_type } => {
                format!("'{}' is not a photo or video", content_type)
            }
            AppError::InvalidState { action, state } => {
                format!("Cannot {} while verification is {}", action, state)
            }
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::PolicyNotFound(ref name) => {
                format!("Unknown verification policy '{}'", name)
            }
            AppError::Configuration(ref msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal error".to_string()
            }
        }
    }
}
