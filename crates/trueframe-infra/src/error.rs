//! Error output formatting
//!
//! `ErrorResponse` is the JSON shape binaries print when an operation fails.

use serde::Serialize;
use trueframe_core::{AppError, ErrorMetadata};

/// Standard error output format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorResponse {
    /// Build the user-facing form of `err`. `verbose` adds the error chain.
    pub fn from_app_error(err: &AppError, verbose: bool) -> Self {
        Self {
            error: err.client_message(),
            code: err.error_code(),
            suggestion: err.suggested_action(),
            details: verbose.then(|| err.detailed_message()),
            error_type: verbose.then(|| err.error_type().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terse_response_hides_chain() {
        let err = AppError::PolicyNotFound("oracle".to_string());
        let response = ErrorResponse::from_app_error(&err, false);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "POLICY_NOT_FOUND");
        assert_eq!(json["error"], "Unknown verification policy 'oracle'");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn verbose_response_includes_type() {
        let err = AppError::Internal("boom".to_string());
        let response = ErrorResponse::from_app_error(&err, true);
        assert_eq!(response.error, "Internal error");
        assert_eq!(response.error_type.as_deref(), Some("Internal"));
        assert!(response.details.unwrap().contains("boom"));
    }
}
