//! Error Types
//!
//! One flat taxonomy for everything that can go wrong talking to the API
//! or persisting client state. Every variant ends up as a notice in the UI.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// Field name -> message, as shown next to form inputs
pub type FieldErrors = BTreeMap<String, String>;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Text for toasts and inline form errors. Server messages are shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Validation(errors) => errors
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| "Please check the form".to_string()),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ApiError::Server { status: 409, message: "Category name already exists".into() };
        assert_eq!(err.user_message(), "Category name already exists");
        assert_eq!(err.to_string(), "Server error (409): Category name already exists");
    }

    #[test]
    fn test_validation_message_uses_first_field() {
        let mut errors = FieldErrors::new();
        errors.insert("name".to_string(), "Name is required".to_string());
        let err = ApiError::Validation(errors);
        assert_eq!(err.user_message(), "Name is required");
        assert_eq!(err.to_string(), "Validation failed on 1 field(s)");
    }

    #[test]
    fn test_timeout_display() {
        let err = ApiError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Request timed out after 10s");
    }
}
