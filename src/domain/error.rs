// src/domain/error.rs
use crate::domain::note::{NoteId, TagId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Not logged in: run `notekeep login` first")]
    NotAuthenticated,
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("Tag not found: {0}")]
    TagNotFound(TagId),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failure of a call through the API gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("Request failed with status code {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: u16,
        message: Option<String>,
        code: Option<String>,
    },
    /// No usable response: connection refused, DNS, broken body stream.
    #[error("Transport error{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Transport { message: Option<String> },
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: Some(message.into()),
        }
    }

    /// Message provided by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }

    /// String shown to the user: server message, else transport message,
    /// else `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ApiError::Status { status, .. } => {
                format!("Request failed with status code {status}")
            }
            ApiError::Transport { message: Some(m) } if !m.trim().is_empty() => m.clone(),
            ApiError::Transport { .. } => fallback.to_string(),
            ApiError::Decode(m) => m.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        ApiError::Status { status: 400, message: Some("Note not found".to_string()), code: None },
        "Note not found"
    )]
    #[case(
        ApiError::Status { status: 500, message: None, code: None },
        "Request failed with status code 500"
    )]
    #[case(ApiError::transport("connection refused"), "connection refused")]
    #[case(ApiError::Transport { message: None }, "Failed to load notes")]
    #[case(ApiError::Transport { message: Some("  ".to_string()) }, "Failed to load notes")]
    fn test_display_message_precedence(#[case] error: ApiError, #[case] expected: &str) {
        assert_eq!(error.display_message("Failed to load notes"), expected);
    }

    #[test]
    fn given_status_error_with_code_when_inspecting_then_exposes_code() {
        let error = ApiError::Status {
            status: 409,
            message: Some("Tag exists".to_string()),
            code: Some("TAG_EXISTS".to_string()),
        };

        assert_eq!(error.code(), Some("TAG_EXISTS"));
        assert_eq!(error.server_message(), Some("Tag exists"));
        assert!(!error.is_unauthorized());
        assert_eq!(
            error.to_string(),
            "Request failed with status code 409: Tag exists"
        );
    }

    #[test]
    fn given_401_when_checking_then_is_unauthorized() {
        let error = ApiError::Status {
            status: 401,
            message: None,
            code: None,
        };
        assert!(error.is_unauthorized());
    }
}
