// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the API client, session and pages.

use reqwest::StatusCode;

/// Application error type.
///
/// Every variant is recoverable: a page that receives one of these returns to
/// a usable state and the user re-triggers the action.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Transport(String),

    /// Client-side validation rejected the form before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The backend answered 409: the entity already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-2xx response.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Authentication required")]
    Unauthenticated,

    /// The route guard sent the user somewhere else.
    #[error("Access denied, redirected to {0}")]
    Forbidden(&'static str),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    /// A multi-step change failed after an earlier step was already applied.
    #[error("{0} (partially applied)")]
    Partial(Box<AppError>),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Fallback text when a non-2xx response carries no `message`.
    pub const NO_MESSAGE: &'static str = "no message";

    /// Build the error for a non-2xx response.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| Self::NO_MESSAGE.to_string());

        if status == StatusCode::CONFLICT {
            AppError::Conflict(message)
        } else {
            AppError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Check whether this is a uniqueness conflict (HTTP 409).
    pub fn is_conflict(&self) -> bool {
        match self {
            AppError::Conflict(_) => true,
            AppError::Partial(inner) => inner.is_conflict(),
            _ => false,
        }
    }

    /// Check whether the backend was left changed by a failed operation.
    pub fn is_partial(&self) -> bool {
        matches!(self, AppError::Partial(_))
    }

    /// Mark a failure that happened after an earlier step succeeded.
    pub fn partial(self) -> Self {
        match self {
            AppError::Partial(_) => self,
            other => AppError::Partial(Box::new(other)),
        }
    }

    /// The `message` the backend attached to its error response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Conflict(msg) | AppError::Server { message: msg, .. }
                if msg != Self::NO_MESSAGE =>
            {
                Some(msg.as_str())
            }
            AppError::Partial(inner) => inner.server_message(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_status_maps_to_conflict() {
        let err = AppError::from_status(StatusCode::CONFLICT, Some("duplicate".to_string()));
        assert!(err.is_conflict());
        assert_eq!(err.server_message(), Some("duplicate"));
    }

    #[test]
    fn test_blank_message_has_no_server_message() {
        let err = AppError::from_status(StatusCode::INTERNAL_SERVER_ERROR, Some("  ".to_string()));
        assert!(!err.is_conflict());
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "HTTP 500: no message");
    }

    #[test]
    fn test_partial_keeps_inner_details() {
        let err = AppError::from_status(StatusCode::CONFLICT, Some("duplicate".to_string()));
        let err = err.partial();
        assert!(err.is_partial());
        assert!(err.is_conflict());
        assert_eq!(err.server_message(), Some("duplicate"));
        assert!(matches!(err.partial(), AppError::Partial(inner) if !inner.is_partial()));
    }
}
