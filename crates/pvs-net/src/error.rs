//! Error taxonomy for backend calls
//!
//! Four families, mirrored from how failures surface to the user:
//! non-success statuses (optionally carrying a structured message from the
//! response body), errors reported inside an otherwise successful response,
//! transport failures, and bodies that cannot be decoded. Validation
//! failures never reach this crate; they are handled before dispatch.

use thiserror::Error;

/// Failure of a backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-success HTTP status. `detail` carries the structured error
    /// message when the failure body provided one.
    #[error("HTTP error! status: {status}")]
    Status {
        /// Response status code.
        status: u16,
        /// Structured message from the failure body, when present.
        detail: Option<String>,
    },

    /// `{error}` payload on an otherwise successful response.
    #[error("{message}")]
    Backend {
        /// Message reported by the backend, rendered verbatim.
        message: String,
    },

    /// Connection-level failure before a status was received.
    #[error("{message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("{message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// Response decoded but carried neither a result nor an error.
    #[error("unexpected response shape")]
    UnexpectedShape,

    /// A request address could not be constructed.
    #[error("invalid address: {message}")]
    Address {
        /// Description of the address failure.
        message: String,
    },
}

impl ApiError {
    /// Status code of the response, when the failure carries one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend itself reported this failure in a success body.
    #[must_use]
    pub fn is_backend_reported(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// The message to surface for a failed request: the structured detail
    /// when the body provided one, else the status description.
    #[must_use]
    pub fn surface_message(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Address {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_renders_http_error_text() {
        let err = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.surface_message(), "HTTP error! status: 500");
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn status_detail_wins_in_surface_message() {
        let err = ApiError::Status {
            status: 422,
            detail: Some("Batch too large".into()),
        };
        assert_eq!(err.surface_message(), "Batch too large");
    }

    #[test]
    fn backend_reported_is_flagged() {
        let err = ApiError::Backend {
            message: "model unavailable".into(),
        };
        assert!(err.is_backend_reported());
        assert_eq!(err.surface_message(), "model unavailable");
    }
}
