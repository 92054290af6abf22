//! Engine-level errors
//!
//! Interactive flows never surface this type: their failures are rendered
//! terminally into the view and reported as outcome values. `EngineError`
//! exists for the edges only: building a session over HTTP, parsing a
//! session script, and the binary.

use pvs_net::ApiError;
use thiserror::Error;

/// Failure at a non-interactive engine edge.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A backend call failed while constructing or driving a session.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A session script line could not be parsed.
    #[error("invalid script step: {0}")]
    Script(String),

    /// The session configuration was unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Creates a script parse error.
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script(message.into())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_error_names_the_step() {
        let err = EngineError::script("page:abc");
        assert_eq!(err.to_string(), "invalid script step: page:abc");
    }

    #[test]
    fn api_errors_pass_through_transparently() {
        let err = EngineError::from(ApiError::Status {
            status: 503,
            detail: None,
        });
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }
}
