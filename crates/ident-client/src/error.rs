//! Error types for the identity client.

use thiserror::Error;

use crate::types::ResourceKind;

/// Errors returned by identity client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No resource matched the given name or id.
    #[error("No {kind} with a name or ID of '{name_or_id}' exists.")]
    NotFound {
        /// Kind of resource that was looked up.
        kind: ResourceKind,
        /// The name or id that was requested.
        name_or_id: String,
    },

    /// A name lookup matched several resources.
    #[error("More than one {kind} exists with the name '{name}'.")]
    NoUniqueMatch {
        /// Kind of resource that was looked up.
        kind: ResourceKind,
        /// The ambiguous name.
        name: String,
        /// Number of matches.
        count: usize,
    },

    /// Authentication was rejected or incomplete.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The service answered with an error status.
    #[error("identity service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
    },

    /// The request could not be sent or the response not received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The configured endpoint is not usable.
    #[error("invalid identity URL: {0}")]
    InvalidUrl(String),

    /// Connection settings are missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true for not-found errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = ClientError::NotFound {
            kind: ResourceKind::Sid,
            name_or_id: "blue".into(),
        };
        assert_eq!(err.to_string(), "No sid with a name or ID of 'blue' exists.");
        assert!(err.is_not_found());
    }

    #[test]
    fn no_unique_match_message() {
        let err = ClientError::NoUniqueMatch {
            kind: ResourceKind::Sip,
            name: "web".into(),
            count: 2,
        };
        assert_eq!(err.to_string(), "More than one sip exists with the name 'web'.");
        assert!(!err.is_not_found());
    }

    #[test]
    fn api_error_display() {
        let err = ClientError::Api {
            status: 409,
            message: "Duplicate entry".into(),
        };
        assert_eq!(err.to_string(), "identity service error (409): Duplicate entry");
    }
}
