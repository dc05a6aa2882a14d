//! CLI error types.

use ident_client::ClientError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The identity client failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ident_client::ResourceKind;

    #[test]
    fn client_errors_pass_through() {
        let err = CliError::from(ClientError::NotFound {
            kind: ResourceKind::Sid,
            name_or_id: "blue".into(),
        });
        assert_eq!(err.to_string(), "No sid with a name or ID of 'blue' exists.");
    }

    #[test]
    fn cli_error_display_invalid_argument() {
        let err = CliError::InvalidArgument("bad property".into());
        assert_eq!(err.to_string(), "invalid argument: bad property");
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
