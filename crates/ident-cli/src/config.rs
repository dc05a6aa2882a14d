//! Connection settings.
//!
//! Settings come from, in order of precedence:
//! - command-line flags
//! - `OS_*` environment variables (handled by clap)
//! - a TOML config file
//! - built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use ident_client::auth::DEFAULT_DOMAIN;
use ident_client::client::DEFAULT_REQUEST_TIMEOUT;
use ident_client::{ClientConfig, Credentials, PasswordAuth};
use serde::Deserialize;
use tracing::debug;

use crate::cli::AuthArgs;
use crate::error::CliError;

/// Contents of the optional config file.
///
/// ```toml
/// auth_url = "https://keystone.example:5000/v3"
/// timeout_secs = 30
///
/// [auth]
/// username = "admin"
/// password = "secret"
/// project_name = "admin"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Identity endpoint URL.
    pub auth_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Credentials.
    #[serde(default)]
    pub auth: FileAuth,
}

/// The `[auth]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileAuth {
    /// Pre-issued token.
    pub token: Option<String>,
    /// User name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Domain of the user.
    pub user_domain_name: Option<String>,
    /// Project to scope to.
    pub project_name: Option<String>,
    /// Domain of the project.
    pub project_domain_name: Option<String>,
}

impl FileConfig {
    /// Default location: `<config_dir>/ident/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ident").join("config.toml"))
    }

    /// Load the named file, or the default file when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read, or any
    /// file that is read cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config file");

        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        Self::from_toml(&content)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))
    }
}

/// Merge flags, environment and file into a client configuration.
///
/// # Errors
///
/// Returns an error if the endpoint or credentials are missing, or the
/// timeout is zero.
pub fn resolve(
    args: &AuthArgs,
    timeout_secs: Option<u64>,
    file: &FileConfig,
) -> Result<ClientConfig, CliError> {
    let auth_url = args
        .os_auth_url
        .clone()
        .or_else(|| file.auth_url.clone())
        .ok_or_else(|| {
            CliError::Config("identity URL not set; use --os-auth-url or OS_AUTH_URL".into())
        })?;

    let timeout = match timeout_secs.or(file.timeout_secs) {
        Some(0) => return Err(CliError::Config("timeout must be at least 1 second".into())),
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_REQUEST_TIMEOUT,
    };

    let credentials = resolve_credentials(args, &file.auth)?;

    Ok(ClientConfig {
        auth_url,
        credentials,
        timeout,
    })
}

fn resolve_credentials(args: &AuthArgs, file: &FileAuth) -> Result<Credentials, CliError> {
    if let Some(token) = args.os_token.clone().or_else(|| file.token.clone()) {
        return Ok(Credentials::Token(token));
    }

    let username = args.os_username.clone().or_else(|| file.username.clone());
    let password = args.os_password.clone().or_else(|| file.password.clone());

    match (username, password) {
        (Some(username), Some(password)) => {
            let domain_or_default = |flag: &Option<String>, file: &Option<String>| {
                flag.clone()
                    .or_else(|| file.clone())
                    .unwrap_or_else(|| DEFAULT_DOMAIN.to_string())
            };

            Ok(Credentials::Password(PasswordAuth {
                username,
                password,
                user_domain_name: domain_or_default(
                    &args.os_user_domain_name,
                    &file.user_domain_name,
                ),
                project_name: args.os_project_name.clone().or_else(|| file.project_name.clone()),
                project_domain_name: domain_or_default(
                    &args.os_project_domain_name,
                    &file.project_domain_name,
                ),
            }))
        }
        (Some(_), None) => Err(CliError::Config(
            "password not set; use --os-password or OS_PASSWORD".into(),
        )),
        (None, Some(_)) => Err(CliError::Config(
            "user name not set; use --os-username or OS_USERNAME".into(),
        )),
        (None, None) => Err(CliError::Config(
            "no credentials; set --os-token, or --os-username and --os-password".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn token_args() -> AuthArgs {
        AuthArgs {
            os_auth_url: Some("http://flag:5000/v3".into()),
            os_token: Some("flag-token".into()),
            ..AuthArgs::default()
        }
    }

    #[test]
    fn parses_full_file() {
        let config = FileConfig::from_toml(
            r#"
            auth_url = "http://file:5000/v3"
            timeout_secs = 5

            [auth]
            username = "alice"
            password = "s3cret"
            project_name = "ops"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.auth_url.as_deref(), Some("http://file:5000/v3"));
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.auth.project_name.as_deref(), Some("ops"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = FileConfig::from_toml("auth_uri = \"x\"").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig {
            auth_url: Some("http://file:5000/v3".into()),
            timeout_secs: Some(5),
            auth: FileAuth {
                token: Some("file-token".into()),
                ..FileAuth::default()
            },
        };

        let config = resolve(&token_args(), None, &file).expect("resolves");
        assert_eq!(config.auth_url, "http://flag:5000/v3");
        assert_eq!(config.credentials, Credentials::Token("flag-token".into()));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn file_fills_missing_flags() {
        let file = FileConfig {
            auth_url: Some("http://file:5000/v3".into()),
            timeout_secs: None,
            auth: FileAuth {
                username: Some("alice".into()),
                password: Some("s3cret".into()),
                user_domain_name: Some("corp".into()),
                ..FileAuth::default()
            },
        };

        let config = resolve(&AuthArgs::default(), Some(12), &file).expect("resolves");
        assert_eq!(config.auth_url, "http://file:5000/v3");
        assert_eq!(config.timeout, Duration::from_secs(12));
        match config.credentials {
            Credentials::Password(auth) => {
                assert_eq!(auth.username, "alice");
                assert_eq!(auth.user_domain_name, "corp");
                assert_eq!(auth.project_domain_name, DEFAULT_DOMAIN);
                assert_eq!(auth.project_name, None);
            }
            Credentials::Token(_) => panic!("expected password credentials"),
        }
    }

    #[test]
    fn missing_url_is_config_error() {
        let args = AuthArgs {
            os_token: Some("t".into()),
            ..AuthArgs::default()
        };
        let err = resolve(&args, None, &FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--os-auth-url"));
    }

    #[test]
    fn missing_credentials_is_config_error() {
        let args = AuthArgs {
            os_auth_url: Some("http://id:5000/v3".into()),
            ..AuthArgs::default()
        };
        let err = resolve(&args, None, &FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no credentials"));
    }

    #[test]
    fn username_without_password_is_config_error() {
        let args = AuthArgs {
            os_auth_url: Some("http://id:5000/v3".into()),
            os_username: Some("alice".into()),
            ..AuthArgs::default()
        };
        let err = resolve(&args, None, &FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--os-password"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = resolve(&token_args(), Some(0), &FileConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "auth_url = \"http://tmp:5000/v3\"").expect("write");

        let config = FileConfig::load(Some(file.path())).expect("loads");
        assert_eq!(config.auth_url.as_deref(), Some("http://tmp:5000/v3"));
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = FileConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
