//! Credentials and token issuance.

use serde_json::{Value, json};

/// Domain used when none is configured.
pub const DEFAULT_DOMAIN: &str = "Default";

/// Header carrying the caller's token on every request.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Header carrying a freshly issued token.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// How the client proves its identity.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A token issued out of band.
    Token(String),
    /// User name and password, exchanged for a token at connect time.
    Password(PasswordAuth),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(<redacted>)"),
            Self::Password(auth) => f.debug_tuple("Password").field(auth).finish(),
        }
    }
}

/// Password method parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordAuth {
    /// User name.
    pub username: String,
    /// User password.
    pub password: String,
    /// Domain the user belongs to.
    pub user_domain_name: String,
    /// Project to scope the token to, if any.
    pub project_name: Option<String>,
    /// Domain the scoping project belongs to.
    pub project_domain_name: String,
}

impl std::fmt::Debug for PasswordAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordAuth")
            .field("username", &self.username)
            .field("user_domain_name", &self.user_domain_name)
            .field("project_name", &self.project_name)
            .field("project_domain_name", &self.project_domain_name)
            .finish_non_exhaustive()
    }
}

impl PasswordAuth {
    /// Unscoped password auth in the default domain.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_domain_name: DEFAULT_DOMAIN.to_string(),
            project_name: None,
            project_domain_name: DEFAULT_DOMAIN.to_string(),
        }
    }

    /// Body for `POST auth/tokens`.
    #[must_use]
    pub fn token_request(&self) -> Value {
        let mut auth = json!({
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": self.username,
                        "domain": { "name": self.user_domain_name },
                        "password": self.password,
                    }
                }
            }
        });

        if let Some(project) = &self.project_name {
            auth["scope"] = json!({
                "project": {
                    "name": project,
                    "domain": { "name": self.project_domain_name },
                }
            });
        }

        json!({ "auth": auth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscoped_token_request() {
        let body = PasswordAuth::new("alice", "s3cret").token_request();
        let user = &body["auth"]["identity"]["password"]["user"];
        assert_eq!(user["name"], "alice");
        assert_eq!(user["password"], "s3cret");
        assert_eq!(user["domain"]["name"], DEFAULT_DOMAIN);
        assert!(body["auth"].get("scope").is_none());
    }

    #[test]
    fn project_scoped_token_request() {
        let mut auth = PasswordAuth::new("alice", "s3cret");
        auth.project_name = Some("ops".into());
        auth.project_domain_name = "corp".into();

        let body = auth.token_request();
        assert_eq!(body["auth"]["scope"]["project"]["name"], "ops");
        assert_eq!(body["auth"]["scope"]["project"]["domain"]["name"], "corp");
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::Token("tok-123".into());
        assert!(!format!("{creds:?}").contains("tok-123"));

        let creds = Credentials::Password(PasswordAuth::new("alice", "s3cret"));
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("s3cret"));
    }
}
