//! Lazily connected identity client.
//!
//! Settings are resolved up front but the connection (and any token
//! request) only happens on the first remote call, so commands that end
//! up doing nothing never need credentials.

use ident_client::{
    ClientConfig, ClientError, HttpIdentityClient, IdentityClient, Sid, SidCreate, SidFilter,
    SidId, SidUpdate, Sip, SipCreate, SipFilter, SipId, SipUpdate,
};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{self, FileConfig};
use crate::error::CliError;

type Result<T> = std::result::Result<T, ClientError>;

/// Identity client that connects on first use.
#[derive(Debug)]
pub struct Session {
    settings: std::result::Result<ClientConfig, String>,
    client: OnceCell<HttpIdentityClient>,
}

impl Session {
    /// Resolve settings from parsed arguments and the config file.
    ///
    /// Resolution failures are reported when a remote call is first made.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let settings = FileConfig::load(cli.config.as_deref())
            .and_then(|file| config::resolve(&cli.auth, cli.timeout, &file))
            .map_err(|e| match e {
                CliError::Config(message) => message,
                other => other.to_string(),
            });
        Self::new(settings)
    }

    /// Create a session from already resolved settings.
    #[must_use]
    pub fn new(settings: std::result::Result<ClientConfig, String>) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    /// True once a connection has been established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&HttpIdentityClient> {
        self.client
            .get_or_try_init(|| async {
                let config = self.settings.clone().map_err(ClientError::Config)?;
                debug!(url = %config.auth_url, "connecting to identity service");
                HttpIdentityClient::connect(config).await
            })
            .await
    }
}

impl IdentityClient for Session {
    async fn list_sids(&self, filter: &SidFilter) -> Result<Vec<Sid>> {
        self.client().await?.list_sids(filter).await
    }

    async fn get_sid(&self, id: &SidId) -> Result<Sid> {
        self.client().await?.get_sid(id).await
    }

    async fn create_sid(&self, request: &SidCreate) -> Result<Sid> {
        self.client().await?.create_sid(request).await
    }

    async fn update_sid(&self, id: &SidId, request: &SidUpdate) -> Result<Sid> {
        self.client().await?.update_sid(id, request).await
    }

    async fn delete_sid(&self, id: &SidId) -> Result<()> {
        self.client().await?.delete_sid(id).await
    }

    async fn list_sips(&self, filter: &SipFilter) -> Result<Vec<Sip>> {
        self.client().await?.list_sips(filter).await
    }

    async fn get_sip(&self, id: &SipId) -> Result<Sip> {
        self.client().await?.get_sip(id).await
    }

    async fn create_sip(&self, request: &SipCreate) -> Result<Sip> {
        self.client().await?.create_sip(request).await
    }

    async fn update_sip(&self, id: &SipId, request: &SipUpdate) -> Result<Sip> {
        self.client().await?.update_sip(id, request).await
    }

    async fn delete_sip(&self, id: &SipId) -> Result<()> {
        self.client().await?.delete_sip(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ident_client::Credentials;

    #[tokio::test]
    async fn settings_error_surfaces_on_first_call() {
        let session = Session::new(Err("identity URL not set".into()));
        assert!(!session.is_connected());

        let err = session.list_sids(&SidFilter::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "configuration error: identity URL not set");
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn connects_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/sids")
            .with_status(200)
            .with_body(r#"{"sids": []}"#)
            .expect(2)
            .create_async()
            .await;

        let config = ClientConfig::new(
            format!("{}/v3", server.url()),
            Credentials::Token("t".into()),
        );
        let session = Session::new(Ok(config));

        session.list_sids(&SidFilter::default()).await.expect("first");
        assert!(session.is_connected());
        session.list_sids(&SidFilter::default()).await.expect("second");
        mock.assert_async().await;
    }
}
