//! Identity client trait and its HTTP implementation.
//!
//! [`HttpIdentityClient`] speaks the identity service's JSON REST API. Each
//! resource lives under `<endpoint>/<collection>[/<id>]` and travels wrapped
//! in a single-key object (`{"sid": {...}}`, `{"sips": [...]}`).
//!
//! # Example
//!
//! ```rust,no_run
//! use ident_client::{ClientConfig, Credentials, HttpIdentityClient, IdentityClient, SidFilter};
//!
//! # async fn example() -> Result<(), ident_client::ClientError> {
//! let config = ClientConfig::new("http://localhost:5000/v3", Credentials::Token("abc".into()));
//! let client = HttpIdentityClient::connect(config).await?;
//! for sid in client.list_sids(&SidFilter::default()).await? {
//!     println!("{} {}", sid.id, sid.name);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AUTH_TOKEN_HEADER, Credentials, PasswordAuth, SUBJECT_TOKEN_HEADER};
use crate::error::{ClientError, Result};
use crate::types::{
    ResourceKind, Sid, SidCreate, SidFilter, SidId, SidUpdate, Sip, SipCreate, SipFilter, SipId,
    SipUpdate,
};

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote CRUD operations on sids and sips.
#[allow(async_fn_in_trait)]
pub trait IdentityClient {
    /// List sids matching the filter.
    async fn list_sids(&self, filter: &SidFilter) -> Result<Vec<Sid>>;

    /// Fetch a sid by id.
    async fn get_sid(&self, id: &SidId) -> Result<Sid>;

    /// Create a sid.
    async fn create_sid(&self, request: &SidCreate) -> Result<Sid>;

    /// Apply changes to a sid.
    async fn update_sid(&self, id: &SidId, request: &SidUpdate) -> Result<Sid>;

    /// Delete a sid.
    async fn delete_sid(&self, id: &SidId) -> Result<()>;

    /// List sips matching the filter.
    async fn list_sips(&self, filter: &SipFilter) -> Result<Vec<Sip>>;

    /// Fetch a sip by id.
    async fn get_sip(&self, id: &SipId) -> Result<Sip>;

    /// Create a sip.
    async fn create_sip(&self, request: &SipCreate) -> Result<Sip>;

    /// Apply changes to a sip.
    async fn update_sip(&self, id: &SipId, request: &SipUpdate) -> Result<Sip>;

    /// Delete a sip.
    async fn delete_sip(&self, id: &SipId) -> Result<()>;
}

/// Settings for [`HttpIdentityClient::connect`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity endpoint, e.g. `https://keystone.example:5000/v3`.
    pub auth_url: String,
    /// How to authenticate.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config with the default request timeout.
    #[must_use]
    pub fn new(auth_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            auth_url: auth_url.into(),
            credentials,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Identity client backed by the service's REST API.
pub struct HttpIdentityClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl std::fmt::Debug for HttpIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpIdentityClient {
    /// Build the HTTP client and authenticate.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is invalid (must be `http://` or `https://`)
    /// - The token request is rejected
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.auth_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .user_agent(concat!("ident/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let token = match config.credentials {
            Credentials::Token(token) => token,
            Credentials::Password(auth) => issue_token(&http, &endpoint, &auth).await?,
        };

        debug!(endpoint = %endpoint, "identity client ready");
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    /// The identity endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = join(&self.endpoint, segments)?;
        trace!(%method, %url, "identity request");
        Ok(self
            .http
            .request(method, url)
            .header(AUTH_TOKEN_HEADER, &self.token))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        kind: ResourceKind,
        id: Option<&str>,
    ) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        trace!(status = status.as_u16(), "identity response");

        if status.is_success() {
            return Ok(response);
        }

        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(ClientError::NotFound {
                kind,
                name_or_id: id.to_string(),
            }),
            (StatusCode::UNAUTHORIZED, _) => Err(ClientError::Auth(error_message(response).await)),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>> {
        let mut request = self.request(Method::GET, &[kind.collection()])?;
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request, kind, None).await?;
        unwrap_body(response, kind.collection()).await
    }

    async fn get<T: DeserializeOwned>(&self, kind: ResourceKind, id: &str) -> Result<T> {
        let request = self.request(Method::GET, &[kind.collection(), id])?;
        let response = self.send(request, kind, Some(id)).await?;
        unwrap_body(response, kind.member()).await
    }

    async fn create<T: DeserializeOwned, B: Serialize>(
        &self,
        kind: ResourceKind,
        body: &B,
    ) -> Result<T> {
        let request = self
            .request(Method::POST, &[kind.collection()])?
            .json(&wrap_body(kind, body)?);
        let response = self.send(request, kind, None).await?;
        unwrap_body(response, kind.member()).await
    }

    async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &B,
    ) -> Result<T> {
        let request = self
            .request(Method::PATCH, &[kind.collection(), id])?
            .json(&wrap_body(kind, body)?);
        let response = self.send(request, kind, Some(id)).await?;
        unwrap_body(response, kind.member()).await
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &[kind.collection(), id])?;
        self.send(request, kind, Some(id)).await?;
        Ok(())
    }
}

impl IdentityClient for HttpIdentityClient {
    async fn list_sids(&self, filter: &SidFilter) -> Result<Vec<Sid>> {
        self.list(ResourceKind::Sid, &filter.query()).await
    }

    async fn get_sid(&self, id: &SidId) -> Result<Sid> {
        self.get(ResourceKind::Sid, id.as_str()).await
    }

    async fn create_sid(&self, request: &SidCreate) -> Result<Sid> {
        self.create(ResourceKind::Sid, request).await
    }

    async fn update_sid(&self, id: &SidId, request: &SidUpdate) -> Result<Sid> {
        self.update(ResourceKind::Sid, id.as_str(), request).await
    }

    async fn delete_sid(&self, id: &SidId) -> Result<()> {
        self.delete(ResourceKind::Sid, id.as_str()).await
    }

    async fn list_sips(&self, filter: &SipFilter) -> Result<Vec<Sip>> {
        self.list(ResourceKind::Sip, &filter.query()).await
    }

    async fn get_sip(&self, id: &SipId) -> Result<Sip> {
        self.get(ResourceKind::Sip, id.as_str()).await
    }

    async fn create_sip(&self, request: &SipCreate) -> Result<Sip> {
        self.create(ResourceKind::Sip, request).await
    }

    async fn update_sip(&self, id: &SipId, request: &SipUpdate) -> Result<Sip> {
        self.update(ResourceKind::Sip, id.as_str(), request).await
    }

    async fn delete_sip(&self, id: &SipId) -> Result<()> {
        self.delete(ResourceKind::Sip, id.as_str()).await
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(format!(
            "{raw}: must start with http:// or https://"
        )));
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn join(endpoint: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(endpoint.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn wrap_body<B: Serialize>(kind: ResourceKind, body: &B) -> Result<Value> {
    let inner = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    let mut map = serde_json::Map::new();
    map.insert(kind.member().to_string(), inner);
    Ok(Value::Object(map))
}

async fn unwrap_body<T: DeserializeOwned>(response: Response, key: &str) -> Result<T> {
    let mut body: Value = response.json().await?;
    let inner = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ClientError::Decode(format!("response has no '{key}' field")))?;
    serde_json::from_value(inner).map_err(|e| ClientError::Decode(format!("{key}: {e}")))
}

/// Best-effort human message for an error response.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    extract_error_message(status, &text)
}

fn extract_error_message(status: StatusCode, text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<Value>(text) {
        if let Some(message) = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), str::to_string)
}

async fn issue_token(http: &reqwest::Client, endpoint: &Url, auth: &PasswordAuth) -> Result<String> {
    let url = join(endpoint, &["auth", "tokens"])?;
    debug!(user = %auth.username, project = ?auth.project_name, "requesting token");

    let response = http.post(url).json(&auth.token_request()).send().await?;
    if !response.status().is_success() {
        return Err(ClientError::Auth(error_message(response).await));
    }

    response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ClientError::Auth(format!("response carried no {SUBJECT_TOKEN_HEADER} header")))
}
