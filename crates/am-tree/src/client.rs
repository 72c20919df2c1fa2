//! REST client for the access management service.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use crate::entity::{
    redact, Entity, AUTH_TREE_TYPE, NODE_SECRET_FIELDS, REVISION_FIELD, SCRIPT_TYPE,
};
use crate::error::{ExportError, ExportResult};
use crate::node_type::canonical_type;
use crate::source::EntitySource;

/// Default name of the header carrying the session token.
pub const DEFAULT_SESSION_HEADER: &str = "iplanetdirectorypro";

/// API version requested on authentication.
const AUTH_API_VERSION: &str = "resource=2.0,protocol=1.0";

/// Path of the authentication tree collections, below the base URL.
const TREES_PATH: &[&str] = &[
    "json",
    "realms",
    "root",
    "realm-config",
    "authentication",
    "authenticationtrees",
];

/// Connection settings for [`AmClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `https://am.example.com/am`.
    pub base_url: String,
    /// Administrator username.
    pub username: String,
    /// Administrator password.
    pub password: String,
    /// Header the session token is sent in.
    pub session_header: String,
    /// Skip TLS certificate validation.
    pub accept_invalid_certs: bool,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a config with the default session header, certificate
    /// validation on and no timeout.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            session_header: DEFAULT_SESSION_HEADER.to_string(),
            accept_invalid_certs: false,
            timeout: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session_header", &self.session_header)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Authentication response.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "tokenId")]
    token_id: Option<String>,
}

/// Client holding a single session against the service.
pub struct AmClient {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    token: Option<String>,
}

impl AmClient {
    /// Creates an unauthenticated client.
    ///
    /// ## Errors
    ///
    /// Returns `ExportError::Url` for an unusable base URL and
    /// `ExportError::Http` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> ExportResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            config,
            token: None,
        })
    }

    /// Uses an existing session token instead of authenticating.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether a session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Service root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Opens a session with the configured credentials.
    ///
    /// ## Errors
    ///
    /// Returns `ExportError::Session` if the request fails, is rejected, or
    /// the response carries no token.
    #[instrument(skip(self), fields(username = %self.config.username))]
    pub async fn authenticate(&mut self) -> ExportResult<()> {
        let url = self.endpoint(&["json", "realms", "root", "authenticate"])?;
        debug!(%url, "authenticating");

        let response = self
            .http
            .post(url.clone())
            .header("accept-api-version", AUTH_API_VERSION)
            .header("x-openam-username", self.config.username.as_str())
            .header("x-openam-password", self.config.password.as_str())
            .send()
            .await
            .map_err(|e| ExportError::Session(format!("authentication request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExportError::Session(format!("failed to read authentication response: {e}")))?;
        if !status.is_success() {
            return Err(ExportError::Session(format!(
                "authentication at {url} failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let auth: AuthResponse = serde_json::from_str(&body)
            .map_err(|e| ExportError::Session(format!("unreadable authentication response: {e}")))?;
        match auth.token_id.filter(|token| !token.is_empty()) {
            Some(token) => {
                self.token = Some(token);
                debug!("session established");
                Ok(())
            }
            None => Err(ExportError::Session(
                "authentication response has no tokenId".to_string(),
            )),
        }
    }

    /// Builds a URL below the base URL; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ExportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Builds a URL below the authentication tree collections.
    fn trees_endpoint(&self, segments: &[&str]) -> ExportResult<Url> {
        let path: Vec<&str> = TREES_PATH.iter().chain(segments).copied().collect();
        self.endpoint(&path)
    }

    /// GETs a JSON object with the session token.
    async fn get_object(&self, url: Url) -> ExportResult<Map<String, Value>> {
        let token = self.token.as_deref().ok_or_else(|| {
            ExportError::Session("no session established, authenticate first".to_string())
        })?;

        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .header(self.config.session_header.as_str(), token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExportError::Transport {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ExportError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl fmt::Debug for AmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[async_trait]
impl EntitySource for AmClient {
    #[instrument(skip(self))]
    async fn fetch_tree(&self, name: &str) -> ExportResult<Entity> {
        let url = self.trees_endpoint(&["trees", name])?;
        let mut data = self.get_object(url).await?;
        redact(&mut data, &[REVISION_FIELD]);
        Entity::with_data_id(AUTH_TREE_TYPE, data)
    }

    #[instrument(skip(self))]
    async fn fetch_node(&self, node_type: &str, id: &str) -> ExportResult<Entity> {
        let url = self.trees_endpoint(&["nodes", node_type, id])?;
        let mut data = self.get_object(url).await?;
        redact(&mut data, &[REVISION_FIELD]);
        redact(&mut data, NODE_SECRET_FIELDS);
        Entity::with_data_id(canonical_type(node_type), data)
    }

    #[instrument(skip(self))]
    async fn fetch_script(&self, id: &str) -> ExportResult<Entity> {
        let url = self.endpoint(&["json", "scripts", id])?;
        let data = self.get_object(url).await?;
        Ok(Entity::new(SCRIPT_TYPE, id, data))
    }
}
