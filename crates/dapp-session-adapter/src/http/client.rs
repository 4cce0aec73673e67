/*
[INPUT]:  HTTP configuration (base URL, timeouts) and stored access token
[OUTPUT]: Configured reqwest client ready for session service calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::auth::TokenStore;
use crate::http::{Result, SessionError};
use crate::types::ServiceErrorBody;

/// Base URL for the session service
const SESSION_BASE_URL: &str = "https://feathers.giveth.io";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the session service.
///
/// Clones share the same token store, so a token stored through one handle
/// is visible to every other handle.
#[derive(Debug, Clone)]
pub struct SessionClient {
    http_client: Client,
    base_url: Url,
    tokens: TokenStore,
}

impl SessionClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, SESSION_BASE_URL)
    }

    /// Create a new client against an explicit base URL (used by tests)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            tokens: TokenStore::new(),
        })
    }

    /// Get the token store shared by all clones of this client
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Get the stored access token, if any. Local read, no network.
    pub fn access_token(&self) -> Option<String> {
        self.tokens.get()
    }

    /// Build request builder for a session service endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode the JSON response body.
    ///
    /// Non-success statuses are parsed as the service's structured error body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &body))
        }
    }
}

pub(crate) fn parse_error_body(status: StatusCode, body: &str) -> SessionError {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(error) => SessionError::Api {
            code: error.code,
            message: error.message,
        },
        Err(_) => SessionError::Api {
            code: status.as_u16() as i32,
            message: body.trim().to_string(),
        },
    }
}
