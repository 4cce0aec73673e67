/*
[INPUT]:  Authentication requests and stored access token
[OUTPUT]: Authenticated sessions and logout results
[POS]:    HTTP layer - session service authentication endpoints
[UPDATE]: When the authentication endpoint or strategies change
*/

// ### Authentication Endpoints

use reqwest::Method;
use tracing::debug;

use crate::http::client::parse_error_body;
use crate::http::{Result, SessionClient, SessionError};
use crate::types::{AuthenticatedSession, AuthenticationRequest};

/// Endpoint handling authentication, re-authentication and logout
pub const AUTHENTICATION_ENDPOINT: &str = "/authentication";

impl SessionClient {
    /// Submit an authentication request.
    ///
    /// POST /authentication
    ///
    /// On success the issued access token is stored so later calls (and
    /// clones of this client) can resume the session without a handshake.
    pub async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticatedSession> {
        let builder = self.request(Method::POST, AUTHENTICATION_ENDPOINT)?;
        let builder = builder.json(request);
        let session: AuthenticatedSession = self.send_json(builder).await?;

        self.tokens().set(session.access_token.clone());
        debug!(strategy = %request.strategy, "session authenticated");
        Ok(session)
    }

    /// Re-establish the live session from the stored access token.
    ///
    /// Fails locally (no network call) when no token is stored.
    pub async fn re_authenticate(&self) -> Result<AuthenticatedSession> {
        let token = self.access_token().ok_or_else(|| {
            SessionError::Config("no stored access token to re-authenticate with".to_string())
        })?;

        self.authenticate(&AuthenticationRequest::jwt(&token)).await
    }

    /// End the remote session.
    ///
    /// DELETE /authentication
    ///
    /// The stored token is cleared regardless of the remote outcome, so a
    /// failed logout never leaves a stale token behind.
    pub async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::DELETE, AUTHENTICATION_ENDPOINT)?;
        let response = builder.send().await;
        self.tokens().clear();

        let response = response?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &body))
        }
    }
}
