/*
[INPUT]:  Caller-held user state and session service wire formats
[OUTPUT]: Typed requests and responses for the session service
[POS]:    Types layer - shared data model
[UPDATE]: When the service wire format or user state changes
*/

use serde::{Deserialize, Serialize};

/// Authentication strategy for wallet-signature login
pub const WEB3_STRATEGY: &str = "web3";
/// Authentication strategy for resuming a session from a stored token
pub const JWT_STRATEGY: &str = "jwt";

/// Current user state, owned by the caller.
///
/// The coordinator flips `authenticated` as a side effect of a handshake it
/// initiated; it never creates or destroys this state.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser {
    pub address: Option<String>,
    pub authenticated: bool,
    pub name: Option<String>,
}

impl CurrentUser {
    /// Create an unauthenticated user for the given wallet address
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            authenticated: false,
            name: None,
        }
    }
}

/// Body for POST /authentication
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationRequest {
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl AuthenticationRequest {
    /// First-round web3 request: no signature yet, expects a challenge back
    pub fn web3(address: &str) -> Self {
        Self {
            strategy: WEB3_STRATEGY.to_string(),
            address: Some(address.to_string()),
            signature: None,
            access_token: None,
        }
    }

    /// Second-round web3 request carrying the challenge signature
    pub fn web3_signed(address: &str, signature: &str) -> Self {
        Self {
            strategy: WEB3_STRATEGY.to_string(),
            address: Some(address.to_string()),
            signature: Some(signature.to_string()),
            access_token: None,
        }
    }

    /// Resume request using a previously issued access token
    pub fn jwt(access_token: &str) -> Self {
        Self {
            strategy: JWT_STRATEGY.to_string(),
            address: None,
            signature: None,
            access_token: Some(access_token.to_string()),
        }
    }
}

/// Successful response from POST /authentication
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedSession {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Structured error body the session service returns on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "className")]
    pub class_name: Option<String>,
}
