/*
[INPUT]:  Issued access tokens (JWT strings)
[OUTPUT]: Token retrieval and locally decoded claims
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When adding claims or changing storage strategy
*/

use std::sync::{Arc, RwLock};

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::Utc;
use serde::Deserialize;

use crate::http::{Result, SessionError};

/// Claims the session service embeds in its access tokens.
///
/// The token is self-describing: identity checks never need a round trip.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Check the `exp` claim against the current time. Absent `exp` means
    /// the token does not expire.
    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => Utc::now().timestamp() >= exp,
            None => false,
        }
    }
}

/// Thread-safe store for the current access token.
///
/// Shared by all clones of a `SessionClient`.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// Create a new empty token store
    pub fn new() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Store a new access token
    pub fn set(&self, token: String) {
        let mut guard = self.token.write().unwrap();
        *guard = Some(token);
    }

    /// Get the current token if available
    pub fn get(&self) -> Option<String> {
        let guard = self.token.read().unwrap();
        guard.clone()
    }

    /// Clear the stored token
    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap();
        *guard = None;
    }
}

/// Decode the claims of an access token without verifying its signature.
///
/// Accepts both padded and unpadded base64url payload segments.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let payload_b64 = token
        .trim()
        .split('.')
        .nth(1)
        .ok_or_else(|| SessionError::InvalidResponse("access token is not a valid JWT".to_string()))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| URL_SAFE.decode(payload_b64))
        .map_err(|e| {
            SessionError::InvalidResponse(format!("Invalid access token payload base64: {e}"))
        })?;

    Ok(serde_json::from_slice(&payload_bytes)?)
}
