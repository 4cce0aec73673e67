/*
[INPUT]:  Error sources (HTTP, service errors, serialization, signing, gates)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the session adapter
#[derive(Error, Debug)]
pub enum SessionError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Session service returned a structured error response
    #[error("session service error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wallet signing failed or was rejected by the user
    #[error("Wallet signing failed: {0}")]
    Signing(String),

    /// Caller is connected to the wrong network for this action
    #[error("connected to the wrong network")]
    WrongNetwork,

    /// Wallet balance is below the required minimum
    #[error("wallet balance below the required minimum of {minimum_wei} wei")]
    InsufficientBalance { minimum_wei: u128 },
}

impl SessionError {
    /// Check if the error is the service's unauthorized rejection
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Api { code: 401, .. })
    }

    /// Check if the error came out of the wallet rather than the service
    pub fn is_wallet_error(&self) -> bool {
        matches!(self, SessionError::Signing(_))
    }
}

/// Result type alias for session adapter operations
pub type Result<T> = std::result::Result<T, SessionError>;
