/*
[INPUT]:  Challenge message to sign
[OUTPUT]: Signature string proving address ownership
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding new wallet types or changing signature format
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::http::{Result, SessionError};

/// Trait for wallet signing operations
///
/// Implement this trait for your wallet type (browser extension, local key,
/// hardware wallet). The trait is async to support wallets that prompt the
/// user before signing.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Get the wallet address
    fn address(&self) -> &str;

    /// Sign a message and return the signature.
    ///
    /// Fails when the user rejects the request or the wallet errors.
    async fn sign_message(&self, message: &str) -> Result<String>;
}

/// Mock wallet signer for testing
#[derive(Debug, Clone)]
pub struct MockWalletSigner {
    address: String,
    signature: String,
    delay: Option<Duration>,
    rejects: bool,
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockWalletSigner {
    /// Create a new mock signer with a predetermined signature
    pub fn new(address: &str, signature: &str) -> Self {
        Self {
            address: address.to_string(),
            signature: signature.to_string(),
            delay: None,
            rejects: false,
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages this signer was asked to sign, in order
    pub fn signed_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Delay each signature by the given duration (to exercise timeouts)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every signing request fail as if the user rejected it
    pub fn rejecting(address: &str) -> Self {
        Self {
            address: address.to_string(),
            signature: String::new(),
            delay: None,
            rejects: true,
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl WalletSigner for MockWalletSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        self.messages.lock().unwrap().push(message.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.rejects {
            return Err(SessionError::Signing(
                "user rejected the signature request".to_string(),
            ));
        }
        Ok(self.signature.clone())
    }
}
