/*
[INPUT]:  Caller-held user state, wallet signer and browser collaborators
[OUTPUT]: A single process-wide challenge/signature handshake outcome
[POS]:    Auth layer - orchestrates the wallet sign-in lifecycle
[UPDATE]: When the handshake flow or deduplication rules change
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use crate::auth::token::decode_claims;
use crate::auth::wallet::WalletSigner;
use crate::browser::{AnalyticsSink, ConsentPrompt, Navigator, NoopAnalytics, back_with_fallback};
use crate::http::{SessionClient, SessionError};
use crate::types::{AuthenticationRequest, CurrentUser};

/// Marker prefixing the challenge text inside the service's 401 message
pub const CHALLENGE_MARKER: &str = "Challenge =";

const SIGN_IN_TITLE: &str = "You need to sign in!";
const SIGN_IN_BODY: &str = "In order to provide the best experience possible, we are going to \
     ask you to sign a randomly generated message proving that you own the current account. \
     This will enable us to provide instant updates to the app after any action.";
const SIGN_REQUEST_NOTICE: &str = "Please sign the message in your wallet...";

/// Coordinator tunables
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long the sign-and-resubmit step may take before the attempt is
    /// abandoned. Closing the wallet window can leave the signing request
    /// unresolved forever, so the handshake cannot wait on it unbounded.
    pub signing_timeout: Duration,
    /// How long to wait for a back-navigation to take effect before forcing
    /// the fallback destination
    pub navigation_grace: Duration,
    /// Destination of the forced fallback navigation
    pub fallback_location: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            signing_timeout: Duration::from_secs(30),
            navigation_grace: Duration::from_millis(500),
            fallback_location: "/".to_string(),
        }
    }
}

type AttemptFuture = Shared<BoxFuture<'static, bool>>;

/// Owns the process-wide authentication lifecycle against the session
/// service.
///
/// At most one challenge/signature handshake is in flight at any time:
/// concurrent callers await the pending attempt's outcome instead of
/// starting a second one, so the user is never shown two consent dialogs
/// or two signature requests at once.
pub struct AuthenticationCoordinator {
    client: SessionClient,
    prompt: Arc<dyn ConsentPrompt>,
    navigator: Arc<dyn Navigator>,
    analytics: Arc<dyn AnalyticsSink>,
    config: CoordinatorConfig,
    pending: Mutex<Option<AttemptFuture>>,
}

impl AuthenticationCoordinator {
    /// Create a coordinator with default configuration and no analytics
    pub fn new(
        client: SessionClient,
        prompt: Arc<dyn ConsentPrompt>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::new_with_config(
            client,
            prompt,
            navigator,
            Arc::new(NoopAnalytics),
            CoordinatorConfig::default(),
        )
    }

    /// Create a coordinator with explicit analytics and configuration
    pub fn new_with_config(
        client: SessionClient,
        prompt: Arc<dyn ConsentPrompt>,
        navigator: Arc<dyn Navigator>,
        analytics: Arc<dyn AnalyticsSink>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            client,
            prompt,
            navigator,
            analytics,
            config,
            pending: Mutex::new(None),
        }
    }

    /// Get the session client this coordinator authenticates
    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Ensure the session is authenticated as the user's address, running
    /// the challenge/signature handshake only when necessary.
    ///
    /// Every failure class resolves to `false`; the coordinator never
    /// returns an error. While an attempt is pending, every caller receives
    /// that attempt's eventual outcome regardless of the address it asked
    /// for, and only the caller that initiated the attempt has its `user`
    /// state updated.
    pub async fn authenticate_user(
        &self,
        user: Option<&mut CurrentUser>,
        redirect_on_fail: bool,
        signer: Arc<dyn WalletSigner>,
    ) -> bool {
        if let Some(pending) = self.pending_attempt() {
            debug!("authentication already in flight, awaiting its outcome");
            return pending.await;
        }

        let Some(user) = user else {
            return false;
        };
        let Some(address) = user.address.clone() else {
            return false;
        };

        if user.authenticated {
            return true;
        }

        // Install the attempt before the first await so concurrent callers
        // observe it. Re-check under the lock: another caller may have
        // installed one since the gate above.
        let (attempt, initiated) = {
            let mut guard = self.pending.lock().unwrap();
            match guard.as_ref() {
                Some(existing) => (existing.clone(), false),
                None => {
                    let attempt = Attempt {
                        client: self.client.clone(),
                        prompt: Arc::clone(&self.prompt),
                        navigator: Arc::clone(&self.navigator),
                        analytics: Arc::clone(&self.analytics),
                        config: self.config.clone(),
                        address,
                        redirect_on_fail,
                        signer,
                    }
                    .run()
                    .boxed()
                    .shared();
                    *guard = Some(attempt.clone());
                    (attempt, true)
                }
            }
        };

        let outcome = attempt.await;

        if initiated {
            let mut guard = self.pending.lock().unwrap();
            *guard = None;
            drop(guard);
            user.authenticated = outcome;
        }

        outcome
    }

    fn pending_attempt(&self) -> Option<AttemptFuture> {
        self.pending.lock().unwrap().as_ref().cloned()
    }
}

/// One handshake attempt. Owns everything it needs so the future can be
/// shared between concurrent callers.
struct Attempt {
    client: SessionClient,
    prompt: Arc<dyn ConsentPrompt>,
    navigator: Arc<dyn Navigator>,
    analytics: Arc<dyn AnalyticsSink>,
    config: CoordinatorConfig,
    address: String,
    redirect_on_fail: bool,
    signer: Arc<dyn WalletSigner>,
}

impl Attempt {
    async fn run(self) -> bool {
        // Fast path: a stored token for this address only needs the live
        // session re-established, never a second signature.
        if let Some(token) = self.client.access_token() {
            match decode_claims(&token) {
                Ok(claims) if claims.user_id == self.address && !claims.is_expired() => {
                    return match self.client.re_authenticate().await {
                        Ok(_) => {
                            debug!(address = %self.address, "session re-established from stored token");
                            true
                        }
                        Err(error) => {
                            warn!(%error, "re-authentication with stored token failed");
                            false
                        }
                    };
                }
                Ok(claims) => {
                    if claims.user_id != self.address {
                        debug!(
                            stored = %claims.user_id,
                            requested = %self.address,
                            "stored token belongs to a different address, logging out"
                        );
                    } else {
                        debug!(address = %self.address, "stored token expired, logging out");
                    }
                    if let Err(error) = self.client.logout().await {
                        warn!(%error, "logout of stale session failed");
                    }
                }
                Err(error) => {
                    warn!(%error, "stored token could not be decoded, logging out");
                    if let Err(error) = self.client.logout().await {
                        warn!(%error, "logout of undecodable session failed");
                    }
                }
            }
        }

        let challenge = match self
            .client
            .authenticate(&AuthenticationRequest::web3(&self.address))
            .await
        {
            Ok(_) => {
                self.analytics.identify(&self.address);
                info!(address = %self.address, "session authenticated without challenge");
                return true;
            }
            Err(SessionError::Api { code: 401, message }) => {
                match extract_challenge(&message) {
                    Some(challenge) => challenge.to_string(),
                    None => {
                        debug!(rejection = %message, "unauthorized without a challenge");
                        return false;
                    }
                }
            }
            Err(error) => {
                warn!(%error, "authentication request failed");
                return false;
            }
        };

        if !self.prompt.confirm(SIGN_IN_TITLE, SIGN_IN_BODY).await {
            debug!(address = %self.address, "user declined the signature request");
            if self.redirect_on_fail {
                self.recover_navigation().await;
            }
            return false;
        }

        self.prompt.notify(SIGN_REQUEST_NOTICE);

        let sign_and_submit = async {
            let signature = self.signer.sign_message(&challenge).await?;
            self.client
                .authenticate(&AuthenticationRequest::web3_signed(&self.address, &signature))
                .await?;
            Ok::<(), SessionError>(())
        };

        match tokio::time::timeout(self.config.signing_timeout, sign_and_submit).await {
            Ok(Ok(())) => {
                self.analytics.identify(&self.address);
                info!(address = %self.address, "challenge signed and session authenticated");
                true
            }
            Ok(Err(error)) => {
                warn!(%error, "challenge signing or submission failed");
                self.recover_navigation().await;
                false
            }
            // Timer fired first: the signing future is dropped, so a late
            // signature has no observable effect.
            Err(_) => {
                warn!(
                    timeout_secs = self.config.signing_timeout.as_secs(),
                    "challenge signing timed out"
                );
                self.recover_navigation().await;
                false
            }
        }
    }

    async fn recover_navigation(&self) {
        back_with_fallback(
            self.navigator.as_ref(),
            Some(&self.config.fallback_location),
            self.config.navigation_grace,
        )
        .await;
    }
}

/// Extract the challenge text from an unauthorized message, stripping the
/// marker and surrounding whitespace.
fn extract_challenge(message: &str) -> Option<&str> {
    message.strip_prefix(CHALLENGE_MARKER).map(str::trim)
}
