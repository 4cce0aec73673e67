/*
[INPUT]:  User state, network flag and wallet balance
[OUTPUT]: Pass/fail gate decisions with user-facing warnings
[POS]:    Auth layer - pre-action checks run before protected flows
[UPDATE]: When gate conditions or warning copy change
*/

use std::time::Duration;

use tracing::debug;

use crate::browser::{ConsentPrompt, Navigator, back_with_fallback};
use crate::http::{Result, SessionError};
use crate::types::CurrentUser;

/// Where the profile registration flow lives
pub const PROFILE_LOCATION: &str = "/profile";

const REGISTER_TITLE: &str = "Please Register!";
const REGISTER_BODY: &str = "It appears that you have not yet created your profile. In order to \
     gain the trust of givers, we strongly recommend creating your profile!";
const WRONG_NETWORK_TITLE: &str = "Wrong network";
const WRONG_NETWORK_BODY: &str = "This action requires the foreign network. Switch your wallet's \
     network, or go back to the previous page.";
const LOW_BALANCE_NOTICE: &str = "Insufficient wallet balance. You need more funds in your wallet \
     before you can interact with the app.";

/// Ask users without a profile to register one, navigating to the profile
/// page when they accept. Users who already have a name pass silently.
pub async fn check_profile(
    user: Option<&CurrentUser>,
    prompt: &dyn ConsentPrompt,
    navigator: &dyn Navigator,
) {
    let Some(user) = user else {
        return;
    };
    if user.name.is_some() {
        return;
    }

    if prompt.confirm(REGISTER_TITLE, REGISTER_BODY).await {
        navigator.navigate(PROFILE_LOCATION);
    }
}

/// Require the foreign network for the current action.
///
/// When the wallet is on another network, warn the user, offer to take them
/// back (with the usual fallback when going back is a no-op) and fail.
pub async fn check_foreign_network(
    is_foreign_network: bool,
    prompt: &dyn ConsentPrompt,
    navigator: &dyn Navigator,
    grace: Duration,
) -> Result<()> {
    if is_foreign_network {
        return Ok(());
    }

    debug!("action requires the foreign network");
    if prompt.confirm(WRONG_NETWORK_TITLE, WRONG_NETWORK_BODY).await {
        back_with_fallback(navigator, None, grace).await;
    }
    Err(SessionError::WrongNetwork)
}

/// Require a minimum wallet balance (in wei) before an interaction.
pub fn check_balance(
    balance_wei: u128,
    minimum_wei: u128,
    prompt: &dyn ConsentPrompt,
) -> Result<()> {
    if balance_wei >= minimum_wei {
        return Ok(());
    }

    prompt.notify(LOW_BALANCE_NOTICE);
    Err(SessionError::InsufficientBalance { minimum_wei })
}
