/*
[INPUT]:  Wallet credentials and session service endpoints
[OUTPUT]: Authenticated session for the current wallet address
[POS]:    Examples - authentication flow demonstration
[UPDATE]: When auth flow changes
*/

use std::sync::Arc;

use dapp_session_adapter::*;

/// Example: Wallet authentication flow
///
/// This example demonstrates the complete handshake:
/// 1. Create the session client
/// 2. Wire the browser collaborators (here: scripted test doubles)
/// 3. Create the coordinator
/// 4. Ask it to authenticate the current user
#[tokio::main]
async fn main() {
    println!("=== Wallet Authentication Example ===\n");

    // Step 1: Create session client
    let client = match SessionClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ Session client created");

    // Step 2: Browser collaborators. A real host wires its own dialog,
    // history and analytics implementations here.
    let prompt = Arc::new(ScriptedPrompt::accepting());
    let navigator = Arc::new(RecordingNavigator::stuck_at("/"));

    // Step 3: Create the coordinator
    let coordinator = AuthenticationCoordinator::new(client, prompt, navigator);
    println!("✓ Coordinator created");

    // Step 4: Authenticate. A well-known test private key; a real host
    // would instead implement WalletSigner against the user's wallet.
    let signer = match EvmWalletSigner::new(
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    ) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("Failed to create signer: {}", e);
            return;
        }
    };
    let mut user = CurrentUser::with_address(signer.address());

    let authenticated = coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    println!("\nAuthenticated: {}", authenticated);
    println!(
        "Stored access token: {}",
        coordinator
            .client()
            .access_token()
            .unwrap_or_else(|| "<none>".to_string())
    );
}
