/*
[INPUT]:  Session client, wallet signers and browser collaborators
[OUTPUT]: Deduplicated wallet-authentication handshakes and gate checks
[POS]:    Auth layer - handles the wallet sign-in lifecycle
[UPDATE]: When the handshake flow or signature methods change
*/

pub mod coordinator;
pub mod evm_wallet;
pub mod gates;
pub mod token;
pub mod wallet;

pub use coordinator::{AuthenticationCoordinator, CoordinatorConfig, CHALLENGE_MARKER};
pub use evm_wallet::EvmWalletSigner;
pub use gates::{check_balance, check_foreign_network, check_profile};
pub use token::{decode_claims, TokenClaims, TokenStore};
pub use wallet::{MockWalletSigner, WalletSigner};
