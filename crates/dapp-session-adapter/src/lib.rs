/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public dapp session adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod browser;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthenticationCoordinator,
    CoordinatorConfig,
    EvmWalletSigner,
    MockWalletSigner,
    TokenClaims,
    TokenStore,
    WalletSigner,
};

// Re-export commonly used types from browser
pub use browser::{
    AnalyticsSink,
    ConsentPrompt,
    NavigationEvent,
    Navigator,
    NoopAnalytics,
    RecordingAnalytics,
    RecordingNavigator,
    ScriptedPrompt,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Result,
    SessionClient,
    SessionError,
};

// Re-export all types
pub use types::*;
