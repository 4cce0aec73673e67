/*
[INPUT]:  Wallet addresses of authenticated users
[OUTPUT]: Identity events forwarded to the host's analytics
[POS]:    Browser layer - identity-tracking abstraction
[UPDATE]: When identity-tracking events change
*/

use std::sync::Mutex;

/// Identity-tracking seam. Calls are fire-and-forget; implementations must
/// swallow their own failures.
pub trait AnalyticsSink: Send + Sync {
    /// Associate the current session with a wallet address
    fn identify(&self, address: &str);
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn identify(&self, _address: &str) {}
}

/// Test sink recording every identified address
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    identified: Mutex<Vec<String>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses identified so far, in order
    pub fn identified(&self) -> Vec<String> {
        self.identified.lock().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn identify(&self, address: &str) {
        self.identified.lock().unwrap().push(address.to_string());
    }
}
