/*
[INPUT]:  Browsing history and current location from the host
[OUTPUT]: Back-navigation requests with a forced fallback
[POS]:    Browser layer - navigation abstraction and recovery
[UPDATE]: When the recovery behavior or fallback destination changes
*/

use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

/// Destination used when no explicit fallback is supplied
pub const DEFAULT_FALLBACK_LOCATION: &str = "/";

/// Browsing-context seam the host application implements.
///
/// All three operations are synchronous requests against the browsing
/// context; whether the location actually changes is observed afterwards.
pub trait Navigator: Send + Sync {
    /// Current location (href)
    fn current_location(&self) -> String;

    /// Request one step back in the browsing history. May be a no-op when
    /// there is no prior entry.
    fn back(&self);

    /// Force-navigate to the given location
    fn navigate(&self, location: &str);
}

/// Go back one history step, then force-navigate to a fallback if the
/// location did not change within the grace period.
///
/// Going back may be a no-op (no prior history entry); without the fallback
/// the user would be stranded on a broken in-progress flow.
pub async fn back_with_fallback(
    navigator: &dyn Navigator,
    fallback: Option<&str>,
    grace: Duration,
) {
    let destination = fallback.unwrap_or(DEFAULT_FALLBACK_LOCATION);
    let previous = navigator.current_location();

    navigator.back();

    tokio::time::sleep(grace).await;
    if navigator.current_location() == previous {
        debug!(destination, "back navigation had no effect, forcing fallback");
        navigator.navigate(destination);
    }
}

/// Navigation side effect recorded by [`RecordingNavigator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Back,
    Navigate(String),
}

/// Test navigator that records every request and simulates a browsing
/// context with or without a prior history entry.
#[derive(Debug)]
pub struct RecordingNavigator {
    location: Mutex<String>,
    back_location: Option<String>,
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    /// Navigator with no prior history entry: back() does not move
    pub fn stuck_at(location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_string()),
            back_location: None,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Navigator whose back() lands on the given prior location
    pub fn with_history(location: &str, back_location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_string()),
            back_location: Some(back_location.to_string()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Recorded navigation requests, in order
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> String {
        self.location.lock().unwrap().clone()
    }

    fn back(&self) {
        self.events.lock().unwrap().push(NavigationEvent::Back);
        if let Some(back_location) = &self.back_location {
            let mut guard = self.location.lock().unwrap();
            *guard = back_location.clone();
        }
    }

    fn navigate(&self, location: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NavigationEvent::Navigate(location.to_string()));
        let mut guard = self.location.lock().unwrap();
        *guard = location.to_string();
    }
}
