/*
[INPUT]:  User interaction and browsing context from the host application
[OUTPUT]: Consent decisions, navigation side effects, identity events
[POS]:    Browser layer - collaborator seams the host must implement
[UPDATE]: When collaborator contracts change
*/

pub mod analytics;
pub mod navigation;
pub mod prompt;

pub use analytics::{AnalyticsSink, NoopAnalytics, RecordingAnalytics};
pub use navigation::{back_with_fallback, NavigationEvent, Navigator, RecordingNavigator};
pub use prompt::{ConsentPrompt, ScriptedPrompt};
