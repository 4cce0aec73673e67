/*
[INPUT]:  Prompt titles, bodies and notice text
[OUTPUT]: User consent decisions and fire-and-forget notices
[POS]:    Browser layer - user confirmation abstraction
[UPDATE]: When the prompt contract changes
*/

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

/// Blocking confirmation dialog and toast seam the host implements.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    /// Present a confirm/cancel dialog and suspend until the user answers.
    /// Returns true when the user accepts.
    async fn confirm(&self, title: &str, body: &str) -> bool;

    /// Show an informational toast. Fire-and-forget.
    fn notify(&self, message: &str);
}

/// Test prompt replaying scripted answers and recording every interaction.
#[derive(Debug)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
    confirmations: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    /// Prompt that accepts every confirmation
    pub fn accepting() -> Self {
        Self::with_default(true)
    }

    /// Prompt that declines every confirmation
    pub fn declining() -> Self {
        Self::with_default(false)
    }

    /// Prompt replaying the given answers in order, declining once exhausted
    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        let prompt = Self::with_default(false);
        prompt.answers.lock().unwrap().extend(answers);
        prompt
    }

    fn with_default(default_answer: bool) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            default_answer,
            confirmations: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Titles of every confirmation shown, in order
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }

    /// Text of every notice shown, in order
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConsentPrompt for ScriptedPrompt {
    async fn confirm(&self, title: &str, _body: &str) -> bool {
        self.confirmations.lock().unwrap().push(title.to_string());
        let scripted = self.answers.lock().unwrap().pop_front();
        scripted.unwrap_or(self.default_answer)
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}
