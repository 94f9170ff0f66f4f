//! Frontend contract.
//!
//! The controller never renders; a view consumes the `QuizEvent` stream in
//! emission order. The browser DOM view lives in `marker-quiz-web`; tests
//! record events into a `Vec`.

use crate::api::types::QuizEvent;

/// Anything that can present quiz events to the player.
pub trait QuizView {
    fn apply(&mut self, event: &QuizEvent);
}

impl QuizView for Vec<QuizEvent> {
    fn apply(&mut self, event: &QuizEvent) {
        self.push(event.clone());
    }
}
