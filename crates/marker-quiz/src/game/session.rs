use crate::api::types::{FinalScore, RoundOutcome};

/// Progress through the element sequence. Lives until restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_element_index: usize,
    pub total_score: u32,
    pub rounds_played: u32,
    pub finished: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of the current round.
    pub fn record(&mut self, outcome: RoundOutcome) {
        self.rounds_played += 1;
        if outcome.is_won() {
            self.total_score += 1;
        }
    }

    /// Step to the next element. Returns its index, or None once the sequence is exhausted.
    pub fn advance(&mut self, total_elements: usize) -> Option<usize> {
        self.current_element_index += 1;
        if self.current_element_index < total_elements {
            Some(self.current_element_index)
        } else {
            self.finished = true;
            None
        }
    }

    pub fn final_score(&self, total_elements: usize) -> FinalScore {
        FinalScore::new(self.total_score, total_elements as u32)
    }
}
