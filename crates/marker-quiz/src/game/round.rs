use std::collections::BTreeSet;

use crate::api::types::{RoundOutcome, Slot};

/// Lifecycle of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    Active,
    Ended,
}

/// Mutable state of the round being played.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    pub seconds_remaining: u32,
    pub visible_markers: BTreeSet<Slot>,
    pub phase: RoundPhase,
    pub required_marker_count: usize,
    pub outcome: Option<RoundOutcome>,
}

impl RoundState {
    /// Fresh active round.
    pub fn begin(seconds: u32, required_marker_count: usize) -> Self {
        Self {
            seconds_remaining: seconds,
            visible_markers: BTreeSet::new(),
            phase: RoundPhase::Active,
            required_marker_count,
            outcome: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }

    pub fn visible_count(&self) -> usize {
        self.visible_markers.len()
    }

    /// Whether enough distinct markers are visible to win.
    pub fn is_complete(&self) -> bool {
        self.visible_markers.len() >= self.required_marker_count
    }

    /// One countdown step. Returns true when time has run out.
    pub fn tick(&mut self) -> bool {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining == 0
    }

    /// Mark the round finished. Returns false if it was not active.
    pub fn finish(&mut self, outcome: RoundOutcome) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = RoundPhase::Ended;
        self.outcome = Some(outcome);
        true
    }
}
