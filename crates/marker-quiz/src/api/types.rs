use serde::{Deserialize, Serialize};

use crate::scene::builder::SceneDecl;

/// Positional index of an atom part within the current element.
/// This is what the frontend forwards from `targetFound` / `targetLost`.
pub type Slot = u32;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// All required markers were visible at once.
    Won,
    /// The countdown reached zero.
    TimedOut,
}

impl RoundOutcome {
    pub fn from_won(won: bool) -> Self {
        if won {
            RoundOutcome::Won
        } else {
            RoundOutcome::TimedOut
        }
    }

    pub fn is_won(self) -> bool {
        self == RoundOutcome::Won
    }
}

/// Colour band of the countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerBand {
    Normal,
    Warning,
    Critical,
}

impl TimerBand {
    /// Classify remaining seconds against the warning/critical thresholds (inclusive).
    pub fn classify(seconds: u32, warning: u32, critical: u32) -> Self {
        if seconds <= critical {
            TimerBand::Critical
        } else if seconds <= warning {
            TimerBand::Warning
        } else {
            TimerBand::Normal
        }
    }
}

/// Grade shown on the final score screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Perfect,
    Excellent,
    WellDone,
    KeepPracticing,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 100 => Grade::Perfect,
            p if p >= 80 => Grade::Excellent,
            p if p >= 60 => Grade::WellDone,
            _ => Grade::KeepPracticing,
        }
    }
}

/// Session summary emitted once the last round has been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub grade: Grade,
}

impl FinalScore {
    pub fn new(score: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((score as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            score,
            total,
            percentage,
            grade: Grade::from_percentage(percentage),
        }
    }
}

/// Event emitted by the round controller for the frontend to render.
/// The controller never touches the DOM; the web bridge drains these each frame.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    /// A new round began for the named element.
    RoundStarted {
        element: String,
        formula: String,
        required: usize,
        round: usize,
        total_rounds: usize,
    },
    /// The marker-anchored scene for the current element should be mounted.
    SceneLoaded(SceneDecl),
    /// The previously mounted scene should be removed.
    SceneUnloaded,
    /// Countdown display changed.
    TimeChanged { seconds: u32, band: TimerBand },
    /// Number of simultaneously visible markers changed.
    VisibleChanged { visible: usize, required: usize },
    /// Session score changed (or was reset).
    ScoreChanged { score: u32, total: u32 },
    /// The current round ended.
    RoundEnded { outcome: RoundOutcome },
    /// All elements have been played.
    SessionFinished(FinalScore),
    /// The restart button should be offered.
    RestartOffered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_band_thresholds_are_inclusive() {
        assert_eq!(TimerBand::classify(30, 20, 10), TimerBand::Normal);
        assert_eq!(TimerBand::classify(21, 20, 10), TimerBand::Normal);
        assert_eq!(TimerBand::classify(20, 20, 10), TimerBand::Warning);
        assert_eq!(TimerBand::classify(11, 20, 10), TimerBand::Warning);
        assert_eq!(TimerBand::classify(10, 20, 10), TimerBand::Critical);
        assert_eq!(TimerBand::classify(0, 20, 10), TimerBand::Critical);
    }

    #[test]
    fn final_score_rounds_percentage() {
        let s = FinalScore::new(2, 3);
        assert_eq!(s.percentage, 67);
        assert_eq!(s.grade, Grade::WellDone);

        let s = FinalScore::new(1, 3);
        assert_eq!(s.percentage, 33);
        assert_eq!(s.grade, Grade::KeepPracticing);
    }

    #[test]
    fn final_score_grades() {
        assert_eq!(FinalScore::new(3, 3).grade, Grade::Perfect);
        assert_eq!(FinalScore::new(4, 5).grade, Grade::Excellent);
        assert_eq!(FinalScore::new(0, 0).percentage, 0);
    }
}
