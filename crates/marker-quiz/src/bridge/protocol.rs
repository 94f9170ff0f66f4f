//! DOM protocol between the quiz and its page.
//! Element ids must stay in sync with the HUD markup created by the web bridge
//! and with any stylesheet targeting them.
//!
//! Text is Spanish to match the printed marker cards.

use crate::api::types::{FinalScore, Grade, RoundOutcome, TimerBand};

// ---- Element ids ----

pub const GAME_UI_ID: &str = "game-ui";
pub const TIMER_ID: &str = "timer";
pub const TIME_DISPLAY_ID: &str = "time-display";
pub const ELEMENT_DISPLAY_ID: &str = "element-display";
pub const PROGRESS_ID: &str = "progress";
pub const FOUND_COUNT_ID: &str = "found-count";
pub const REQUIRED_COUNT_ID: &str = "required-count";
pub const SCORE_DISPLAY_ID: &str = "score-display";
pub const TOTAL_COUNT_ID: &str = "total-count";
pub const GAME_STATUS_ID: &str = "game-status";
pub const RESTART_BUTTON_ID: &str = "restart-btn";
/// Container the AR scene is appended to; `document.body` if absent.
pub const SCENE_PARENT_ID: &str = "body";

// ---- Labels ----

pub const TIME_LABEL: &str = "Tiempo";
pub const ELEMENT_LABEL: &str = "Elemento";
pub const PROGRESS_LABEL: &str = "Visibles";
pub const SCORE_LABEL: &str = "Score";
pub const HINT_TEXT: &str = "Muestra todos los átomos a la vez";
pub const RESTART_LABEL: &str = "Jugar de nuevo";

// ---- Colours ----

pub const COLOR_NORMAL: &str = "white";
pub const COLOR_WARNING: &str = "#ffaa44";
pub const COLOR_CRITICAL: &str = "#ff4444";
pub const COLOR_SUCCESS: &str = "#44ff44";
pub const COLOR_GOLD: &str = "#FFD700";

/// A coloured line of status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub text: &'static str,
    pub color: &'static str,
}

pub fn timer_color(band: TimerBand) -> &'static str {
    match band {
        TimerBand::Normal => COLOR_NORMAL,
        TimerBand::Warning => COLOR_WARNING,
        TimerBand::Critical => COLOR_CRITICAL,
    }
}

pub fn outcome_status(outcome: RoundOutcome) -> StatusLine {
    match outcome {
        RoundOutcome::Won => StatusLine {
            text: "¡COMPLETADO! 🎉",
            color: COLOR_SUCCESS,
        },
        RoundOutcome::TimedOut => StatusLine {
            text: "TIEMPO AGOTADO ⏰",
            color: COLOR_CRITICAL,
        },
    }
}

pub fn grade_status(grade: Grade) -> StatusLine {
    match grade {
        Grade::Perfect => StatusLine {
            text: "¡PERFECTO! 🏆",
            color: COLOR_GOLD,
        },
        Grade::Excellent => StatusLine {
            text: "¡EXCELENTE! 🌟",
            color: COLOR_SUCCESS,
        },
        Grade::WellDone => StatusLine {
            text: "¡BIEN HECHO! 👍",
            color: COLOR_WARNING,
        },
        Grade::KeepPracticing => StatusLine {
            text: "¡SIGUE PRACTICANDO! 💪",
            color: COLOR_CRITICAL,
        },
    }
}

/// Element name with its formula, e.g. "Agua (H₂O)".
pub fn element_label(name: &str, formula: &str) -> String {
    if formula.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, formula)
    }
}

/// Lines of the final score panel: grade message, score, percentage.
pub fn final_score_lines(summary: &FinalScore) -> [String; 3] {
    [
        grade_status(summary.grade).text.to_string(),
        format!("SCORE FINAL: {}/{}", summary.score, summary.total),
        format!("({}%)", summary.percentage),
    ]
}
