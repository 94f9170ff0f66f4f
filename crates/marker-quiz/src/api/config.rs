use serde::{Deserialize, Serialize};

use crate::api::error::{QuizError, QuizResult};
use crate::assets::catalog::ElementCatalog;
use crate::assets::layout::LayoutTable;

/// Placeholder replaced by the atom name in `model_path_template`.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Tunables for a quiz session. Every field has a default so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Countdown length of each round in whole seconds (default: 30).
    pub round_seconds: u32,
    /// Length of one countdown tick in seconds (default: 1.0).
    pub tick_seconds: f32,
    /// Delay between a round ending and the next round / final score (default: 2.0).
    pub advance_delay: f32,
    /// Delay between the final score and the restart button (default: 2.0).
    pub restart_delay: f32,
    /// Compiled marker set handed to the tracker.
    pub image_target_src: String,
    /// Model asset path; `{name}` is replaced by the atom name.
    pub model_path_template: String,
    /// Countdown turns orange at or below this many seconds.
    pub warning_seconds: u32,
    /// Countdown turns red at or below this many seconds.
    pub critical_seconds: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            tick_seconds: 1.0,
            advance_delay: 2.0,
            restart_delay: 2.0,
            image_target_src: "/ar/elements.mind".to_string(),
            model_path_template: "Assets/Models/{name}/{name}.json".to_string(),
            warning_seconds: 20,
            critical_seconds: 10,
        }
    }
}

impl QuizConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> QuizResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QuizResult<()> {
        if !(self.tick_seconds > 0.0) {
            return Err(QuizError::InvalidTickInterval(self.tick_seconds));
        }
        if !self.model_path_template.contains(NAME_PLACEHOLDER) {
            return Err(QuizError::MissingTemplatePlaceholder(
                self.model_path_template.clone(),
            ));
        }
        Ok(())
    }

    /// Expand the model path template for one atom.
    pub fn model_path(&self, atom: &str) -> String {
        self.model_path_template.replace(NAME_PLACEHOLDER, atom)
    }
}

/// Everything a frontend may hand to the runner at init.
/// Each section is optional and falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSetup {
    pub config: QuizConfig,
    pub catalog: ElementCatalog,
    pub layout: LayoutTable,
}

impl QuizSetup {
    pub fn from_json(json: &str) -> QuizResult<Self> {
        let setup: Self = serde_json::from_str(json)?;
        setup.config.validate()?;
        setup.catalog.validate()?;
        Ok(setup)
    }
}
