use thiserror::Error;

/// Errors raised while loading configuration, catalogs or layout tables.
/// Gameplay operations never fail; only setup data can be rejected.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("element catalog is empty")]
    EmptyCatalog,

    #[error("element `{0}` has no atom parts")]
    EmptyElement(String),

    #[error("element `{0}` is defined more than once")]
    DuplicateElement(String),

    #[error("element `{0}` uses target index {1}, which cannot be tracked")]
    TargetIndexOutOfRange(String, u32),

    #[error("model path template `{0}` has no {{name}} placeholder")]
    MissingTemplatePlaceholder(String),

    #[error("tick interval must be positive, got {0}")]
    InvalidTickInterval(f32),
}

pub type QuizResult<T> = Result<T, QuizError>;
