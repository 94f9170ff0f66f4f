pub mod api;
pub mod core;
pub mod assets;
pub mod scene;
pub mod game;
pub mod input;
pub mod bridge;
pub mod view;

// Re-export key types at crate root for convenience
pub use api::config::{QuizConfig, QuizSetup};
pub use api::error::{QuizError, QuizResult};
pub use api::types::{FinalScore, Grade, QuizEvent, RoundOutcome, Slot, TimerBand};
pub use assets::catalog::{AtomPart, ElementCatalog, ElementDefinition};
pub use assets::layout::{LayoutTable, ModelLayout};
pub use core::scheduler::{Generation, Scheduler, Transition};
pub use core::time::TickClock;
pub use game::controller::RoundController;
pub use game::round::{RoundPhase, RoundState};
pub use game::session::SessionState;
pub use input::queue::{TrackingEvent, TrackingQueue};
pub use scene::builder::{build_scene, AnchorDecl, AssetDecl, CameraDecl, ModelDecl, SceneDecl};
pub use view::traits::QuizView;
