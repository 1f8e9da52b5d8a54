//! Core game state and turn structure

pub mod actions;
pub mod controller;
pub mod debounce;
mod effects;
pub mod fixed_script_controller;
pub mod game_loop;
pub mod heuristic_controller;
pub mod interaction;
pub mod interactive_controller;
pub mod logger;
pub mod phase;
pub mod random_controller;
mod resolve;
pub mod scoring;
pub mod state;
pub mod supply;

pub use actions::TurnAction;
pub use controller::{minimal_selection, GameStateView, PlayerController};
pub use debounce::ActionDebouncer;
pub use fixed_script_controller::FixedScriptController;
pub use game_loop::{GameLoop, GameResult, StepOutcome, VerbosityLevel};
pub use heuristic_controller::HeuristicController;
pub use interaction::{
    CardFilter, Continuation, Interaction, InteractionKind, InteractionQueue, Notice, Selection, ToggleOutcome,
};
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use phase::Phase;
pub use random_controller::RandomController;
pub use scoring::score;
pub use state::{BoardChoice, GainDestination, GameConfig, GameState, MAX_PLAYERS, MIN_PLAYERS};
pub use supply::{GameEndReason, Supply};
