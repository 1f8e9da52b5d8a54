//! Wickinion - a deck-building card game engine
//!
//! The rules engine (`game`) is a synchronous state machine driven by
//! player decisions. `net` wraps it in a host-authoritative session for
//! networked play, and `tournament` runs bot games in parallel.

pub mod core;
pub mod error;
pub mod game;
pub mod net;
pub mod tournament;
pub mod zones;

pub use error::{GameError, Result};
