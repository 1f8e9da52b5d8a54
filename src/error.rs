//! Error types for Wickinion

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No pending interaction")]
    NoPendingInteraction,

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Shorthand used throughout the rules engine
    pub fn illegal(msg: impl Into<String>) -> Self {
        GameError::IllegalAction(msg.into())
    }

    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        GameError::InvalidSelection(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
