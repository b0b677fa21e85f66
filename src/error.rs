//! Error types for the game process.
//!
//! Every variant is fatal: a tick either succeeds completely or the process
//! restores the terminal and exits.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Failed to load asset '{}': {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },

    #[error("Input polling failed: {0}")]
    InputPoll(String),

    #[error("Invalid config '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
