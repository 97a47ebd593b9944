//! Error types for single-player games.

use codebreak_domain::{DigitsError, ErrorKind, GameId};

/// Errors a single-player operation can reject with.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The game does not exist.
    #[error("game {0} not found")]
    NotFound(GameId),

    /// The submitted digits violate the configured policy.
    #[error("invalid guess: {0}")]
    InvalidGuess(#[from] DigitsError),
}

impl GameError {
    /// Classification for the HTTP layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidGuess(_) => ErrorKind::InvalidInput,
        }
    }
}
