//! Unified error type for the Codebreak backend.

use codebreak_account::AccountError;
use codebreak_domain::ErrorKind;
use codebreak_game::GameError;
use codebreak_room::RoomError;

/// Top-level error covering every sub-crate.
///
/// Callers of the `codebreak` meta-crate match on this one type; the
/// `#[from]` variants let `?` lift sub-crate errors into it without
/// explicit conversions.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A single-player game error (unknown game, invalid digits).
    #[error(transparent)]
    Game(#[from] GameError),

    /// A room error (unknown room/player, token mismatch, bad state).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An account error (registration, credentials, sessions).
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl AppError {
    /// Classification for the HTTP layer, delegated to the wrapped
    /// error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Game(e) => e.kind(),
            Self::Room(e) => e.kind(),
            Self::Account(e) => e.kind(),
        }
    }
}
