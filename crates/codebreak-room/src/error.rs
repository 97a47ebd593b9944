//! Error types for the room layer.

use codebreak_domain::{DigitsError, ErrorKind, PlayerId, RoomId};

/// Errors that can occur during room operations.
///
/// Token mismatches are deliberately distinct from not-found: callers
/// can tell "wrong credential" from "doesn't exist".
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The player is not a member of this room.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// The presented token does not match the room's current host token.
    #[error("invalid host token")]
    InvalidHostToken,

    /// The presented token does not match the player's possession token.
    #[error("invalid player token")]
    InvalidPlayerToken,

    /// The room is in a state that doesn't allow this operation.
    /// For example, joining a room that's already running.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// The submitted digits violate the configured policy.
    #[error("invalid guess: {0}")]
    InvalidGuess(#[from] DigitsError),
}

impl RoomError {
    /// Classification for the HTTP layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoomNotFound(_) | Self::PlayerNotFound(_) => ErrorKind::NotFound,
            Self::InvalidHostToken | Self::InvalidPlayerToken => ErrorKind::Unauthorized,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidGuess(_) => ErrorKind::InvalidInput,
        }
    }
}
