//! The rejection taxonomy.
//!
//! Every service error maps onto one of these kinds so an HTTP layer can
//! pick a status code without matching on concrete variants. The split
//! between `NotFound` and `Unauthorized` is deliberate: a wrong token on
//! an existing player is not the same signal as an unknown player.

use serde::{Deserialize, Serialize};

/// Broad classification of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: wrong digit count, out-of-range digit, blank
    /// username, short password. Never retried.
    InvalidInput,

    /// Unknown room, player, game or account.
    NotFound,

    /// Token mismatch for a host, player or session credential.
    Unauthorized,

    /// The operation is not permitted in the aggregate's current
    /// lifecycle state (join after start, kick outside the lobby).
    InvalidState,

    /// Something went wrong inside the service itself, for example the
    /// password hasher refusing its parameters. Not the caller's fault.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::InvalidState => write!(f, "invalid_state"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
