//! Single-player game lifecycle.
//!
//! One secret, one player, a bounded attempt budget, and a terminal
//! WON/LOST outcome. The interesting rule is the idempotent freeze: a
//! guess submitted to a finished game is a no-op that returns the
//! unchanged snapshot, never an error.

mod error;
mod game;
mod service;

pub use error::GameError;
pub use game::{Game, GameSnapshot};
pub use service::{GameService, GuessOutcome};
