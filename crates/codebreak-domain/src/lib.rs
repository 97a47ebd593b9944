//! Shared domain types for Codebreak.
//!
//! Everything the other crates agree on lives here:
//!
//! - [`PlayerId`], [`RoomId`], [`GameId`], [`AccountId`] — id newtypes
//! - [`Code`], [`Guess`], [`Feedback`] — the secret, a submission, a score
//! - [`GameStatus`] — per-player / per-game lifecycle status
//! - [`GameConfig`] — the digit policy (length, range, duplicates, attempts)
//! - [`evaluate`] — the duplicate-aware scoring function
//! - [`generate_token`] — opaque credential minting
//! - [`ErrorKind`] — the rejection taxonomy an HTTP layer maps from

mod code;
mod config;
mod error;
mod evaluate;
mod ids;
mod token;

pub use code::{Code, DigitsError, Feedback, GameStatus, Guess, HistoryEntry};
pub use config::{EntropyConfig, GameConfig, LeaderboardConfig};
pub use error::ErrorKind;
pub use evaluate::evaluate;
pub use ids::{AccountId, GameId, PlayerId, RoomId};
pub use token::generate_token;
