//! Code, guess, feedback and history types.
//!
//! A [`Code`] is the hidden digit sequence a game or room is scored
//! against. Its constructor is the only way to build one, and it enforces
//! the full digit policy, so a `Code` in hand is always valid. A [`Guess`]
//! deliberately enforces nothing: submissions are validated by the
//! service that accepts them, against its configuration.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::GameConfig;

/// A digit sequence that violates the configured policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigitsError {
    /// Wrong number of digits.
    #[error("exactly {expected} digits are required, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// A digit outside the configured range.
    #[error("each digit must be between {min} and {max}, got {digit}")]
    OutOfRange { min: u8, max: u8, digit: u8 },

    /// Repeated digits under a no-duplicates policy.
    #[error("duplicate digits are not allowed")]
    DuplicatesNotAllowed,
}

/// The secret digit sequence.
///
/// Immutable once created, owned exclusively by the game or room that
/// generated it, and never serialized into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    digits: Vec<u8>,
}

impl Code {
    /// Validates `digits` against the full policy (length, range and,
    /// unlike guess validation, the duplicate rule) and wraps them.
    pub fn new(digits: Vec<u8>, policy: &GameConfig) -> Result<Self, DigitsError> {
        policy.check_digits(&digits)?;
        if !policy.allow_duplicates {
            let mut seen = [false; 256];
            for &d in &digits {
                if seen[d as usize] {
                    return Err(DigitsError::DuplicatesNotAllowed);
                }
                seen[d as usize] = true;
            }
        }
        Ok(Self { digits })
    }

    /// The digits, in order.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

/// A digit sequence submitted by a participant.
///
/// Not validated by this type; services check length and range before
/// scoring (see [`GameConfig::check_digits`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guess(pub Vec<u8>);

impl Guess {
    pub fn digits(&self) -> &[u8] {
        &self.0
    }
}

/// The score for one guess against one secret.
///
/// `exact_positions` counts indices where guess and secret agree.
/// `total_matches` counts digit-value overlap via multiset minimum,
/// independent of position; it always includes the exact positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub exact_positions: usize,
    pub total_matches: usize,
}

/// Lifecycle status of a game or of one player inside a room.
///
/// `InProgress` is the only non-terminal state. Wire names are
/// `IN_PROGRESS`, `WON`, `LOST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    /// Returns `true` once no further guesses will be accepted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Display rank for in-room leaderboards: winners first, then players
    /// still guessing, then losers.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Won => 0,
            Self::InProgress => 1,
            Self::Lost => 2,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Won => write!(f, "WON"),
            Self::Lost => write!(f, "LOST"),
        }
    }
}

/// One accepted guess: what was submitted, how it scored, and when.
/// Append-only, ordered by submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub guess: Guess,
    pub feedback: Feedback,
    pub at: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(allow_duplicates: bool) -> GameConfig {
        GameConfig {
            allow_duplicates,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_code_new_accepts_valid_digits() {
        let code = Code::new(vec![0, 1, 3, 2], &policy(true)).unwrap();
        assert_eq!(code.digits(), &[0, 1, 3, 2]);
        assert_eq!(code.len(), 4);
    }

    #[test]
    fn test_code_new_rejects_wrong_length() {
        let err = Code::new(vec![0, 1, 2], &policy(true)).unwrap_err();
        assert_eq!(
            err,
            DigitsError::WrongLength {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_code_new_rejects_out_of_range() {
        let err = Code::new(vec![0, 1, 2, 9], &policy(true)).unwrap_err();
        assert!(matches!(err, DigitsError::OutOfRange { digit: 9, .. }));
    }

    #[test]
    fn test_code_new_rejects_duplicates_when_disallowed() {
        let err = Code::new(vec![1, 1, 2, 3], &policy(false)).unwrap_err();
        assert_eq!(err, DigitsError::DuplicatesNotAllowed);
    }

    #[test]
    fn test_code_new_allows_duplicates_by_default() {
        assert!(Code::new(vec![1, 1, 2, 2], &policy(true)).is_ok());
    }

    #[test]
    fn test_game_status_ranks_winners_first() {
        assert!(GameStatus::Won.rank() < GameStatus::InProgress.rank());
        assert!(GameStatus::InProgress.rank() < GameStatus::Lost.rank());
    }

    #[test]
    fn test_game_status_terminal() {
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
    }

    #[test]
    fn test_game_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&GameStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&GameStatus::Won).unwrap(), "\"WON\"");
    }
}
