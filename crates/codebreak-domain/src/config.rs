//! Configuration for the digit policy and the leaderboard.
//!
//! All tunables are injected values; nothing in the core reads the
//! environment. Defaults: four digits in `0..=7`, duplicates allowed,
//! ten attempts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::code::DigitsError;

/// The digit policy plus the per-player attempt budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of digits in a secret (and therefore in a valid guess).
    pub code_length: usize,

    /// Smallest allowed digit value, inclusive.
    pub min_digit: u8,

    /// Largest allowed digit value, inclusive.
    pub max_digit: u8,

    /// Guesses each player gets before losing.
    pub attempts: u32,

    /// Whether a secret may contain the same digit twice.
    pub allow_duplicates: bool,

    /// Optional external entropy source. `None` means local generation.
    pub entropy: Option<EntropyConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            code_length: 4,
            min_digit: 0,
            max_digit: 7,
            attempts: 10,
            allow_duplicates: true,
            entropy: None,
        }
    }
}

impl GameConfig {
    /// Validates a submission's length and range against this policy.
    ///
    /// Deliberately does NOT check the duplicate rule: a guess may repeat
    /// digits even when the secret cannot.
    pub fn check_digits(&self, digits: &[u8]) -> Result<(), DigitsError> {
        if digits.len() != self.code_length {
            return Err(DigitsError::WrongLength {
                expected: self.code_length,
                actual: digits.len(),
            });
        }
        for &d in digits {
            if d < self.min_digit || d > self.max_digit {
                return Err(DigitsError::OutOfRange {
                    min: self.min_digit,
                    max: self.max_digit,
                    digit: d,
                });
            }
        }
        Ok(())
    }
}

/// Where to fetch remote entropy, and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyConfig {
    /// Base URL of the plain-text integer service.
    pub base_url: String,

    /// Hard bound on the whole request. On expiry the generator falls
    /// back locally instead of blocking the caller.
    pub timeout: Duration,
}

/// Leaderboard sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Width of the candidate structure (the K in top-K).
    pub top_k: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}
