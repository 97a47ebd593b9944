//! The single-player game aggregate.

use std::time::SystemTime;

use codebreak_domain::{Code, Feedback, GameId, GameStatus, Guess, HistoryEntry};
use serde::{Deserialize, Serialize};

/// One single-player game: a secret, an attempt budget, and the history
/// of accepted guesses. Created on game start, mutated only by guess
/// submission, frozen once the status leaves `InProgress`.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    secret: Code,
    attempts_left: u32,
    status: GameStatus,
    history: Vec<HistoryEntry>,
    started_at: SystemTime,
}

impl Game {
    pub(crate) fn new(id: GameId, secret: Code, attempts: u32) -> Self {
        Self {
            id,
            secret,
            attempts_left: attempts,
            status: GameStatus::InProgress,
            history: Vec::new(),
            started_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// The secret stays inside the crate; snapshots never carry it.
    pub(crate) fn secret(&self) -> &Code {
        &self.secret
    }

    /// Appends an accepted guess and advances the state machine.
    ///
    /// A winning guess still consumes an attempt. No-op once terminal,
    /// which is what freezes finished games.
    pub(crate) fn record_entry(&mut self, guess: Guess, feedback: Feedback, win: bool) {
        if self.status.is_terminal() {
            return;
        }
        self.history.push(HistoryEntry {
            guess,
            feedback,
            at: SystemTime::now(),
        });
        // Saturating: a zero attempt budget degrades to an immediate
        // loss instead of underflowing.
        self.attempts_left = self.attempts_left.saturating_sub(1);
        if win {
            self.status = GameStatus::Won;
        } else if self.attempts_left == 0 {
            self.status = GameStatus::Lost;
        }
    }

    /// A client-safe view of the game. Produced inside the game's
    /// exclusive section; the secret never leaves.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.id,
            status: self.status,
            attempts_left: self.attempts_left,
            can_guess: !self.status.is_terminal(),
            attempts_used: self.history.len(),
            history: self.history.clone(),
        }
    }
}

/// What a polling client sees of a single-player game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub status: GameStatus,
    pub attempts_left: u32,
    pub can_guess: bool,
    pub attempts_used: usize,
    pub history: Vec<HistoryEntry>,
}
