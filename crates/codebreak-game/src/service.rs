//! The single-player game service: starts games, accepts guesses.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use codebreak_domain::{GameConfig, GameId, GameStatus, Guess, evaluate};
use codebreak_generator::SecretGenerator;
use tokio::sync::{Mutex, RwLock};

use crate::{Game, GameError, GameSnapshot};

/// Counter for allocating unique game IDs.
static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

/// Result of a guess submission.
///
/// `transition` is the terminal status this call produced, if any. A
/// frozen no-op on an already finished game carries `None`, which is
/// how callers crediting wins avoid counting a replayed guess twice.
#[derive(Debug, Clone)]
pub struct GuessOutcome {
    pub game: GameSnapshot,
    pub transition: Option<GameStatus>,
}

/// Owns every live single-player game.
///
/// Each game sits behind its own mutex; the registry map is only locked
/// long enough to find or insert a handle, so concurrent guesses against
/// different games never contend.
pub struct GameService<G: SecretGenerator> {
    games: RwLock<HashMap<GameId, Arc<Mutex<Game>>>>,
    generator: G,
    config: GameConfig,
}

impl<G: SecretGenerator> GameService<G> {
    pub fn new(config: GameConfig, generator: G) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            generator,
            config,
        }
    }

    /// Starts a new game with a freshly generated secret and the
    /// configured attempt budget.
    pub async fn start_game(&self) -> GameSnapshot {
        let secret = self.generator.generate().await;
        let id = GameId(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed));
        let game = Game::new(id, secret, self.config.attempts);
        let snapshot = game.snapshot();
        self.games
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(game)));
        tracing::info!(game_id = %id, "single-player game started");
        snapshot
    }

    /// Submits a guess.
    ///
    /// Terminal games are frozen: the call is a no-op returning the
    /// unchanged snapshot. On an in-progress game the digits are
    /// validated against the policy, scored, recorded, and the status
    /// advanced (a winning guess still consumes an attempt).
    pub async fn submit_guess(
        &self,
        id: GameId,
        digits: Vec<u8>,
    ) -> Result<GuessOutcome, GameError> {
        let handle = self.lookup(id).await?;
        let mut game = handle.lock().await;

        if game.status().is_terminal() {
            return Ok(GuessOutcome {
                game: game.snapshot(),
                transition: None,
            });
        }

        self.config.check_digits(&digits)?;

        let guess = Guess(digits);
        let feedback = evaluate(game.secret(), &guess);
        let win = feedback.exact_positions == self.config.code_length;
        game.record_entry(guess, feedback, win);

        let transition = match game.status() {
            GameStatus::InProgress => None,
            terminal => Some(terminal),
        };
        if transition == Some(GameStatus::Won) {
            tracing::info!(game_id = %id, "single-player game won");
        }
        Ok(GuessOutcome {
            game: game.snapshot(),
            transition,
        })
    }

    /// Read-only snapshot of a game.
    pub async fn get(&self, id: GameId) -> Result<GameSnapshot, GameError> {
        let handle = self.lookup(id).await?;
        let game = handle.lock().await;
        Ok(game.snapshot())
    }

    async fn lookup(&self, id: GameId) -> Result<Arc<Mutex<Game>>, GameError> {
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameError::NotFound(id))
    }
}

// =========================================================================
// Tests
// =========================================================================
