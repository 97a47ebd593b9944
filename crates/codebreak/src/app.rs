//! Application wiring: one [`App`] owns every service.

use std::sync::Arc;

use codebreak_account::{AccountService, LeaderboardRow};
use codebreak_domain::{GameConfig, GameId, GameStatus, LeaderboardConfig};
use codebreak_game::{GameService, GameSnapshot};
use codebreak_generator::{ConfiguredGenerator, SecretGenerator};
use codebreak_leaderboard::Leaderboard;
use codebreak_room::RoomService;
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Everything tunable, in one injected value. Defaults: four digits in
/// `0..=7`, duplicates allowed, ten attempts, a ten-wide leaderboard,
/// local entropy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub game: GameConfig,
    pub leaderboard: LeaderboardConfig,
}

/// The assembled backend.
///
/// Construction wires the generator chosen by the config into both game
/// services and shares one leaderboard between the account service and
/// direct readers. Cross-service flows (a session-holding player's win
/// reaching the leaderboard) live here; everything else is reached
/// through the service accessors.
pub struct App<G: SecretGenerator = ConfiguredGenerator> {
    games: GameService<G>,
    rooms: RoomService<G>,
    accounts: AccountService,
    leaderboard: Arc<Leaderboard>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self::with_generator(&config, ConfiguredGenerator::from_config(&config.game))
    }
}

impl<G: SecretGenerator + Clone> App<G> {
    /// Wires the services around a caller-supplied generator. Tests use
    /// this with a fixed-secret generator.
    pub fn with_generator(config: &AppConfig, generator: G) -> Self {
        let leaderboard = Arc::new(Leaderboard::new(&config.leaderboard));
        Self {
            games: GameService::new(config.game.clone(), generator.clone()),
            rooms: RoomService::new(config.game.clone(), generator),
            accounts: AccountService::new(Arc::clone(&leaderboard)),
            leaderboard,
        }
    }
}

impl<G: SecretGenerator> App<G> {
    pub fn games(&self) -> &GameService<G> {
        &self.games
    }

    pub fn rooms(&self) -> &RoomService<G> {
        &self.rooms
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Single-player guess with optional win crediting.
    ///
    /// Anonymous play passes `None` and never touches accounts. With a
    /// session token, the guess that wins the game credits the session's
    /// account exactly once; replaying a guess against the finished game
    /// is a frozen no-op and credits nothing. The token is only resolved
    /// on a win, so an invalid session surfaces after the game state has
    /// already advanced.
    pub async fn submit_guess(
        &self,
        game_id: GameId,
        digits: Vec<u8>,
        session_token: Option<&str>,
    ) -> Result<GameSnapshot, AppError> {
        let outcome = self.games.submit_guess(game_id, digits).await?;

        if let Some(token) = session_token {
            if outcome.transition == Some(GameStatus::Won) {
                let account_id = self.accounts.account_from_session(token).await?;
                self.accounts.record_win(account_id).await;
            }
        }

        Ok(outcome.game)
    }

    /// The public leaderboard, scores joined with usernames.
    pub async fn top_players(&self, requested: usize) -> Vec<LeaderboardRow> {
        self.accounts.top_players(requested).await
    }
}
