//! # Codebreak
//!
//! Backend for a code-breaking guessing game: a secret sequence of
//! digits, guesses scored by exact-position matches and total-value
//! matches. Two modes:
//!
//! - **single-player** — one secret, one player, a bounded attempt
//!   budget, a terminal WON/LOST outcome;
//! - **multiplayer rooms** — several players race against the same
//!   secret; the first win ends the race for everyone.
//!
//! Accounts are optional. A logged-in player's wins land on their
//! record and the global top-K leaderboard.
//!
//! This meta-crate wires the sub-crates together behind [`App`] and a
//! single [`AppError`]. Everything is in-memory and single-process;
//! clients poll for state.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use codebreak::prelude::*;
//!
//! # async fn run() {
//! let app = App::new(AppConfig::default());
//! let game = app.games().start_game().await;
//! let after = app
//!     .submit_guess(game.game_id, vec![0, 1, 2, 3], None)
//!     .await
//!     .unwrap();
//! println!("{:?}", after.history.last());
//! # }
//! ```

mod app;
mod error;

pub use app::{App, AppConfig};
pub use error::AppError;

/// One-import surface for typical callers.
pub mod prelude {
    pub use codebreak_account::{AccountProfile, LeaderboardRow};
    pub use codebreak_domain::{
        AccountId, EntropyConfig, Feedback, GameConfig, GameId, GameStatus, LeaderboardConfig,
        PlayerId, RoomId,
    };
    pub use codebreak_game::{GameSnapshot, GuessOutcome};
    pub use codebreak_room::{PlayerJoined, RoomCreated, RoomSnapshot, RoomState};

    pub use crate::{App, AppConfig, AppError};
}

/// Installs the process-wide tracing subscriber, honoring `RUST_LOG`
/// and defaulting to `info`. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
