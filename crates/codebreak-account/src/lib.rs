//! Accounts, sessions and win records.
//!
//! Accounts are optional: rooms and single-player games work without
//! one. Logging in buys a session token, and wins scored while a valid
//! session is presented land on the account's record and the global
//! leaderboard.
//!
//! Passwords are stored as PHC strings produced by Argon2; no raw hash
//! or salt handling happens here.

mod error;
mod password;
mod service;

pub use error::AccountError;
pub use service::{AccountProfile, AccountService, LeaderboardRow};
