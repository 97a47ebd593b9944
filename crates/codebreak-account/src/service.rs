//! The account service: registration, login, sessions, win records,
//! and the username join for the public leaderboard.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use codebreak_domain::{AccountId, generate_token};
use codebreak_leaderboard::Leaderboard;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::AccountError;
use crate::password::{hash_password, verify_password};

static NEXT_ACCOUNT_ID: AtomicU64 = AtomicU64::new(1);

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
struct Account {
    id: AccountId,
    username: String,
    password_phc: String,
    wins: u64,
    losses: u64,
    created_at: SystemTime,
    last_login_at: Option<SystemTime>,
}

/// Public view of an account. Never carries the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub account_id: AccountId,
    pub username: String,
    pub wins: u64,
    pub losses: u64,
    pub created_at: SystemTime,
    pub last_login_at: Option<SystemTime>,
}

/// One row of the public leaderboard, scores joined with usernames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub account_id: AccountId,
    pub username: String,
    pub score: u64,
}

/// Accounts and the username index live under one lock so registration
/// can check-then-insert atomically.
#[derive(Default)]
struct Registry {
    by_id: HashMap<AccountId, Account>,
    id_by_username: HashMap<String, AccountId>,
}

/// Owns every account and session. Guarded independently of rooms; the
/// leaderboard keeps its own lock and is only touched after this
/// service's guards are released.
pub struct AccountService {
    accounts: RwLock<Registry>,
    sessions: RwLock<HashMap<String, AccountId>>,
    leaderboard: Arc<Leaderboard>,
}

impl AccountService {
    pub fn new(leaderboard: Arc<Leaderboard>) -> Self {
        Self {
            accounts: RwLock::new(Registry::default()),
            sessions: RwLock::new(HashMap::new()),
            leaderboard,
        }
    }

    /// Registers a new account. The username must be non-blank and
    /// unused; the password must meet the minimum length. The password
    /// is hashed before the registry lock is taken.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccountId, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::UsernameRequired);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort(MIN_PASSWORD_LEN));
        }

        let password_phc = hash_password(password)?;

        let mut registry = self.accounts.write().await;
        if registry.id_by_username.contains_key(username) {
            return Err(AccountError::UsernameTaken);
        }

        let id = AccountId(NEXT_ACCOUNT_ID.fetch_add(1, Ordering::Relaxed));
        registry.id_by_username.insert(username.to_string(), id);
        registry.by_id.insert(
            id,
            Account {
                id,
                username: username.to_string(),
                password_phc,
                wins: 0,
                losses: 0,
                created_at: SystemTime::now(),
                last_login_at: None,
            },
        );

        tracing::info!(account_id = %id, username, "account created");
        Ok(id)
    }

    /// Verifies the credential and issues a fresh session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AccountError> {
        let account_id = {
            let mut registry = self.accounts.write().await;
            let id = *registry
                .id_by_username
                .get(username.trim())
                .ok_or(AccountError::AccountNotFound)?;
            // The index and the map are maintained together.
            let account = registry
                .by_id
                .get_mut(&id)
                .ok_or(AccountError::AccountNotFound)?;
            if !verify_password(password, &account.password_phc) {
                return Err(AccountError::InvalidCredentials);
            }
            account.last_login_at = Some(SystemTime::now());
            account.id
        };

        let token = generate_token();
        self.sessions
            .write()
            .await
            .insert(token.clone(), account_id);
        tracing::info!(%account_id, "session issued");
        Ok(token)
    }

    /// Drops a session. Unknown tokens are ignored; logging out twice is
    /// not an error.
    pub async fn logout(&self, token: &str) {
        if self.sessions.write().await.remove(token).is_some() {
            tracing::info!("session revoked");
        }
    }

    /// Resolves a session token to its account.
    pub async fn account_from_session(&self, token: &str) -> Result<AccountId, AccountError> {
        self.sessions
            .read()
            .await
            .get(token)
            .copied()
            .ok_or(AccountError::InvalidSession)
    }

    /// Credits a win: bumps the account's counter and the global
    /// leaderboard score. A vanished account is skipped silently.
    pub async fn record_win(&self, account_id: AccountId) {
        {
            let mut registry = self.accounts.write().await;
            if let Some(account) = registry.by_id.get_mut(&account_id) {
                account.wins += 1;
            }
        }
        let score = self.leaderboard.increment(account_id).await;
        tracing::info!(%account_id, score, "win recorded");
    }

    /// Records a loss on the account only; losses don't reach the
    /// leaderboard.
    pub async fn record_loss(&self, account_id: AccountId) {
        let mut registry = self.accounts.write().await;
        if let Some(account) = registry.by_id.get_mut(&account_id) {
            account.losses += 1;
        }
    }

    /// Public profile for an account.
    pub async fn profile(&self, account_id: AccountId) -> Result<AccountProfile, AccountError> {
        let registry = self.accounts.read().await;
        let account = registry
            .by_id
            .get(&account_id)
            .ok_or(AccountError::AccountNotFound)?;
        Ok(AccountProfile {
            account_id: account.id,
            username: account.username.clone(),
            wins: account.wins,
            losses: account.losses,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        })
    }

    /// The global top list with usernames attached. An account that has
    /// since vanished from the registry shows as "unknown".
    pub async fn top_players(&self, requested: usize) -> Vec<LeaderboardRow> {
        let scores = self.leaderboard.top_k(requested).await;
        let registry = self.accounts.read().await;
        scores
            .into_iter()
            .map(|entry| LeaderboardRow {
                account_id: entry.account_id,
                username: registry
                    .by_id
                    .get(&entry.account_id)
                    .map(|a| a.username.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                score: entry.score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use codebreak_domain::LeaderboardConfig;

    use super::*;

    fn service() -> AccountService {
        AccountService::new(Arc::new(Leaderboard::new(&LeaderboardConfig::default())))
    }

    #[tokio::test]
    async fn test_create_account_and_login() {
        let svc = service();
        let id = svc.create_account("alice", "hunter22").await.unwrap();

        let token = svc.login("alice", "hunter22").await.unwrap();
        assert_eq!(svc.account_from_session(&token).await.unwrap(), id);

        let profile = svc.profile(id).await.unwrap();
        assert_eq!(profile.username, "alice");
        assert!(profile.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_create_account_validation() {
        let svc = service();
        assert!(matches!(
            svc.create_account("  ", "hunter22").await,
            Err(AccountError::UsernameRequired)
        ));
        assert!(matches!(
            svc.create_account("alice", "short").await,
            Err(AccountError::PasswordTooShort(_))
        ));

        svc.create_account("alice", "hunter22").await.unwrap();
        assert!(matches!(
            svc.create_account("alice", "different-pw").await,
            Err(AccountError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_login_failures() {
        let svc = service();
        svc.create_account("alice", "hunter22").await.unwrap();

        assert!(matches!(
            svc.login("nobody", "hunter22").await,
            Err(AccountError::AccountNotFound)
        ));
        assert!(matches!(
            svc.login("alice", "wrong-password").await,
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let svc = service();
        svc.create_account("alice", "hunter22").await.unwrap();
        let token = svc.login("alice", "hunter22").await.unwrap();

        svc.logout(&token).await;
        assert!(matches!(
            svc.account_from_session(&token).await,
            Err(AccountError::InvalidSession)
        ));
        // Logging out twice is fine.
        svc.logout(&token).await;
    }

    #[tokio::test]
    async fn test_record_win_reaches_profile_and_leaderboard() {
        let svc = service();
        let alice = svc.create_account("alice", "hunter22").await.unwrap();
        let bob = svc.create_account("bob", "hunter22").await.unwrap();

        svc.record_win(alice).await;
        svc.record_win(alice).await;
        svc.record_win(bob).await;
        svc.record_loss(bob).await;

        let profile = svc.profile(alice).await.unwrap();
        assert_eq!(profile.wins, 2);
        assert_eq!(profile.losses, 0);
        let profile = svc.profile(bob).await.unwrap();
        assert_eq!(profile.wins, 1);
        assert_eq!(profile.losses, 1);

        let top = svc.top_players(10).await;
        assert_eq!(top[0].username, "alice");
        assert_eq!(top[0].score, 2);
        assert_eq!(top[1].username, "bob");
        assert_eq!(top[1].score, 1);
    }

    #[tokio::test]
    async fn test_record_win_for_unknown_account_is_silent() {
        let svc = service();
        svc.record_win(AccountId(999_999)).await;
        let top = svc.top_players(10).await;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].username, "unknown");
    }
}
