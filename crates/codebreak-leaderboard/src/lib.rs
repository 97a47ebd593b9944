//! Global cross-room win leaderboard.
//!
//! Scores only ever go up, and reads want the top K without re-sorting
//! every account on every win. The structure keeps two views:
//!
//! - an authoritative score map, always current;
//! - a bounded min-heap of at most K `(score, account)` candidates.
//!
//! Writes update the map and, when the new score beats the heap's
//! minimum (or the heap is not yet full), push a candidate. The heap is
//! allowed to hold stale entries for an account whose score later grew;
//! [`Leaderboard::top_k`] reconciles by dropping any candidate whose
//! recorded score no longer matches the map, and any account already
//! emitted. Reads cost O(K log K) instead of O(N log N).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use codebreak_domain::{AccountId, LeaderboardConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// One leaderboard row: an account and its authoritative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub account_id: AccountId,
    pub score: u64,
}

struct Inner {
    /// Authoritative current score per account.
    scores: HashMap<AccountId, u64>,
    /// Candidate set, min-oriented on (score, account id). May contain
    /// stale duplicates; bounded to `k` live entries on insert.
    heap: BinaryHeap<Reverse<(u64, AccountId)>>,
    k: usize,
}

/// The shared leaderboard. Guarded by its own mutex, never taken while
/// any room's lock is held.
pub struct Leaderboard {
    inner: Mutex<Inner>,
}

impl Leaderboard {
    pub fn new(config: &LeaderboardConfig) -> Self {
        // A zero-width board would silently drop every candidate.
        let k = config.top_k.max(1);
        Self {
            inner: Mutex::new(Inner {
                scores: HashMap::new(),
                heap: BinaryHeap::with_capacity(k + 1),
                k,
            }),
        }
    }

    /// Adds one win to the account's score and returns the new value.
    pub async fn increment(&self, account_id: AccountId) -> u64 {
        let mut inner = self.inner.lock().await;
        let score = inner.scores.entry(account_id).or_insert(0);
        *score += 1;
        let new_score = *score;

        if inner.heap.len() < inner.k {
            inner.heap.push(Reverse((new_score, account_id)));
        } else {
            let min_score = inner.heap.peek().map(|Reverse((score, _))| *score);
            if min_score.is_some_and(|min| new_score > min) {
                inner.heap.push(Reverse((new_score, account_id)));
                while inner.heap.len() > inner.k {
                    inner.heap.pop();
                }
            }
        }

        tracing::debug!(%account_id, score = new_score, "leaderboard increment");
        new_score
    }

    /// The account's authoritative score, zero if never incremented.
    pub async fn score(&self, account_id: AccountId) -> u64 {
        self.inner
            .lock()
            .await
            .scores
            .get(&account_id)
            .copied()
            .unwrap_or(0)
    }

    /// Up to `requested` rows in descending score order, ties broken by
    /// account id. Stale candidates (score moved on since insertion) and
    /// duplicate accounts are skipped at read time.
    pub async fn top_k(&self, requested: usize) -> Vec<ScoreEntry> {
        let inner = self.inner.lock().await;

        let mut candidates: Vec<(u64, AccountId)> =
            inner.heap.iter().map(|Reverse(pair)| *pair).collect();
        candidates.sort_by_key(|&(score, account_id)| (Reverse(score), account_id));

        let mut out = Vec::with_capacity(requested.min(inner.k));
        let mut seen = HashSet::new();
        for (score, account_id) in candidates {
            if out.len() >= requested {
                break;
            }
            match inner.scores.get(&account_id) {
                // Stale: a newer candidate (or none) carries the truth.
                Some(&current) if current != score => continue,
                None => continue,
                Some(&current) => {
                    if seen.insert(account_id) {
                        out.push(ScoreEntry {
                            account_id,
                            score: current,
                        });
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(top_k: usize) -> Leaderboard {
        Leaderboard::new(&LeaderboardConfig { top_k })
    }

    #[tokio::test]
    async fn test_increment_returns_running_total() {
        let lb = board(3);
        let a = AccountId(1);
        assert_eq!(lb.increment(a).await, 1);
        assert_eq!(lb.increment(a).await, 2);
        assert_eq!(lb.score(a).await, 2);
        assert_eq!(lb.score(AccountId(2)).await, 0);
    }

    #[tokio::test]
    async fn test_top_k_orders_by_score_then_account() {
        let lb = board(5);
        for _ in 0..3 {
            lb.increment(AccountId(10)).await;
        }
        for _ in 0..5 {
            lb.increment(AccountId(20)).await;
        }
        for _ in 0..3 {
            lb.increment(AccountId(5)).await;
        }

        let top = lb.top_k(5).await;
        assert_eq!(
            top,
            vec![
                ScoreEntry { account_id: AccountId(20), score: 5 },
                ScoreEntry { account_id: AccountId(5), score: 3 },
                ScoreEntry { account_id: AccountId(10), score: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_top_k_skips_stale_duplicate_candidates() {
        let lb = board(2);
        // Every increment for the same account leaves a stale candidate
        // behind; only the latest score may be reported.
        for _ in 0..4 {
            lb.increment(AccountId(1)).await;
        }
        lb.increment(AccountId(2)).await;

        let top = lb.top_k(2).await;
        assert_eq!(top.len(), 1, "stale and evicted entries must not pad the result");
        assert_eq!(top[0], ScoreEntry { account_id: AccountId(1), score: 4 });
    }

    #[tokio::test]
    async fn test_top_k_bounded_by_width_under_churn() {
        let lb = board(3);
        // Accounts 1..=6 with strictly increasing scores, all pushed past
        // the configured width.
        for n in 1..=6u64 {
            for _ in 0..n {
                lb.increment(AccountId(n)).await;
            }
        }

        let top = lb.top_k(3).await;
        assert_eq!(
            top,
            vec![
                ScoreEntry { account_id: AccountId(6), score: 6 },
                ScoreEntry { account_id: AccountId(5), score: 5 },
                ScoreEntry { account_id: AccountId(4), score: 4 },
            ]
        );
    }

    #[tokio::test]
    async fn test_top_k_requested_smaller_than_width() {
        let lb = board(10);
        lb.increment(AccountId(1)).await;
        lb.increment(AccountId(2)).await;
        lb.increment(AccountId(2)).await;

        let top = lb.top_k(1).await;
        assert_eq!(top, vec![ScoreEntry { account_id: AccountId(2), score: 2 }]);
    }
}
