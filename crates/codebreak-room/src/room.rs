//! Room and player aggregates, the lifecycle state machine, and the
//! snapshot/ranking views handed back to polling clients.

use std::time::SystemTime;

use codebreak_domain::{Code, GameStatus, HistoryEntry, PlayerId, RoomId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting ──(start by host token)──→ Running ──(first win, or
///    all players done)──→ Finished
/// ```
///
/// - **Waiting**: the lobby. Players join, leave, get kicked; the host
///   token may rotate. No secret exists yet.
/// - **Running**: the secret is assigned and guesses are accepted.
///   Joins are rejected.
/// - **Finished**: terminal. Player-facing operations are no-ops or
///   rejections; the snapshot stays readable forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomState {
    Waiting,
    Running,
    Finished,
}

impl RoomState {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` once no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One room participant.
///
/// The possession token proves authorship of guesses and leaves; it is
/// revealed exactly once, in the join response. Removed from the room
/// only while the room is still in its lobby state.
#[derive(Debug)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) token: String,
    pub(crate) attempts_left: u32,
    pub(crate) status: GameStatus,
    pub(crate) finished_at: Option<SystemTime>,
    pub(crate) history: Vec<HistoryEntry>,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: Option<&str>, token: String, attempts: u32) -> Self {
        let name = match name.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
            // Blank or absent names get a generated placeholder.
            _ => format!("Player-{}", id.0),
        };
        Self {
            id,
            name,
            token,
            attempts_left: attempts,
            status: GameStatus::InProgress,
            finished_at: None,
            history: Vec::new(),
        }
    }

    /// Marks the player terminal at `now`. Keeps the invariant that
    /// `finished_at` is set iff the status left `InProgress`.
    pub(crate) fn finish(&mut self, status: GameStatus, now: SystemTime) {
        self.status = status;
        self.finished_at = Some(now);
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// The shared mutable room aggregate.
///
/// Always accessed through its mutex (held by [`RoomService`] for the
/// whole of every operation); nothing outside the lock ever reads a
/// field. Players keep insertion order for stable display.
///
/// [`RoomService`]: crate::RoomService
#[derive(Debug)]
pub struct Room {
    pub(crate) id: RoomId,
    /// Rotatable: promote/assign mint a replacement, which instantly
    /// invalidates the old value. Possession is the only authority.
    pub(crate) host_token: String,
    pub(crate) created_at: SystemTime,
    pub(crate) state: RoomState,
    pub(crate) started_at: Option<SystemTime>,
    pub(crate) finished_at: Option<SystemTime>,
    /// `Some` iff the state has left `Waiting`.
    pub(crate) secret: Option<Code>,
    pub(crate) players: Vec<Player>,
}

impl Room {
    pub(crate) fn new(id: RoomId, host_token: String) -> Self {
        Self {
            id,
            host_token,
            created_at: SystemTime::now(),
            state: RoomState::Waiting,
            started_at: None,
            finished_at: None,
            secret: None,
            players: Vec::new(),
        }
    }

    pub(crate) fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub(crate) fn all_finished(&self) -> bool {
        self.players.iter().all(|p| p.status.is_terminal())
    }

    /// Transitions to `Finished` and timestamps it. Idempotent so a
    /// winner and a simultaneous last loser can't double-finish.
    pub(crate) fn finish(&mut self, now: SystemTime) {
        if self.state != RoomState::Finished {
            self.state = RoomState::Finished;
            self.finished_at = Some(now);
        }
    }

    /// A client-safe view, produced inside the room's exclusive section.
    /// Carries the players in join order plus the display ranking;
    /// never the secret, never any token.
    pub fn snapshot(&self) -> RoomSnapshot {
        let players = self
            .players
            .iter()
            .map(|p| PlayerSnapshot {
                player_id: p.id,
                name: p.name.clone(),
                status: p.status,
                attempts_left: p.attempts_left,
                history: p.history.clone(),
            })
            .collect();

        let mut rankings: Vec<RankEntry> = self
            .players
            .iter()
            .map(|p| RankEntry {
                player_id: p.id,
                name: p.name.clone(),
                status: p.status,
                attempts_used: p.history.len(),
                elapsed_seconds: self.elapsed_seconds(p),
            })
            .collect();
        // Winners first, then fewest attempts, then fastest. Undefined
        // elapsed sorts last within its group; the sort is stable so
        // remaining ties keep join order.
        rankings.sort_by_key(|e| {
            (
                e.status.rank(),
                e.attempts_used,
                e.elapsed_seconds.unwrap_or(u64::MAX),
            )
        });

        RoomSnapshot {
            room_id: self.id,
            state: self.state,
            created_at: self.created_at,
            started_at: self.started_at,
            finished_at: self.finished_at,
            players,
            rankings,
        }
    }

    /// Elapsed play time for ranking display. A player who finished gets
    /// their own finish time; a player still in progress in a finished
    /// room gets the room's (they played until the race ended); anything
    /// else is undefined.
    fn elapsed_seconds(&self, player: &Player) -> Option<u64> {
        let started = self.started_at?;
        let end = player.finished_at.or(self.finished_at)?;
        end.duration_since(started).ok().map(|d| d.as_secs())
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// What a polling client sees of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub state: RoomState,
    pub created_at: SystemTime,
    pub started_at: Option<SystemTime>,
    pub finished_at: Option<SystemTime>,
    /// Players in join order.
    pub players: Vec<PlayerSnapshot>,
    /// Players in display-ranking order (see [`Room::snapshot`]).
    pub rankings: Vec<RankEntry>,
}

impl RoomSnapshot {
    /// Convenience lookup by player id (join-order list).
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.player_id == id)
    }
}

/// One player's public state. No token, ever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    pub status: GameStatus,
    pub attempts_left: u32,
    pub history: Vec<HistoryEntry>,
}

/// One row of the in-room leaderboard display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub status: GameStatus,
    pub attempts_used: usize,
    /// `None` when the player hasn't finished and the room is still
    /// running; sorts after every defined value.
    pub elapsed_seconds: Option<u64>,
}
