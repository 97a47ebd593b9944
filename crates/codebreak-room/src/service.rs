//! The room service: creates, tracks, and mutates rooms.
//!
//! Every operation follows the same shape: find the room's handle in the
//! registry, take the room's mutex, and do all validation and mutation
//! inside that exclusive section. Different rooms never contend; two
//! operations on the same room serialize.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use codebreak_domain::{
    GameConfig, GameStatus, Guess, HistoryEntry, PlayerId, RoomId, evaluate, generate_token,
};
use codebreak_generator::SecretGenerator;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::room::{Player, Room, RoomState};
use crate::{RoomError, RoomSnapshot};

/// Counters for allocating unique room and player IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Returned by room creation. The host token is the only proof of host
/// authority; it is not stored anywhere the client can re-fetch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreated {
    pub room_id: RoomId,
    pub host_token: String,
}

/// Returned by a successful join. This is the only time the player's
/// possession token is revealed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub player_token: String,
    pub attempts_left: u32,
}

/// Owns every live room.
///
/// The registry map is behind a read-write lock and is only held long
/// enough to find or insert a handle. Each room then has its own mutex,
/// held for the full duration of the operation; the one permitted await
/// under that mutex is the generator's bounded call during `start`.
pub struct RoomService<G: SecretGenerator> {
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<Room>>>>,
    generator: G,
    config: GameConfig,
}

impl<G: SecretGenerator> RoomService<G> {
    pub fn new(config: GameConfig, generator: G) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            generator,
            config,
        }
    }

    /// Allocates a room in `Waiting` with a freshly minted host token
    /// and no players.
    pub async fn create_room(&self) -> RoomCreated {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let host_token = generate_token();
        let room = Room::new(room_id, host_token.clone());
        self.rooms
            .write()
            .await
            .insert(room_id, Arc::new(Mutex::new(room)));
        tracing::info!(%room_id, "room created");
        RoomCreated {
            room_id,
            host_token,
        }
    }

    /// Adds a player to a lobby.
    ///
    /// Rejected unless the room is `Waiting`. A blank or absent name is
    /// replaced by a generated placeholder.
    pub async fn join(
        &self,
        room_id: RoomId,
        name: Option<&str>,
    ) -> Result<PlayerJoined, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        if room.state != RoomState::Waiting {
            return Err(RoomError::InvalidState("room is not joinable".to_string()));
        }

        let player_id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
        let player_token = generate_token();
        let player = Player::new(player_id, name, player_token.clone(), self.config.attempts);
        let attempts_left = player.attempts_left;
        room.players.push(player);

        tracing::info!(
            %room_id,
            %player_id,
            players = room.players.len(),
            "player joined"
        );

        Ok(PlayerJoined {
            room_id,
            player_id,
            player_token,
            attempts_left,
        })
    }

    /// Starts the race.
    ///
    /// Requires the room's current host token and at least one player.
    /// Generates the shared secret (the generator's network call, when
    /// configured, is bounded by its timeout and degrades locally),
    /// resets every player to a clean in-progress slate, and transitions
    /// to `Running`. Idempotent once the room has left `Waiting`.
    pub async fn start(
        &self,
        room_id: RoomId,
        host_token: &str,
    ) -> Result<RoomSnapshot, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        if room.host_token != host_token {
            return Err(RoomError::InvalidHostToken);
        }
        if room.state != RoomState::Waiting {
            // Re-invoking start on a running or finished room returns
            // the current state unchanged.
            return Ok(room.snapshot());
        }
        if room.players.is_empty() {
            return Err(RoomError::InvalidState(
                "at least one player must join before start".to_string(),
            ));
        }

        let secret = self.generator.generate().await;
        let now = SystemTime::now();
        room.secret = Some(secret);
        room.started_at = Some(now);
        room.state = RoomState::Running;
        for player in &mut room.players {
            player.history.clear();
            player.status = GameStatus::InProgress;
            player.finished_at = None;
        }

        tracing::info!(%room_id, players = room.players.len(), "room started");
        Ok(room.snapshot())
    }

    /// Submits a guess for a player.
    ///
    /// Unknown room/player and token mismatches are rejections. A room
    /// that is not running, or a player who already finished, makes the
    /// call a silent no-op returning the unchanged snapshot; that
    /// idempotence is deliberate, not an oversight. A winning guess
    /// finishes the whole room; exhausting attempts finishes the room
    /// only once every player is done.
    pub async fn guess(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        player_token: &str,
        digits: Vec<u8>,
    ) -> Result<RoomSnapshot, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        let idx = room
            .player_index(player_id)
            .ok_or(RoomError::PlayerNotFound(player_id))?;
        if room.players[idx].token != player_token {
            return Err(RoomError::InvalidPlayerToken);
        }
        if room.state != RoomState::Running || room.players[idx].status.is_terminal() {
            return Ok(room.snapshot());
        }

        self.config.check_digits(&digits)?;

        let guess = Guess(digits);
        // A running room always has a secret; `start` set it before the
        // transition.
        let secret = room.secret.as_ref().expect("running room has a secret");
        let feedback = evaluate(secret, &guess);
        let win = feedback.exact_positions == self.config.code_length;
        let now = SystemTime::now();

        {
            let player = &mut room.players[idx];
            player.history.push(HistoryEntry {
                guess,
                feedback,
                at: now,
            });
            // Saturating: a zero attempt budget degrades to an immediate
            // loss instead of underflowing.
            player.attempts_left = player.attempts_left.saturating_sub(1);
        }

        if win {
            room.players[idx].finish(GameStatus::Won, now);
            room.finish(now);
            tracing::info!(%room_id, %player_id, "player won, room finished");
        } else if room.players[idx].attempts_left == 0 {
            room.players[idx].finish(GameStatus::Lost, now);
            if room.all_finished() {
                room.finish(now);
                tracing::info!(%room_id, "all players done, room finished");
            }
        }

        Ok(room.snapshot())
    }

    /// A player leaves the room.
    ///
    /// In the lobby they are removed entirely. Mid-race, a player still
    /// in progress forfeits (marked lost, never a win for anyone else)
    /// and the room finishes if nobody is left playing. In a finished
    /// room this is a no-op that returns the final snapshot.
    pub async fn leave(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        player_token: &str,
    ) -> Result<RoomSnapshot, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        let idx = room
            .player_index(player_id)
            .ok_or(RoomError::PlayerNotFound(player_id))?;
        if room.players[idx].token != player_token {
            return Err(RoomError::InvalidPlayerToken);
        }

        match room.state {
            RoomState::Waiting => {
                room.players.remove(idx);
                tracing::info!(%room_id, %player_id, "player left lobby");
            }
            RoomState::Running => {
                let now = SystemTime::now();
                if !room.players[idx].status.is_terminal() {
                    room.players[idx].finish(GameStatus::Lost, now);
                    tracing::info!(%room_id, %player_id, "player forfeited");
                }
                if room.all_finished() {
                    room.finish(now);
                }
            }
            RoomState::Finished => {
                // No-op; lets the client fetch a final snapshot.
            }
        }

        Ok(room.snapshot())
    }

    /// Host removes a player from the lobby. Only permitted in
    /// `Waiting`; requires the current host token.
    pub async fn kick(
        &self,
        room_id: RoomId,
        host_token: &str,
        target: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        if room.state != RoomState::Waiting {
            return Err(RoomError::InvalidState(
                "kick is allowed only in the lobby".to_string(),
            ));
        }
        if room.host_token != host_token {
            return Err(RoomError::InvalidHostToken);
        }
        let idx = room
            .player_index(target)
            .ok_or(RoomError::PlayerNotFound(target))?;
        room.players.remove(idx);

        tracing::info!(%room_id, player_id = %target, "player kicked");
        Ok(room.snapshot())
    }

    /// Any validated lobby member claims host authority for themselves.
    ///
    /// Mints a fresh host token and overwrites the previous one, which is
    /// invalid from that instant. This is how a room recovers when the
    /// original host disappears. Returns the new token.
    pub async fn promote_host(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        player_token: &str,
    ) -> Result<String, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        if room.state != RoomState::Waiting {
            return Err(RoomError::InvalidState(
                "host can only change while waiting".to_string(),
            ));
        }
        let idx = room
            .player_index(player_id)
            .ok_or(RoomError::PlayerNotFound(player_id))?;
        if room.players[idx].token != player_token {
            return Err(RoomError::InvalidPlayerToken);
        }

        let new_token = generate_token();
        room.host_token = new_token.clone();
        tracing::info!(%room_id, %player_id, "host token claimed");
        Ok(new_token)
    }

    /// The current host hands host authority to a named lobby member.
    ///
    /// The target does not consent or get notified; whoever delivers the
    /// returned token to them completes the transfer. The old token is
    /// invalid immediately.
    pub async fn assign_host(
        &self,
        room_id: RoomId,
        host_token: &str,
        target: PlayerId,
    ) -> Result<String, RoomError> {
        let handle = self.lookup(room_id).await?;
        let mut room = handle.lock().await;

        if room.state != RoomState::Waiting {
            return Err(RoomError::InvalidState(
                "host can only change while waiting".to_string(),
            ));
        }
        if room.host_token != host_token {
            return Err(RoomError::InvalidHostToken);
        }
        if room.player_index(target).is_none() {
            return Err(RoomError::PlayerNotFound(target));
        }

        let new_token = generate_token();
        room.host_token = new_token.clone();
        tracing::info!(%room_id, player_id = %target, "host token reassigned");
        Ok(new_token)
    }

    /// Read-only snapshot. Still taken under the room's mutex so it
    /// never observes a half-applied mutation.
    pub async fn get(&self, room_id: RoomId) -> Result<RoomSnapshot, RoomError> {
        let handle = self.lookup(room_id).await?;
        let room = handle.lock().await;
        Ok(room.snapshot())
    }

    async fn lookup(&self, room_id: RoomId) -> Result<Arc<Mutex<Room>>, RoomError> {
        self.rooms
            .read()
            .await
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::RoomNotFound(room_id))
    }
}
