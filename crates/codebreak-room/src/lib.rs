//! Multiplayer room lifecycle for Codebreak.
//!
//! A room is one shared secret and a set of players racing to break it.
//! The whole room is the unit of mutual exclusion: every state-changing
//! operation runs with the room's mutex held, so no operation ever
//! observes a room mid-mutation by another.
//!
//! # Key types
//!
//! - [`RoomService`] — creates rooms and runs every room operation
//! - [`RoomState`] — the WAITING -> RUNNING -> FINISHED state machine
//! - [`RoomSnapshot`] — what polling clients see (never the secret)
//! - [`RoomError`] — rejection signals, keyed by the shared taxonomy

mod error;
mod room;
mod service;

pub use error::RoomError;
pub use room::{PlayerSnapshot, RankEntry, Room, RoomSnapshot, RoomState};
pub use service::{PlayerJoined, RoomCreated, RoomService};
