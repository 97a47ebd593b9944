//! End-to-end room lifecycle tests driven through the service API.

use codebreak_domain::{Code, GameConfig, GameStatus};
use codebreak_generator::SecretGenerator;
use codebreak_room::{RoomError, RoomService, RoomState};

/// Deterministic generator so tests can win or lose on purpose.
struct FixedGenerator(Vec<u8>);

impl SecretGenerator for FixedGenerator {
    async fn generate(&self) -> Code {
        Code::new(self.0.clone(), &GameConfig::default()).unwrap()
    }
}

fn service() -> RoomService<FixedGenerator> {
    RoomService::new(GameConfig::default(), FixedGenerator(vec![0, 1, 3, 2]))
}

#[tokio::test]
async fn test_create_join_start_win_flow() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();

    let snap = svc.start(created.room_id, &created.host_token).await.unwrap();
    assert_eq!(snap.state, RoomState::Running);
    assert!(snap.started_at.is_some());

    // Alice guesses wrong, then cracks the code.
    let snap = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();
    assert_eq!(snap.state, RoomState::Running);
    assert_eq!(snap.player(alice.player_id).unwrap().attempts_left, 9);

    let snap = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![0, 1, 3, 2])
        .await
        .unwrap();
    assert_eq!(snap.state, RoomState::Finished);
    assert_eq!(snap.player(alice.player_id).unwrap().status, GameStatus::Won);
    // The race ended for Bob too, but his own status is untouched.
    assert_eq!(
        snap.player(bob.player_id).unwrap().status,
        GameStatus::InProgress
    );

    // The winner ranks first.
    assert_eq!(snap.rankings[0].player_id, alice.player_id);
    assert!(snap.rankings[0].elapsed_seconds.is_some());
}

#[tokio::test]
async fn test_guess_before_start_is_silent_noop() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();

    let snap = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![0, 1, 3, 2])
        .await
        .unwrap();
    assert_eq!(snap.state, RoomState::Waiting);
    assert!(snap.player(alice.player_id).unwrap().history.is_empty());
    assert_eq!(snap.player(alice.player_id).unwrap().attempts_left, 10);
}

#[tokio::test]
async fn test_guess_after_player_finished_is_silent_noop() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    svc.guess(created.room_id, alice.player_id, &alice.player_token, vec![0, 1, 3, 2])
        .await
        .unwrap();

    // Bob keeps trying after the room finished; nothing changes.
    let snap = svc
        .guess(created.room_id, bob.player_id, &bob.player_token, vec![0, 1, 3, 2])
        .await
        .unwrap();
    assert_eq!(snap.state, RoomState::Finished);
    assert!(snap.player(bob.player_id).unwrap().history.is_empty());
    assert_eq!(snap.player(bob.player_id).unwrap().status, GameStatus::InProgress);
}

#[tokio::test]
async fn test_guess_with_wrong_token_is_rejected() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    let err = svc
        .guess(created.room_id, alice.player_id, "not-the-token", vec![0, 1, 3, 2])
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidPlayerToken));
}

#[tokio::test]
async fn test_guess_rejects_malformed_digits() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    let err = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![0, 1, 3])
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidGuess(_)));

    let err = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![0, 1, 3, 9])
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidGuess(_)));

    // A rejected guess must not consume an attempt.
    let snap = svc.get(created.room_id).await.unwrap();
    assert_eq!(snap.player(alice.player_id).unwrap().attempts_left, 10);
}

#[tokio::test]
async fn test_start_requires_host_token() {
    let svc = service();
    let created = svc.create_room().await;
    svc.join(created.room_id, Some("Alice")).await.unwrap();

    let err = svc.start(created.room_id, "wrong").await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidHostToken));

    let snap = svc.get(created.room_id).await.unwrap();
    assert_eq!(snap.state, RoomState::Waiting);
}

#[tokio::test]
async fn test_start_requires_a_player() {
    let svc = service();
    let created = svc.create_room().await;
    let err = svc
        .start(created.room_id, &created.host_token)
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidState(_)));
}

#[tokio::test]
async fn test_start_is_idempotent_once_running() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let first = svc.start(created.room_id, &created.host_token).await.unwrap();

    svc.guess(created.room_id, alice.player_id, &alice.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();

    let second = svc.start(created.room_id, &created.host_token).await.unwrap();
    assert_eq!(second.state, RoomState::Running);
    assert_eq!(second.started_at, first.started_at);
    // The in-flight attempt survives: the restart did not reset anyone.
    assert_eq!(second.player(alice.player_id).unwrap().attempts_left, 9);
}

#[tokio::test]
async fn test_join_rejected_once_running() {
    let svc = service();
    let created = svc.create_room().await;
    svc.join(created.room_id, Some("Alice")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    let err = svc.join(created.room_id, Some("Late")).await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidState(_)));
}

#[tokio::test]
async fn test_leave_in_lobby_removes_player() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();

    let snap = svc
        .leave(created.room_id, alice.player_id, &alice.player_token)
        .await
        .unwrap();
    assert!(snap.player(alice.player_id).is_none());
    assert!(snap.player(bob.player_id).is_some());
}

#[tokio::test]
async fn test_leave_mid_race_forfeits_and_can_finish_room() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    let snap = svc
        .leave(created.room_id, alice.player_id, &alice.player_token)
        .await
        .unwrap();
    // A forfeit stays on the record; the player is not removed.
    assert_eq!(snap.player(alice.player_id).unwrap().status, GameStatus::Lost);
    assert_eq!(snap.state, RoomState::Running);

    let snap = svc
        .leave(created.room_id, bob.player_id, &bob.player_token)
        .await
        .unwrap();
    assert_eq!(snap.player(bob.player_id).unwrap().status, GameStatus::Lost);
    assert_eq!(snap.state, RoomState::Finished);
}

#[tokio::test]
async fn test_leave_after_finish_is_noop() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();
    svc.guess(created.room_id, alice.player_id, &alice.player_token, vec![0, 1, 3, 2])
        .await
        .unwrap();

    let snap = svc
        .leave(created.room_id, alice.player_id, &alice.player_token)
        .await
        .unwrap();
    assert_eq!(snap.state, RoomState::Finished);
    assert_eq!(snap.player(alice.player_id).unwrap().status, GameStatus::Won);
}

#[tokio::test]
async fn test_kick_only_in_lobby() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();

    let snap = svc
        .kick(created.room_id, &created.host_token, bob.player_id)
        .await
        .unwrap();
    assert!(snap.player(bob.player_id).is_none());

    svc.start(created.room_id, &created.host_token).await.unwrap();
    let err = svc
        .kick(created.room_id, &created.host_token, alice.player_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidState(_)));
}

#[tokio::test]
async fn test_promote_host_invalidates_old_token() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    svc.join(created.room_id, Some("Bob")).await.unwrap();

    let new_token = svc
        .promote_host(created.room_id, alice.player_id, &alice.player_token)
        .await
        .unwrap();
    assert_ne!(new_token, created.host_token);

    let err = svc
        .start(created.room_id, &created.host_token)
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidHostToken));

    let snap = svc.start(created.room_id, &new_token).await.unwrap();
    assert_eq!(snap.state, RoomState::Running);
}

#[tokio::test]
async fn test_assign_host_to_member() {
    let svc = service();
    let created = svc.create_room().await;
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();

    let new_token = svc
        .assign_host(created.room_id, &created.host_token, bob.player_id)
        .await
        .unwrap();
    assert_ne!(new_token, created.host_token);

    // Assigning to a stranger fails and does not rotate the token.
    let err = svc
        .assign_host(created.room_id, &new_token, codebreak_domain::PlayerId(9999))
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::PlayerNotFound(_)));
    assert!(svc.start(created.room_id, &new_token).await.is_ok());
}

#[tokio::test]
async fn test_all_players_losing_finishes_room() {
    let svc = RoomService::new(
        GameConfig {
            attempts: 2,
            ..GameConfig::default()
        },
        FixedGenerator(vec![0, 1, 3, 2]),
    );
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();

    svc.start(created.room_id, &created.host_token).await.unwrap();
    svc.guess(created.room_id, alice.player_id, &alice.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();
    let snap = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();

    assert_eq!(snap.player(alice.player_id).unwrap().status, GameStatus::Lost);
    assert_eq!(snap.state, RoomState::Finished);
}

#[tokio::test]
async fn test_zero_attempt_budget_first_guess_loses() {
    let svc = RoomService::new(
        GameConfig {
            attempts: 0,
            ..GameConfig::default()
        },
        FixedGenerator(vec![0, 1, 3, 2]),
    );
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    let snap = svc
        .guess(created.room_id, alice.player_id, &alice.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();

    assert_eq!(snap.player(alice.player_id).unwrap().status, GameStatus::Lost);
    assert_eq!(snap.player(alice.player_id).unwrap().attempts_left, 0);
    assert_eq!(snap.state, RoomState::Finished);
}

#[tokio::test]
async fn test_rankings_order_winner_then_fewest_attempts() {
    let svc = service();
    let created = svc.create_room().await;
    let alice = svc.join(created.room_id, Some("Alice")).await.unwrap();
    let bob = svc.join(created.room_id, Some("Bob")).await.unwrap();
    svc.start(created.room_id, &created.host_token).await.unwrap();

    // Bob burns two attempts, Alice one, then Bob wins.
    svc.guess(created.room_id, bob.player_id, &bob.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();
    svc.guess(created.room_id, bob.player_id, &bob.player_token, vec![6, 6, 6, 6])
        .await
        .unwrap();
    svc.guess(created.room_id, alice.player_id, &alice.player_token, vec![7, 7, 7, 7])
        .await
        .unwrap();
    let snap = svc
        .guess(created.room_id, bob.player_id, &bob.player_token, vec![0, 1, 3, 2])
        .await
        .unwrap();

    // Bob won so he leads despite more attempts used.
    assert_eq!(snap.rankings[0].player_id, bob.player_id);
    assert_eq!(snap.rankings[0].status, GameStatus::Won);
    assert_eq!(snap.rankings[0].attempts_used, 3);
    assert_eq!(snap.rankings[1].player_id, alice.player_id);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let svc = service();
    let err = svc.get(codebreak_domain::RoomId(424242)).await.unwrap_err();
    assert!(matches!(err, RoomError::RoomNotFound(_)));
}
