//! Mission lifecycle tests
//!
//! Exercises the state machine through the service layer against the
//! in-memory store: role guards, status ordering, the contended accept,
//! cancellation rules and the emitted notification effects.

mod common;

use common::*;
use taskrunner_server::error::ApiError;
use taskrunner_server::fees::round_money;
use taskrunner_server::mission::{Assignment, MissionStatus};
use taskrunner_server::models::UserRole;
use taskrunner_server::notification::NotificationKind;
use taskrunner_server::store::Store;

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_computes_fee_split() {
    let app = TestApp::new();
    let client = client();
    app.seed_user(&client).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    assert_eq!(mission.status, MissionStatus::Pending);
    assert_eq!(mission.assignment, Assignment::Unassigned);
    assert_eq!(mission.platform_fee, 7.5);
    assert_eq!(mission.provider_earning, 42.5);
    assert_eq!(
        round_money(mission.platform_fee + mission.provider_earning),
        mission.client_price
    );
}

#[tokio::test]
async fn test_fee_invariant_holds_for_odd_prices() {
    let app = TestApp::new();
    let client = client();
    app.seed_user(&client).await;

    for price in [1.0, 9.99, 33.33, 123.45] {
        let (mission, _) = app
            .missions
            .create(client.id, mission_request(price, ORIGIN))
            .await
            .unwrap();
        assert_eq!(
            round_money(mission.platform_fee + mission.provider_earning),
            price
        );
    }
}

#[tokio::test]
async fn test_only_clients_can_create() {
    let app = TestApp::new();
    let provider = provider();
    app.seed_user(&provider).await;

    let err = app
        .missions
        .create(provider.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Permission(_)));
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let app = TestApp::new();
    let client = client();
    app.seed_user(&client).await;

    let cheap = app
        .missions
        .create(client.id, mission_request(0.5, ORIGIN))
        .await
        .unwrap_err();
    assert!(matches!(cheap, ApiError::Validation(_)));

    let mut untitled = mission_request(50.0, ORIGIN);
    untitled.title = String::new();
    let err = app.missions.create(client.id, untitled).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_create_fans_out_to_nearby_providers() {
    let app = TestApp::new();
    let client = client();
    let near = provider_at(north_of(ORIGIN, 2.0), None);
    let far = provider_at(north_of(ORIGIN, 50.0), None);
    app.seed_user(&client).await;
    app.seed_user(&near).await;
    app.seed_user(&far).await;

    let (_, notices) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].user_id, near.id);
    assert_eq!(notices[0].kind, NotificationKind::NewMission);
    assert!(notices[0].body.contains("50"));
}

// ============================================================================
// Accept
// ============================================================================

#[tokio::test]
async fn test_accept_assigns_provider_and_notifies_client() {
    let app = TestApp::new();
    let mut client = client();
    client.push_token = Some("client-token".to_string());
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    let (accepted, notices) = app.missions.accept(mission.id, provider.id).await.unwrap();

    assert_eq!(accepted.status, MissionStatus::Accepted);
    assert_eq!(accepted.provider_id(), Some(provider.id));
    assert!(matches!(accepted.assignment, Assignment::Assigned { .. }));

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].user_id, client.id);
    assert_eq!(notices[0].kind, NotificationKind::MissionAccepted);
    assert_eq!(notices[0].push_token.as_deref(), Some("client-token"));
}

#[tokio::test]
async fn test_clients_cannot_accept() {
    let app = TestApp::new();
    let client = client();
    let other_client = user(UserRole::Client);
    app.seed_user(&client).await;
    app.seed_user(&other_client).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    let err = app
        .missions
        .accept(mission.id, other_client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Permission(_)));
}

#[tokio::test]
async fn test_accept_requires_pending() {
    let app = TestApp::new();
    let client = client();
    let first = provider();
    let second = provider();
    app.seed_user(&client).await;
    app.seed_user(&first).await;
    app.seed_user(&second).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    app.missions.accept(mission.id, first.id).await.unwrap();

    let err = app
        .missions
        .accept(mission.id, second.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_accept_has_exactly_one_winner() {
    let app = TestApp::new();
    let client = client();
    let first = provider();
    let second = provider();
    app.seed_user(&client).await;
    app.seed_user(&first).await;
    app.seed_user(&second).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        app.missions.accept(mission.id, first.id),
        app.missions.accept(mission.id, second.id),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one acceptor must win");

    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser.unwrap_err(), ApiError::Conflict(_)));

    let stored = app.store.get_mission(mission.id).await.unwrap().unwrap();
    assert_eq!(stored.status, MissionStatus::Accepted);
    assert!(
        stored.provider_id() == Some(first.id) || stored.provider_id() == Some(second.id),
        "final state must carry exactly one provider"
    );
}

// ============================================================================
// Status ordering
// ============================================================================

#[tokio::test]
async fn test_start_requires_accepted() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    // Starting a PENDING mission: the caller is not assigned yet, so the
    // ownership guard rejects before any status check
    let err = app
        .missions
        .start(mission.id, provider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Permission(_)));
}

#[tokio::test]
async fn test_complete_requires_in_progress() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();

    // Accepted but not started
    let err = app
        .missions
        .complete(mission.id, provider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_start_twice_conflicts() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();
    app.missions.start(mission.id, provider.id).await.unwrap();

    let err = app
        .missions
        .start(mission.id, provider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_only_assigned_provider_can_start_and_complete() {
    let app = TestApp::new();
    let client = client();
    let assigned = provider();
    let stranger = provider();
    app.seed_user(&client).await;
    app.seed_user(&assigned).await;
    app.seed_user(&stranger).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, assigned.id).await.unwrap();

    let err = app
        .missions
        .start(mission.id, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Permission(_)));
}

#[tokio::test]
async fn test_full_happy_path_sets_timestamps() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    let (accepted, _) = app.missions.accept(mission.id, provider.id).await.unwrap();
    assert!(matches!(accepted.assignment, Assignment::Assigned { .. }));

    let (started, notices) = app.missions.start(mission.id, provider.id).await.unwrap();
    assert_eq!(started.status, MissionStatus::InProgress);
    assert!(started.started_at.is_some());
    assert_eq!(notices[0].kind, NotificationKind::MissionStarted);

    let (completed, notices) = app
        .missions
        .complete(mission.id, provider.id)
        .await
        .unwrap();
    assert_eq!(completed.status, MissionStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert_eq!(notices[0].kind, NotificationKind::MissionCompleted);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_from_pending_accepted_and_in_progress() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    // From PENDING, by the client; no provider yet, so no notices
    let (pending, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    let (cancelled, notices) = app.missions.cancel(pending.id, client.id).await.unwrap();
    assert_eq!(cancelled.status, MissionStatus::Cancelled);
    assert!(notices.is_empty());

    // From ACCEPTED, by the provider; the client is notified
    let (accepted, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(accepted.id, provider.id).await.unwrap();
    let (_, notices) = app.missions.cancel(accepted.id, provider.id).await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].user_id, client.id);
    assert_eq!(notices[0].kind, NotificationKind::MissionCancelled);

    // From IN_PROGRESS, by the client; the provider is notified
    let (in_progress, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions
        .accept(in_progress.id, provider.id)
        .await
        .unwrap();
    app.missions
        .start(in_progress.id, provider.id)
        .await
        .unwrap();
    let (_, notices) = app
        .missions
        .cancel(in_progress.id, client.id)
        .await
        .unwrap();
    assert_eq!(notices[0].user_id, provider.id);
}

#[tokio::test]
async fn test_cannot_cancel_completed() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();
    app.missions.start(mission.id, provider.id).await.unwrap();
    app.missions
        .complete(mission.id, provider.id)
        .await
        .unwrap();

    let err = app
        .missions
        .cancel(mission.id, client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_cancel_is_terminal() {
    let app = TestApp::new();
    let client = client();
    app.seed_user(&client).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.cancel(mission.id, client.id).await.unwrap();

    let err = app
        .missions
        .cancel(mission.id, client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_strangers_cannot_cancel() {
    let app = TestApp::new();
    let client = client();
    let stranger = user(UserRole::Client);
    app.seed_user(&client).await;
    app.seed_user(&stranger).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    let err = app
        .missions
        .cancel(mission.id, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Permission(_)));
}

// ============================================================================
// Detail access
// ============================================================================

#[tokio::test]
async fn test_mission_detail_access_rules() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    let stranger = user(UserRole::Client);
    let admin = user(UserRole::Admin);
    app.seed_user(&client).await;
    app.seed_user(&provider).await;
    app.seed_user(&stranger).await;
    app.seed_user(&admin).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();

    assert!(app.missions.get(mission.id, client.id).await.is_ok());
    assert!(app.missions.get(mission.id, provider.id).await.is_ok());
    assert!(app.missions.get(mission.id, admin.id).await.is_ok());

    let err = app.missions.get(mission.id, stranger.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Permission(_)));
}

#[tokio::test]
async fn test_mission_detail_includes_related_records() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();

    app.messages
        .send(client.id, mission.id, "On my way?".to_string())
        .await
        .unwrap();

    let detail = app.missions.get(mission.id, client.id).await.unwrap();
    assert_eq!(detail.messages.len(), 1);
    assert_eq!(detail.client.as_ref().unwrap().id, client.id);
    assert_eq!(detail.provider.as_ref().unwrap().id, provider.id);
    assert!(detail.rating.is_none());
    assert!(detail.payment.is_none());
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_message_requires_assigned_provider() {
    let app = TestApp::new();
    let client = client();
    app.seed_user(&client).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();

    let err = app
        .messages
        .send(client.id, mission.id, "Anyone there?".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_message_flow_and_read_marking() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();

    let (message, notices) = app
        .messages
        .send(client.id, mission.id, "The code is 4912".to_string())
        .await
        .unwrap();
    assert_eq!(message.receiver_id, provider.id);
    assert_eq!(notices[0].kind, NotificationKind::NewMessage);

    assert_eq!(app.messages.unread_count(provider.id).await.unwrap(), 1);

    // Reading as the receiver marks the message read
    let messages = app.messages.list(mission.id, provider.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(app.messages.unread_count(provider.id).await.unwrap(), 0);
}

// ============================================================================
// Ratings
// ============================================================================

#[tokio::test]
async fn test_rating_only_after_completion() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    let (mission, _) = app
        .missions
        .create(client.id, mission_request(50.0, ORIGIN))
        .await
        .unwrap();
    app.missions.accept(mission.id, provider.id).await.unwrap();

    let err = app
        .ratings
        .create(client.id, mission.id, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_rating_twice_conflicts_and_aggregate_updates() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    // Two completed missions rated 5 and 4: average 4.5
    for score in [5, 4] {
        let (mission, _) = app
            .missions
            .create(client.id, mission_request(50.0, ORIGIN))
            .await
            .unwrap();
        app.missions.accept(mission.id, provider.id).await.unwrap();
        app.missions.start(mission.id, provider.id).await.unwrap();
        app.missions
            .complete(mission.id, provider.id)
            .await
            .unwrap();

        let rating = app
            .ratings
            .create(client.id, mission.id, score, None)
            .await
            .unwrap();
        assert_eq!(rating.rated_id, provider.id);

        // Second rating for the same mission conflicts
        let err = app
            .ratings
            .create(client.id, mission.id, 3, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    let rated = app.store.get_user(provider.id).await.unwrap().unwrap();
    assert_eq!(rated.total_ratings, 2);
    assert_eq!(rated.average_rating, 4.5);
}

#[tokio::test]
async fn test_rating_score_bounds() {
    let app = TestApp::new();
    let client = client();
    app.seed_user(&client).await;

    for score in [0, 6] {
        let err = app
            .ratings
            .create(client.id, uuid::Uuid::new_v4(), score, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

#[tokio::test]
async fn test_average_rounds_to_one_decimal() {
    let app = TestApp::new();
    let client = client();
    let provider = provider();
    app.seed_user(&client).await;
    app.seed_user(&provider).await;

    // Scores 5, 4, 4: mean 4.3333 -> stored as 4.3
    for score in [5, 4, 4] {
        let (mission, _) = app
            .missions
            .create(client.id, mission_request(50.0, ORIGIN))
            .await
            .unwrap();
        app.missions.accept(mission.id, provider.id).await.unwrap();
        app.missions.start(mission.id, provider.id).await.unwrap();
        app.missions
            .complete(mission.id, provider.id)
            .await
            .unwrap();
        app.ratings
            .create(client.id, mission.id, score, None)
            .await
            .unwrap();
    }

    let rated = app.store.get_user(provider.id).await.unwrap().unwrap();
    assert_eq!(rated.average_rating, 4.3);
}
