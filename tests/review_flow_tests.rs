use chrono::{Duration, Utc};

use lingua_backend_rust::db::operations::vocabulary;
use lingua_backend_rust::scheduler::Difficulty;
use lingua_backend_rust::services::review::{SessionError, SessionService};
use lingua_backend_rust::session::SessionStatus;

mod common;

const USER: &str = "user-1";
const LANGUAGE: &str = "spanish";

#[tokio::test]
async fn test_three_card_session_persists_review_outcomes() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    // Distinct last_reviewed_at values pin the queue order.
    let first = common::seed_word(
        &db.pool,
        USER,
        LANGUAGE,
        "hola",
        2,
        Some(now - Duration::days(9)),
        Some(now - Duration::days(1)),
    )
    .await;
    let second = common::seed_word(
        &db.pool,
        USER,
        LANGUAGE,
        "gato",
        0,
        Some(now - Duration::days(6)),
        Some(now - Duration::days(1)),
    )
    .await;
    let third = common::seed_word(
        &db.pool,
        USER,
        LANGUAGE,
        "perro",
        4,
        Some(now - Duration::days(3)),
        Some(now - Duration::days(1)),
    )
    .await;

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.stats.total, 3);
    assert_eq!(session.queue[0].id, first);
    assert_eq!(session.queue[1].id, second);
    assert_eq!(session.queue[2].id, third);

    service.rate(&session.id, Difficulty::Easy, now).await.unwrap();
    service.rate(&session.id, Difficulty::Hard, now).await.unwrap();
    let finished = service
        .rate(&session.id, Difficulty::Medium, now)
        .await
        .unwrap();

    assert_eq!(finished.status, SessionStatus::Complete);
    assert_eq!(finished.stats.reviewed, 3);
    assert_eq!(finished.stats.easy, 1);
    assert_eq!(finished.stats.hard, 1);
    assert_eq!(finished.stats.medium, 1);

    // Mastery deltas: +1, -1 floored at 0, unchanged.
    let first_row = vocabulary::get_word(&db.pool, &first).await.unwrap().unwrap();
    let second_row = vocabulary::get_word(&db.pool, &second).await.unwrap().unwrap();
    let third_row = vocabulary::get_word(&db.pool, &third).await.unwrap().unwrap();

    assert_eq!(first_row.mastery_level, 3);
    assert_eq!(second_row.mastery_level, 0);
    assert_eq!(third_row.mastery_level, 4);

    for row in [&first_row, &second_row, &third_row] {
        assert_eq!(row.times_reviewed, 1);
        assert!(row.last_reviewed_at.is_some());
        assert!(row.next_review_at.unwrap() > now);
    }

    // Hard drops back to a one-day cadence.
    let next = second_row.next_review_at.unwrap();
    assert!((next - (now + Duration::days(1))).num_seconds().abs() < 2);

    assert_eq!(common::review_event_count(&db.pool, USER).await, 3);
}

#[tokio::test]
async fn test_never_reviewed_words_come_first() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    let reviewed = common::seed_word(
        &db.pool,
        USER,
        LANGUAGE,
        "viejo",
        1,
        Some(now - Duration::days(2)),
        Some(now - Duration::hours(1)),
    )
    .await;
    let fresh = common::seed_word(&db.pool, USER, LANGUAGE, "nuevo", 0, None, None).await;
    // Scheduled in the future, must not appear.
    common::seed_word(
        &db.pool,
        USER,
        LANGUAGE,
        "futuro",
        3,
        Some(now - Duration::days(1)),
        Some(now + Duration::days(5)),
    )
    .await;

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();

    assert_eq!(session.stats.total, 2);
    assert_eq!(session.queue[0].id, fresh);
    assert_eq!(session.queue[1].id, reviewed);
}

#[tokio::test]
async fn test_session_is_capped_at_twenty_cards() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    for i in 0..25 {
        common::seed_word(&db.pool, USER, LANGUAGE, &format!("palabra-{i}"), 0, None, None).await;
    }

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();
    assert_eq!(session.stats.total, 20);
    assert_eq!(session.queue.len(), 20);
}

#[tokio::test]
async fn test_session_scope_excludes_other_users_and_languages() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    common::seed_word(&db.pool, USER, LANGUAGE, "mio", 0, None, None).await;
    common::seed_word(&db.pool, "user-2", LANGUAGE, "ajeno", 0, None, None).await;
    common::seed_word(&db.pool, USER, "french", "chien", 0, None, None).await;

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();
    assert_eq!(session.stats.total, 1);
    assert_eq!(session.queue[0].word, "mio");
}

#[tokio::test]
async fn test_empty_due_set_completes_immediately() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();

    assert_eq!(session.status, SessionStatus::Complete);
    assert_eq!(session.stats.total, 0);

    let err = service
        .rate(&session.id, Difficulty::Easy, now)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::OutOfRange));
}

#[tokio::test]
async fn test_rating_past_the_end_is_out_of_range() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    common::seed_word(&db.pool, USER, LANGUAGE, "solo", 1, None, None).await;

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();
    let finished = service
        .rate(&session.id, Difficulty::Medium, now)
        .await
        .unwrap();
    assert_eq!(finished.status, SessionStatus::Complete);

    let err = service
        .rate(&session.id, Difficulty::Medium, now)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::OutOfRange));

    // The no-op rating must not leave extra events behind.
    assert_eq!(common::review_event_count(&db.pool, USER).await, 1);
}

#[tokio::test]
async fn test_reset_discards_and_rebuilds() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    common::seed_word(&db.pool, USER, LANGUAGE, "uno", 0, None, None).await;
    common::seed_word(&db.pool, USER, LANGUAGE, "dos", 0, None, None).await;

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();
    service.rate(&session.id, Difficulty::Easy, now).await.unwrap();

    let fresh = service.reset(&session.id, now).await.unwrap();
    assert_ne!(fresh.id, session.id);
    assert_eq!(fresh.stats.reviewed, 0);
    assert_eq!(fresh.stats.easy, 0);
    assert_eq!(fresh.position, 0);

    // The old session id is gone from the registry.
    assert!(service.get_session(&session.id).await.is_none());
    let err = service
        .rate(&session.id, Difficulty::Easy, now)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound));
}

#[tokio::test]
async fn test_new_session_evicts_previous_for_same_owner() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    common::seed_word(&db.pool, USER, LANGUAGE, "hola", 0, None, None).await;
    common::seed_word(&db.pool, USER, "french", "chat", 0, None, None).await;

    let service = SessionService::new(db.pool.clone());
    let french = service.start_session(USER, "french", now).await.unwrap();

    // Restarting repeatedly must not pile up stale sessions: only the
    // newest one per (user, language) stays resident.
    let mut latest = service.start_session(USER, LANGUAGE, now).await.unwrap();
    for _ in 0..10 {
        let replacement = service.start_session(USER, LANGUAGE, now).await.unwrap();
        assert!(service.get_session(&latest.id).await.is_none());
        latest = replacement;
    }

    assert!(service.get_session(&latest.id).await.is_some());
    service.rate(&latest.id, Difficulty::Easy, now).await.unwrap();

    // A session for a different language is untouched by the churn.
    assert!(service.get_session(&french.id).await.is_some());
}

#[tokio::test]
async fn test_discard_needs_no_reconciliation() {
    let db = common::create_test_db().await;
    let now = Utc::now();

    common::seed_word(&db.pool, USER, LANGUAGE, "adios", 2, None, None).await;

    let service = SessionService::new(db.pool.clone());
    let session = service.start_session(USER, LANGUAGE, now).await.unwrap();

    assert!(service.discard(&session.id).await);
    assert!(!service.discard(&session.id).await);
    assert!(service.get_session(&session.id).await.is_none());

    // Nothing was persisted for the abandoned session.
    assert_eq!(common::review_event_count(&db.pool, USER).await, 0);
}
