#![allow(dead_code)]

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use lingua_backend_rust::db;

/// Keeps the backing temp directory alive for the pool's lifetime.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn create_test_db() -> TestDb {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = db::connect(&url).await.expect("failed to open test db");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    TestDb { pool, _dir: dir }
}

fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inserts a word with explicit review-scheduling fields and returns its id.
pub async fn seed_word(
    pool: &SqlitePool,
    user_id: &str,
    language: &str,
    word: &str,
    mastery_level: i32,
    last_reviewed_at: Option<DateTime<Utc>>,
    next_review_at: Option<DateTime<Utc>>,
) -> String {
    let id = Uuid::new_v4().to_string();
    let now = ts(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO vocabulary_words (
            id, user_id, language, word, translation, category,
            example_sentence, example_translation, mastery_level,
            times_reviewed, last_reviewed_at, next_review_at,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, NULL, NULL, NULL, ?, 0, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(language)
    .bind(word)
    .bind(format!("{word}-translation"))
    .bind(mastery_level)
    .bind(last_reviewed_at.map(ts))
    .bind(next_review_at.map(ts))
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .expect("failed to seed word");

    id
}

pub async fn review_event_count(pool: &SqlitePool, user_id: &str) -> i64 {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM flashcard_reviews WHERE user_id = ?"#)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("failed to count review events")
}
