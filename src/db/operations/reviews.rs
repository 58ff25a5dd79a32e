use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::format_ts;
use crate::scheduler::Difficulty;

/// Appends one review event. Rows in `flashcard_reviews` are write-once;
/// nothing in the backend updates or deletes them.
pub async fn insert_event(
    pool: &SqlitePool,
    vocabulary_id: &str,
    user_id: &str,
    difficulty: Difficulty,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO flashcard_reviews (id, vocabulary_id, user_id, difficulty, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(vocabulary_id)
    .bind(user_id)
    .bind(difficulty.as_str())
    .bind(format_ts(now))
    .execute(pool)
    .await?;

    Ok(())
}
