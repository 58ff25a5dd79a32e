use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_ts, parse_ts};

/// One vocabulary word owned by a (user, language) pair.
///
/// `next_review_at = None` means the word has never been scheduled and is
/// always due. `times_reviewed` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: String,
    pub user_id: String,
    pub language: String,
    pub word: String,
    pub translation: String,
    pub category: Option<String>,
    pub example_sentence: Option<String>,
    pub example_translation: Option<String>,
    pub mastery_level: i32,
    pub times_reviewed: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub user_id: String,
    pub language: String,
    pub word: String,
    pub translation: String,
    pub category: Option<String>,
    pub example_sentence: Option<String>,
    pub example_translation: Option<String>,
}

/// Partial update for a word. Updates are merge-only: an absent field keeps
/// the stored value, and there is no way to clear a field back to NULL (the
/// editing UI always sends every field, so clearing never comes up).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPatch {
    pub word: Option<String>,
    pub translation: Option<String>,
    pub category: Option<String>,
    pub example_sentence: Option<String>,
    pub example_translation: Option<String>,
}

fn map_row(row: &SqliteRow) -> VocabularyItem {
    let last_reviewed_raw = row
        .try_get::<Option<String>, _>("last_reviewed_at")
        .ok()
        .flatten();
    let next_review_raw = row.try_get::<Option<String>, _>("next_review_at").ok().flatten();
    let created_raw: String = row.try_get("created_at").unwrap_or_default();
    let updated_raw: String = row.try_get("updated_at").unwrap_or_default();

    VocabularyItem {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("user_id").unwrap_or_default(),
        language: row.try_get("language").unwrap_or_default(),
        word: row.try_get("word").unwrap_or_default(),
        translation: row.try_get("translation").unwrap_or_default(),
        category: row.try_get::<Option<String>, _>("category").ok().flatten(),
        example_sentence: row
            .try_get::<Option<String>, _>("example_sentence")
            .ok()
            .flatten(),
        example_translation: row
            .try_get::<Option<String>, _>("example_translation")
            .ok()
            .flatten(),
        mastery_level: row.try_get("mastery_level").unwrap_or(0),
        times_reviewed: row.try_get("times_reviewed").unwrap_or(0),
        last_reviewed_at: last_reviewed_raw.as_deref().and_then(parse_ts),
        next_review_at: next_review_raw.as_deref().and_then(parse_ts),
        created_at: parse_ts(&created_raw).unwrap_or_else(Utc::now),
        updated_at: parse_ts(&updated_raw).unwrap_or_else(Utc::now),
    }
}

/// Due items for a review session: never scheduled, or scheduled at or
/// before `now`. Never-reviewed words sort first, then oldest review first.
pub async fn query_due(
    pool: &SqlitePool,
    user_id: &str,
    language: &str,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<VocabularyItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM vocabulary_words
        WHERE user_id = ? AND language = ?
          AND (next_review_at IS NULL OR next_review_at <= ?)
        ORDER BY CASE WHEN last_reviewed_at IS NULL THEN 0 ELSE 1 END,
                 last_reviewed_at ASC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(language)
    .bind(format_ts(now))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

pub async fn get_word(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<VocabularyItem>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM vocabulary_words WHERE id = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(map_row))
}

pub async fn list_words(
    pool: &SqlitePool,
    user_id: &str,
    language: &str,
    category: Option<&str>,
) -> Result<Vec<VocabularyItem>, sqlx::Error> {
    let rows = match category {
        Some(category) => {
            sqlx::query(
                r#"
                SELECT * FROM vocabulary_words
                WHERE user_id = ? AND language = ? AND category = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .bind(language)
            .bind(category)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT * FROM vocabulary_words
                WHERE user_id = ? AND language = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .bind(language)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.iter().map(map_row).collect())
}

pub async fn create_word(
    pool: &SqlitePool,
    new_word: &NewWord,
    now: DateTime<Utc>,
) -> Result<VocabularyItem, sqlx::Error> {
    let item = VocabularyItem {
        id: Uuid::new_v4().to_string(),
        user_id: new_word.user_id.clone(),
        language: new_word.language.clone(),
        word: new_word.word.clone(),
        translation: new_word.translation.clone(),
        category: new_word.category.clone(),
        example_sentence: new_word.example_sentence.clone(),
        example_translation: new_word.example_translation.clone(),
        mastery_level: 0,
        times_reviewed: 0,
        last_reviewed_at: None,
        next_review_at: None,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO vocabulary_words (
            id, user_id, language, word, translation, category,
            example_sentence, example_translation, mastery_level,
            times_reviewed, last_reviewed_at, next_review_at,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0, NULL, NULL, ?, ?)
        "#,
    )
    .bind(item.id.as_str())
    .bind(item.user_id.as_str())
    .bind(item.language.as_str())
    .bind(item.word.as_str())
    .bind(item.translation.as_str())
    .bind(item.category.as_deref())
    .bind(item.example_sentence.as_deref())
    .bind(item.example_translation.as_deref())
    .bind(format_ts(now))
    .bind(format_ts(now))
    .execute(pool)
    .await?;

    Ok(item)
}

pub async fn update_word(
    pool: &SqlitePool,
    id: &str,
    patch: &WordPatch,
    now: DateTime<Utc>,
) -> Result<Option<VocabularyItem>, sqlx::Error> {
    let Some(existing) = get_word(pool, id).await? else {
        return Ok(None);
    };

    let word = patch.word.clone().unwrap_or(existing.word);
    let translation = patch.translation.clone().unwrap_or(existing.translation);
    let category = patch.category.clone().or(existing.category);
    let example_sentence = patch.example_sentence.clone().or(existing.example_sentence);
    let example_translation = patch
        .example_translation
        .clone()
        .or(existing.example_translation);

    sqlx::query(
        r#"
        UPDATE vocabulary_words
        SET word = ?, translation = ?, category = ?,
            example_sentence = ?, example_translation = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(word.as_str())
    .bind(translation.as_str())
    .bind(category.as_deref())
    .bind(example_sentence.as_deref())
    .bind(example_translation.as_deref())
    .bind(format_ts(now))
    .bind(id)
    .execute(pool)
    .await?;

    get_word(pool, id).await
}

pub async fn delete_word(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM vocabulary_words WHERE id = ?"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Persists one rating outcome. `times_reviewed` is incremented in SQL so
/// the counter stays monotone even if an earlier update was lost.
pub async fn apply_review(
    pool: &SqlitePool,
    item_id: &str,
    new_mastery_level: i32,
    reviewed_at: DateTime<Utc>,
    next_review_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE vocabulary_words
        SET mastery_level = ?,
            times_reviewed = times_reviewed + 1,
            last_reviewed_at = ?,
            next_review_at = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_mastery_level)
    .bind(format_ts(reviewed_at))
    .bind(format_ts(next_review_at))
    .bind(format_ts(reviewed_at))
    .bind(item_id)
    .execute(pool)
    .await?;

    Ok(())
}
