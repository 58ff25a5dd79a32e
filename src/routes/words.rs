use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::operations::vocabulary::{self, NewWord, VocabularyItem, WordPatch};
use crate::response::AppError;
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWordsQuery {
    user_id: String,
    language: String,
    category: Option<String>,
}

pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<ListWordsQuery>,
) -> Response {
    if query.user_id.trim().is_empty() || query.language.trim().is_empty() {
        return AppError::validation("userId and language are required").into_response();
    }

    let words = match vocabulary::list_words(
        state.pool(),
        &query.user_id,
        &query.language,
        query.category.as_deref(),
    )
    .await
    {
        Ok(words) => words,
        Err(err) => {
            tracing::warn!(error = %err, "words list query failed");
            return AppError::internal("words list query failed").into_response();
        }
    };

    Json(SuccessResponse {
        success: true,
        data: words,
    })
    .into_response()
}

pub async fn create_word(
    State(state): State<AppState>,
    Json(payload): Json<NewWord>,
) -> Response {
    if payload.user_id.trim().is_empty()
        || payload.language.trim().is_empty()
        || payload.word.trim().is_empty()
        || payload.translation.trim().is_empty()
    {
        return AppError::validation("userId, language, word and translation are required")
            .into_response();
    }

    match vocabulary::create_word(state.pool(), &payload, Utc::now()).await {
        Ok(word) => Json(SuccessResponse {
            success: true,
            data: word,
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word insert failed");
            AppError::internal("word insert failed").into_response()
        }
    }
}

pub async fn update_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WordPatch>,
) -> Response {
    match vocabulary::update_word(state.pool(), &id, &patch, Utc::now()).await {
        Ok(Some(word)) => Json(SuccessResponse::<VocabularyItem> {
            success: true,
            data: word,
        })
        .into_response(),
        Ok(None) => AppError::not_found("word not found").into_response(),
        Err(err) => {
            tracing::warn!(error = %err, word_id = %id, "word update failed");
            AppError::internal("word update failed").into_response()
        }
    }
}

pub async fn delete_word(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match vocabulary::delete_word(state.pool(), &id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: "word deleted",
        })
        .into_response(),
        Ok(false) => AppError::not_found("word not found").into_response(),
        Err(err) => {
            tracing::warn!(error = %err, word_id = %id, "word delete failed");
            AppError::internal("word delete failed").into_response()
        }
    }
}
